//! Risk assessment command

use anyhow::Result;
use traevo_core::db::Database;
use traevo_core::risk::{RiskAnalyzer, RiskAssessment};

use super::{parse_date_or_today, require_user};

pub fn cmd_assess(
    db: &Database,
    email: &str,
    date: Option<&str>,
    save: bool,
    json: bool,
) -> Result<()> {
    let user = require_user(db, email)?;
    let as_of = parse_date_or_today(date)?;
    let analyzer = RiskAnalyzer::new(db);

    let assessment = if save {
        let prediction = analyzer.refresh_prediction(user.id, as_of)?;
        db.log_audit(
            user.id,
            "refresh",
            Some("prediction"),
            Some(prediction.id),
            Some(prediction.assessment.level.as_str()),
        )?;
        if !json {
            println!("💾 Saved as prediction {}", prediction.id);
        }
        prediction.assessment
    } else {
        analyzer.assess(user.id, as_of)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print_assessment(&assessment);
    }
    Ok(())
}

fn print_assessment(a: &RiskAssessment) {
    println!();
    println!("{} Spending risk for {}: {}", a.level.emoji(), a.period, a.level);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Day:        {} of {}", a.day_of_month, a.days_in_month);
    println!("   Spent:      {:.2}", a.spent_so_far);
    println!("   Projected:  {:.2}", a.projected_spend);
    match a.budget_limit {
        Some(limit) => {
            print!("   Budget:     {:.2}", limit);
            if let Some(usage) = a.budget_usage {
                print!(" ({:.2}% used", usage);
                if let Some(projected) = a.projected_usage {
                    print!(", {:.2}% projected", projected);
                }
                print!(")");
            }
            println!();
        }
        None => println!("   Budget:     (none)"),
    }
    println!(
        "   History:    avg {:.2}, std dev {:.2}, trend {}",
        a.moving_average, a.std_deviation, a.trend
    );

    if !a.history.is_empty() {
        let months: Vec<String> = a
            .history
            .iter()
            .map(|m| format!("{} {:.0}", m.period, m.total))
            .collect();
        println!("   Months:     {}", months.join(" │ "));
    }

    println!();
    println!("   {}", a.message);
}
