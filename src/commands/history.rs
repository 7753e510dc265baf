use agrosmart::config::Config;
use agrosmart::fields::{CROP_TYPE, SOIL_TYPE};
use agrosmart::Recommendation;
use anyhow::Result;
use chrono::Local;
use colored::*;

/// Show the newest `limit` recommendations
pub fn execute(config: &Config, limit: usize, json: bool) -> Result<i32> {
    let history = super::open_history(config);
    let recent = history.recent(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(recent)?);
        return Ok(0);
    }

    if recent.is_empty() {
        println!("No recommendations yet.");
        return Ok(0);
    }

    for record in recent {
        let (date, time) = when(record);
        println!("{}  {}", record.fertilizer.bold(), format!("{date} {time}").dimmed());
        println!(
            "   Crop: {} | Soil: {}",
            input(record, CROP_TYPE),
            input(record, SOIL_TYPE)
        );
        println!("   Confidence: {}%", record.confidence);
    }

    if history.len() > recent.len() {
        println!(
            "\n({} of {} shown, use --limit to see more)",
            recent.len(),
            history.len()
        );
    }
    Ok(0)
}

/// Local date and hour:minute, or the raw timestamp if it does not parse
fn when(record: &Recommendation) -> (String, String) {
    match record.created_at() {
        Some(at) => {
            let local = at.with_timezone(&Local);
            (
                local.format("%-m/%-d/%Y").to_string(),
                local.format("%I:%M %p").to_string(),
            )
        }
        None => (record.timestamp.clone(), String::new()),
    }
}

fn input(record: &Recommendation, name: &str) -> String {
    record
        .inputs
        .get(name)
        .map(|v| v.to_string())
        .unwrap_or_default()
}
