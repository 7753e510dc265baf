use agrosmart::carbon::{self, CarbonFootprint, AREA};
use agrosmart::fields::Inputs;
use anyhow::Result;
use colored::*;

/// Estimate the fertilizer carbon footprint for a farm area
pub fn execute(area: Option<f64>, json: bool) -> Result<i32> {
    let mut inputs = Inputs::new();
    if let Some(area) = area {
        inputs.insert(AREA.to_string(), area.into());
    }

    let footprint = carbon::estimate(&inputs);
    if json {
        println!("{}", serde_json::to_string_pretty(&footprint)?);
    } else {
        display(&footprint);
    }
    Ok(0)
}

fn display(footprint: &CarbonFootprint) {
    println!("\n🌍 {}", "Carbon Footprint Analysis".bold());
    println!("   Estimated CO₂ Emission: {} kg", footprint.total_emission);
    println!("   Fertilizer Usage:       {} kg", footprint.fertilizer_amount);
    println!(
        "   Trees to Offset:        {} trees/year",
        footprint.trees_to_offset
    );
    println!("\n   Recommendations:");
    for advice in &footprint.recommendations {
        println!("   • {}", advice);
    }
}
