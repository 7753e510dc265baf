use agrosmart::advisor::{Advice, Advisor, AdvisorError};
use agrosmart::config::Config;
use agrosmart::fields::{self, SoilReading, NITROGEN, PHOSPHORUS, POTASSIUM};
use anyhow::Result;
use colored::*;

/// Soil and crop parameters from the command line
#[derive(Debug, Clone, clap::Args)]
pub struct ReadingArgs {
    /// Air temperature (°C, -10 to 50)
    #[arg(long, allow_negative_numbers = true)]
    pub temperature: f64,

    /// Relative humidity (%, 0 to 100)
    #[arg(long)]
    pub humidity: f64,

    /// Soil moisture (%, 0 to 100)
    #[arg(long)]
    pub moisture: f64,

    /// Nitrogen (kg/ha, 0 to 500)
    #[arg(long)]
    pub nitrogen: f64,

    /// Phosphorus (kg/ha, 0 to 200)
    #[arg(long)]
    pub phosphorus: f64,

    /// Potassium (kg/ha, 0 to 300)
    #[arg(long)]
    pub potassium: f64,

    /// Soil type (e.g. Sandy, Loamy, Black)
    #[arg(long)]
    pub soil_type: String,

    /// Crop type (e.g. Maize, Wheat, Cotton)
    #[arg(long)]
    pub crop_type: String,
}

impl From<ReadingArgs> for SoilReading {
    fn from(args: ReadingArgs) -> Self {
        Self {
            temperature: args.temperature,
            humidity: args.humidity,
            moisture: args.moisture,
            nitrogen: args.nitrogen,
            phosphorus: args.phosphorus,
            potassium: args.potassium,
            soil_type: args.soil_type,
            crop_type: args.crop_type,
        }
    }
}

pub fn execute(config: &Config, reading: ReadingArgs, json: bool) -> Result<i32> {
    let inputs = SoilReading::from(reading).to_inputs();

    // Bad input is reported before any credentials are asked for
    if let Err(e) = fields::validate(&inputs) {
        super::report_validation(&e);
        return Ok(1);
    }

    let client = super::connect(config)?;
    let mut history = super::open_history(config);
    let advisor = Advisor::new(&client, &mut history);

    if !super::authenticate(&advisor, config, None)? {
        return Ok(1);
    }

    if !json {
        println!("Analyzing soil parameters and generating recommendation...");
    }

    match advisor.recommend(inputs) {
        Ok(advice) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&advice)?);
            } else {
                display(&advice);
            }
            Ok(0)
        }
        Err(AdvisorError::Validation(e)) => {
            super::report_validation(&e);
            Ok(1)
        }
        Err(e) => {
            super::failure(&e.to_string());
            Ok(1)
        }
    }
}

fn display(advice: &Advice) {
    let record = &advice.record;
    let input = |name: &str| {
        record
            .inputs
            .get(name)
            .map(|v| v.to_string())
            .unwrap_or_default()
    };

    println!("\n🌿 {}", "Recommended Fertilizer".bold());
    println!("   {}", record.fertilizer.green().bold());
    println!(
        "   Confidence: {:.1}% {}",
        record.confidence,
        confidence_bar(record.confidence)
    );
    if let Some(method) = &advice.method {
        println!("   Method: {}", method);
    }
    println!(
        "   Based on: {} soil, {} crop",
        input(fields::SOIL_TYPE),
        input(fields::CROP_TYPE)
    );
    println!(
        "   NPK: {}:{}:{}",
        input(NITROGEN),
        input(PHOSPHORUS),
        input(POTASSIUM)
    );
}

/// Twenty-cell bar for a percentage
fn confidence_bar(confidence: f64) -> String {
    let filled = ((confidence.clamp(0.0, 100.0) / 5.0).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}
