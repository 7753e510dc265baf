//! Simplified carbon footprint estimate for fertilizer use.
//!
//! Linear model: 0.1 kg fertilizer per hectare, 2.5 kg CO2 per kg fertilizer,
//! 22 kg CO2 absorbed per tree per year.

use serde::Serialize;

use crate::fields::Inputs;

/// Input key holding the farm area in hectares
pub const AREA: &str = "area";

/// Fertilizer applied per hectare (kg)
pub const FERTILIZER_PER_HECTARE_KG: f64 = 0.1;

/// Emission factor (kg CO2 per kg fertilizer)
pub const EMISSION_FACTOR: f64 = 2.5;

/// CO2 absorbed by one tree in a year (kg)
pub const TREE_ABSORPTION_KG: f64 = 22.0;

/// Fixed advice shown with every estimate
pub const ADVICE: [&str; 3] = [
    "Consider organic fertilizers to reduce emissions",
    "Implement precision agriculture techniques",
    "Use cover crops to improve soil health",
];

/// Result of a footprint estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonFootprint {
    /// kg CO2, two decimals
    pub total_emission: String,
    /// kg fertilizer, two decimals
    pub fertilizer_amount: String,
    pub trees_to_offset: u64,
    pub recommendations: Vec<String>,
}

/// Area in hectares; absent, non-numeric, non-finite or zero means 1
pub fn area_of(inputs: &Inputs) -> f64 {
    inputs
        .get(AREA)
        .and_then(|v| v.as_number())
        .filter(|a| a.is_finite() && *a != 0.0)
        .unwrap_or(1.0)
}

/// Estimate the footprint of fertilizing the area described by `inputs`
pub fn estimate(inputs: &Inputs) -> CarbonFootprint {
    let fertilizer_amount = area_of(inputs) * FERTILIZER_PER_HECTARE_KG;
    let total_emission = fertilizer_amount * EMISSION_FACTOR;
    let trees = (total_emission / TREE_ABSORPTION_KG).ceil();

    CarbonFootprint {
        total_emission: format!("{total_emission:.2}"),
        fertilizer_amount: format!("{fertilizer_amount:.2}"),
        trees_to_offset: if trees > 0.0 { trees as u64 } else { 0 },
        recommendations: ADVICE.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::InputValue;
    use approx::assert_relative_eq;

    fn with_area(value: InputValue) -> Inputs {
        let mut inputs = Inputs::new();
        inputs.insert(AREA.to_string(), value);
        inputs
    }

    #[test]
    fn test_ten_hectares() {
        let result = estimate(&with_area(10.0_f64.into()));
        assert_eq!(result.fertilizer_amount, "1.00");
        assert_eq!(result.total_emission, "2.50");
        assert_eq!(result.trees_to_offset, 1);
    }

    #[test]
    fn test_missing_area_defaults_to_one_hectare() {
        let result = estimate(&Inputs::new());
        assert_eq!(result.fertilizer_amount, "0.10");
        assert_eq!(result.total_emission, "0.25");
        assert_eq!(result.trees_to_offset, 1);
    }

    #[test]
    fn test_zero_and_garbage_area_default_to_one() {
        assert_relative_eq!(area_of(&with_area(0.0_f64.into())), 1.0);
        assert_relative_eq!(area_of(&with_area("lots".into())), 1.0);
        assert_relative_eq!(area_of(&with_area(f64::NAN.into())), 1.0);
        assert_relative_eq!(area_of(&with_area("2.5".into())), 2.5);
    }

    #[test]
    fn test_large_farm_needs_more_trees() {
        // 1000 ha -> 100 kg fertilizer -> 250 kg CO2 -> 11.36 trees
        let result = estimate(&with_area(1000.0_f64.into()));
        assert_eq!(result.fertilizer_amount, "100.00");
        assert_eq!(result.total_emission, "250.00");
        assert_eq!(result.trees_to_offset, 12);
    }

    #[test]
    fn test_advice_is_fixed() {
        let result = estimate(&Inputs::new());
        assert_eq!(result.recommendations.len(), 3);
        assert_eq!(result.recommendations[0], ADVICE[0]);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(estimate(&Inputs::new())).unwrap();
        assert_eq!(json["totalEmission"], "0.25");
        assert_eq!(json["fertilizerAmount"], "0.10");
        assert_eq!(json["treesToOffset"], 1);
    }
}
