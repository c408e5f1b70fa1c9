//! # Glucose Display Units
//!
//! Unit system the host renders glucose in. Samples are stored in mg/dL;
//! every value shown to the user, and every difference between two values,
//! goes through `presentable_value` first so rounding matches what is on
//! screen.

use serde::{Deserialize, Serialize};

/// mg/dL in one mmol/L of glucose (molar mass 180.15588 g/mol)
pub const MG_DL_PER_MMOL_L: f64 = 18.015588;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GlucoseDisplayUnits {
    #[default]
    #[serde(rename = "mg/dL")]
    MilligramsPerDeciliter,
    #[serde(rename = "mmol/L")]
    MillimolesPerLiter,
}

impl GlucoseDisplayUnits {
    /// Convert a raw mg/dL quantity into this unit system
    pub fn convert(&self, mg_dl: f64) -> f64 {
        match self {
            GlucoseDisplayUnits::MilligramsPerDeciliter => mg_dl,
            GlucoseDisplayUnits::MillimolesPerLiter => mg_dl / MG_DL_PER_MMOL_L,
        }
    }

    /// Decimal places shown for this unit system
    pub fn fraction_digits(&self) -> usize {
        match self {
            GlucoseDisplayUnits::MilligramsPerDeciliter => 0,
            GlucoseDisplayUnits::MillimolesPerLiter => 1,
        }
    }

    /// Convert and round to the precision the user sees
    pub fn presentable_value(&self, mg_dl: f64) -> f64 {
        let scale = 10f64.powi(self.fraction_digits() as i32);
        (self.convert(mg_dl) * scale).round() / scale
    }

    /// Format an already converted value
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}", self.fraction_digits(), value)
    }

    /// Format a signed change, e.g. "+10" or "-0.5"
    pub fn format_change(&self, change: f64) -> String {
        let digits = self.fraction_digits();
        let scale = 10f64.powi(digits as i32);
        let rounded = (change * scale).round() / scale;
        if rounded > 0.0 {
            format!("+{:.*}", digits, rounded)
        } else if rounded < 0.0 {
            format!("{:.*}", digits, rounded)
        } else {
            // avoids "-0"
            format!("{:.*}", digits, 0.0)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GlucoseDisplayUnits::MilligramsPerDeciliter => "mg/dL",
            GlucoseDisplayUnits::MillimolesPerLiter => "mmol/L",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mg_dl_is_identity() {
        let units = GlucoseDisplayUnits::MilligramsPerDeciliter;
        assert_eq!(units.convert(123.4), 123.4);
        assert_eq!(units.presentable_value(123.4), 123.0);
    }

    #[test]
    fn test_mmol_conversion_rounds_to_one_decimal() {
        let units = GlucoseDisplayUnits::MillimolesPerLiter;
        assert_eq!(units.presentable_value(100.0), 5.6);
        assert_eq!(units.presentable_value(90.0), 5.0);
    }

    #[test]
    fn test_format_change_sign() {
        let mg = GlucoseDisplayUnits::MilligramsPerDeciliter;
        assert_eq!(mg.format_change(10.0), "+10");
        assert_eq!(mg.format_change(-10.0), "-10");
        assert_eq!(mg.format_change(0.0), "0");
        assert_eq!(mg.format_change(-0.2), "0");

        let mmol = GlucoseDisplayUnits::MillimolesPerLiter;
        assert_eq!(mmol.format_change(-0.5), "-0.5");
        assert_eq!(mmol.format_value(5.6), "5.6");
    }

    #[test]
    fn test_units_toml_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            units: GlucoseDisplayUnits,
        }

        let parsed: Wrapper = toml::from_str(r#"units = "mmol/L""#).expect("Failed to deserialize");
        assert_eq!(parsed.units, GlucoseDisplayUnits::MillimolesPerLiter);
        assert_eq!(parsed.units.label(), "mmol/L");
    }
}
