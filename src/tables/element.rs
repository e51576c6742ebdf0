//! Per-measurement chemistry: major/trace classification, oxide conversion
//! and normalization to 100 %.

use std::fmt;

use crate::chemistry::{oxide_for, TRACE_THRESHOLD_PERCENT, TRACE_THRESHOLD_PPM};
use crate::qan::{Measurement, Unit};

/// Major or trace element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementClass {
    /// Above the trace threshold
    Major,
    /// At or below 0.1 % (1000 ppm)
    Trace,
}

impl ElementClass {
    /// Lower-case name used in table keys
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementClass::Major => "major",
            ElementClass::Trace => "trace",
        }
    }
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a concentration, `None` for units that are not concentrations
pub fn classify_value(concentration: f64, unit: &Unit) -> Option<ElementClass> {
    let threshold = match unit {
        Unit::Percent => TRACE_THRESHOLD_PERCENT,
        Unit::Ppm => TRACE_THRESHOLD_PPM,
        _ => return None,
    };
    if concentration <= threshold {
        Some(ElementClass::Trace)
    } else {
        Some(ElementClass::Major)
    }
}

/// Classify a measurement by its as-measured concentration
pub fn classify(measurement: &Measurement) -> Option<ElementClass> {
    classify_value(measurement.concentration, &measurement.unit)
}

/// Oxide formula and oxide concentration of a measurement (unit unchanged)
pub fn convert_to_oxide(measurement: &Measurement) -> Option<(&'static str, f64)> {
    if !measurement.unit.is_concentration() {
        return None;
    }
    oxide_for(&measurement.element).map(|oxide| (oxide.formula, oxide.convert(measurement.concentration)))
}

/// Whether a measurement takes part in table derivation
pub fn is_included(measurement: &Measurement, ignore: &[String]) -> bool {
    measurement.unit.is_concentration() && !ignore.iter().any(|e| *e == measurement.element)
}

/// Sum of all included concentrations of a sample in weight percent
pub fn total_weight_percent(measurements: &[Measurement], ignore: &[String]) -> f64 {
    measurements
        .iter()
        .filter(|m| is_included(m, ignore))
        .filter_map(Measurement::weight_percent)
        .sum()
}

/// Factor that scales a sample's concentrations to a 100 % total.
///
/// `None` when the total is not positive; such a sample has no relative values.
pub fn normalization_factor(measurements: &[Measurement], ignore: &[String]) -> Option<f64> {
    let total = total_weight_percent(measurements, ignore);
    if total > 0.0 && total.is_finite() {
        Some(100.0 / total)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(element: &str, concentration: f64, unit: &str) -> Measurement {
        Measurement {
            element: element.to_string(),
            omnian_scan: element.to_string(),
            concentration,
            unit: Unit::parse(unit),
            signal: None,
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&measurement("Si", 23.0, "%")), Some(ElementClass::Major));
        assert_eq!(classify(&measurement("Sr", 0.1, "%")), Some(ElementClass::Trace));
        assert_eq!(classify(&measurement("Zr", 1000.0, "ppm")), Some(ElementClass::Trace));
        assert_eq!(classify(&measurement("Ba", 1000.5, "ppm")), Some(ElementClass::Major));
        assert_eq!(classify(&measurement("Rh", 12.0, "kcps")), None);
    }

    #[test]
    fn test_convert_to_oxide() {
        let (formula, value) = convert_to_oxide(&measurement("Al", 8.0, "%")).unwrap();
        assert_eq!(formula, "Al2O3");
        assert!((value - 15.116).abs() < 1e-9);

        assert!(convert_to_oxide(&measurement("Rh", 1.0, "%")).is_none());
        assert!(convert_to_oxide(&measurement("Al", 8.0, "kcps")).is_none());
    }

    #[test]
    fn test_normalization_factor() {
        let data = vec![
            measurement("Si", 40.0, "%"),
            measurement("Fe", 9.0, "%"),
            measurement("Zr", 10000.0, "ppm"),
            measurement("Rh", 50.0, "%"),
            measurement("Ag", 7.0, "kcps"),
        ];
        let ignore = vec!["Rh".to_string()];
        assert!((total_weight_percent(&data, &ignore) - 50.0).abs() < 1e-9);
        assert!((normalization_factor(&data, &ignore).unwrap() - 2.0).abs() < 1e-12);

        assert_eq!(normalization_factor(&[measurement("Ag", 7.0, "kcps")], &[]), None);
        assert_eq!(normalization_factor(&[measurement("Si", 0.0, "%")], &[]), None);
    }
}
