use serde::Serialize;

use crate::domain::CompositeValue;
use crate::error::{DataClass, EnerguideError, Result};

const R_VALUE: &str = "rValue";

/// Wall insulation makeup and the heat lost through all walls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub insulation: Vec<CompositeValue>,
    pub heat_lost: f64,
}

impl Wall {
    /// Build a wall from a `percentage;rValue;percentage;rValue...` definition.
    ///
    /// Returns `Ok(None)` when either input is absent, so the owning
    /// measurement side serializes as null.
    pub fn from_data(definition: Option<&str>, heat_lost: Option<f64>) -> Result<Option<Wall>> {
        let (Some(definition), Some(heat_lost)) = (definition, heat_lost) else {
            return Ok(None);
        };

        Ok(Some(Wall {
            insulation: parse_insulation(definition)?,
            heat_lost,
        }))
    }
}

fn parse_insulation(definition: &str) -> Result<Vec<CompositeValue>> {
    let definition = definition.trim();
    if definition.is_empty() {
        return Ok(Vec::new());
    }

    let fields: Vec<&str> = definition.split(';').map(str::trim).collect();

    if fields.len() % 2 != 0 {
        return Err(EnerguideError::embedded(
            DataClass::Wall,
            format!(
                "wall definition '{}' has {} fields, expected percentage/value pairs",
                definition,
                fields.len()
            ),
        ));
    }

    fields
        .chunks(2)
        .map(|pair| {
            let percentage = parse_number(pair[0], definition)?;
            let value = parse_number(pair[1], definition)?;
            Ok(CompositeValue::new(percentage, value, R_VALUE))
        })
        .collect()
}

fn parse_number(field: &str, definition: &str) -> Result<f64> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(EnerguideError::embedded(
            DataClass::Wall,
            format!("non-numeric entry '{}' in wall definition '{}'", field, definition),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ToDict;
    use serde_json::json;

    #[test]
    fn test_parses_percentage_value_pairs() {
        let wall = Wall::from_data(Some("45.3;12;50;12;4.7;12"), Some(27799.9))
            .unwrap()
            .unwrap();
        assert_eq!(
            wall.insulation,
            vec![
                CompositeValue::new(45.3, 12.0, "rValue"),
                CompositeValue::new(50.0, 12.0, "rValue"),
                CompositeValue::new(4.7, 12.0, "rValue"),
            ]
        );
        assert_eq!(wall.heat_lost, 27799.9);
    }

    #[test]
    fn test_to_dict() {
        let wall = Wall::from_data(Some("45.3;12;54.7;10"), Some(100.0)).unwrap().unwrap();
        assert_eq!(
            wall.to_dict(),
            json!({
                "insulation": [
                    {"percentage": 45.3, "rValue": 12.0},
                    {"percentage": 54.7, "rValue": 10.0},
                ],
                "heatLost": 100.0,
            })
        );
    }

    #[test]
    fn test_missing_inputs_yield_none() {
        assert_eq!(Wall::from_data(None, Some(1.0)).unwrap(), None);
        assert_eq!(Wall::from_data(Some("50;12"), None).unwrap(), None);
    }

    #[test]
    fn test_odd_field_count_is_rejected() {
        let err = Wall::from_data(Some("45.3;12;50"), Some(1.0)).unwrap_err();
        assert_eq!(err.data_class(), Some(DataClass::Wall));
    }

    #[test]
    fn test_non_numeric_entry_is_rejected() {
        let err = Wall::from_data(Some("45.3;twelve"), Some(1.0)).unwrap_err();
        assert_eq!(err.data_class(), Some(DataClass::Wall));
    }

    #[test]
    fn test_non_finite_entries_are_rejected() {
        for definition in ["inf;NaN", "50;inf", "NaN;12"] {
            let err = Wall::from_data(Some(definition), Some(1.0)).unwrap_err();
            assert_eq!(err.data_class(), Some(DataClass::Wall), "{}", definition);
        }
    }

    #[test]
    fn test_trailing_delimiter_is_rejected() {
        for definition in ["100;20;", "100;20;;"] {
            let err = Wall::from_data(Some(definition), Some(1.0)).unwrap_err();
            assert_eq!(err.data_class(), Some(DataClass::Wall), "{}", definition);
        }
    }
}
