use serde::Serialize;

use crate::error::{DataClass, EnerguideError, Result};
use crate::fragment::Element;

/// One recommended energy upgrade, e.g. `<Ceilings cost="0" priority="12" />`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Upgrade {
    pub upgrade_type: String,
    pub cost: f64,
    pub priority: i64,
}

impl Upgrade {
    pub fn from_data(node: &Element) -> Result<Upgrade> {
        let embedded = |e: EnerguideError| EnerguideError::embedded(DataClass::Upgrade, e.to_string());

        Ok(Upgrade {
            upgrade_type: node.tag().to_string(),
            cost: node.get_number("@cost").map_err(embedded)?,
            priority: node.get::<i64>("@priority").map_err(embedded)?,
        })
    }
}
