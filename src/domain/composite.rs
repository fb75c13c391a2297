use serde::ser::{Serialize, SerializeMap, Serializer};

/// One weighted component of a composite assembly, such as a wall's
/// insulation layer covering `percentage` of the area at `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeValue {
    pub percentage: f64,
    pub value: f64,
    /// Output key for `value`, e.g. `rValue`.
    pub value_name: String,
}

impl CompositeValue {
    pub fn new(percentage: f64, value: f64, value_name: impl Into<String>) -> Self {
        Self {
            percentage,
            value,
            value_name: value_name.into(),
        }
    }
}

/// Serializes as `{"percentage": p, <value_name>: v}`.
impl Serialize for CompositeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("percentage", &self.percentage)?;
        map.serialize_entry(&self.value_name, &self.value)?;
        map.end()
    }
}
