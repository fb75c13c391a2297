//! Typed value objects of the EnerGuide output document.
//!
//! Every value object is an immutable struct with structural equality, a
//! validating constructor, and a canonical camelCase serialization exposed
//! through [`ToDict`].

pub mod bilingual;
pub mod composite;
pub mod evaluation_type;
pub mod house_type;
pub mod measurement;
pub mod region;
pub mod upgrade;
pub mod walls;
pub mod water_heating;

pub use bilingual::Bilingual;
pub use composite::CompositeValue;
pub use evaluation_type::EvaluationType;
pub use house_type::HouseType;
pub use measurement::Measurement;
pub use region::Region;
pub use upgrade::Upgrade;
pub use walls::Wall;
pub use water_heating::{LabelPolicy, WaterHeaterType, WaterHeating};

use serde::Serialize;

/// Canonical output-document form of a value object.
pub trait ToDict {
    fn to_dict(&self) -> serde_json::Value;
}

impl<T: Serialize> ToDict for T {
    fn to_dict(&self) -> serde_json::Value {
        // Value objects only have string keys, so conversion cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}
