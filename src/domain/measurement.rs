use serde::Serialize;

/// An as-built value alongside its post-upgrade counterpart.
///
/// Either side may be missing independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement<T> {
    pub measurement: Option<T>,
    pub upgrade: Option<T>,
}

impl<T> Measurement<T> {
    pub fn new(measurement: Option<T>, upgrade: Option<T>) -> Self {
        Self {
            measurement,
            upgrade,
        }
    }

    pub fn empty() -> Self {
        Self::new(None, None)
    }
}
