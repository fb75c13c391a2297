use serde::Serialize;

/// An English/French label pair as carried by HOT2000 code elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bilingual {
    pub english: &'static str,
    pub french: &'static str,
}

impl Bilingual {
    pub const fn new(english: &'static str, french: &'static str) -> Self {
        Self { english, french }
    }
}
