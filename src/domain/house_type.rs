use crate::domain::Bilingual;

/// Canonical house-type labels and the spellings they absorb.
pub struct HouseType;

const HOUSE_TYPES: &[Bilingual] = &[
    Bilingual::new("Single detached", "Maison individuelle"),
    Bilingual::new("Double/Semi-detached", "Maison jumelée"),
    Bilingual::new("Row house, end unit", "Maison en rangée, unité d'extrémité"),
    Bilingual::new("Row house, middle unit", "Maison en rangée, unité centrale"),
    Bilingual::new("Apartment", "Appartement"),
    Bilingual::new("Apartment Row", "Appartement en rangée"),
    Bilingual::new("Mobile home", "Maison mobile"),
    Bilingual::new("Detached Duplex", "Duplex individuel"),
    Bilingual::new("Detached Triplex", "Triplex individuel"),
    Bilingual::new("Attached Duplex", "Duplex jumelé"),
    Bilingual::new("Attached Triplex", "Triplex jumelé"),
    Bilingual::new("Not applicable", "Sans objet"),
];

impl HouseType {
    /// Map an English or French spelling (any case, any surrounding
    /// whitespace) to the canonical English label. Unrecognized text is kept
    /// as-is after trimming; blank or missing input yields `None`.
    pub fn normalize(data: Option<&str>) -> Option<String> {
        let text = data?.trim();
        if text.is_empty() {
            return None;
        }

        let folded = fold(text);
        let canonical = HOUSE_TYPES
            .iter()
            .find(|names| fold(names.english) == folded || fold(names.french) == folded)
            .map(|names| names.english.to_string());

        Some(canonical.unwrap_or_else(|| text.to_string()))
    }
}

fn fold(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
