use serde::{Serialize, Serializer};
use tracing::warn;

use crate::domain::Bilingual;

/// Canadian province or territory of a dwelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    BritishColumbia,
    Alberta,
    Saskatchewan,
    Manitoba,
    Ontario,
    Quebec,
    NewBrunswick,
    NovaScotia,
    PrinceEdwardIsland,
    NewfoundlandAndLabrador,
    Yukon,
    NorthwestTerritories,
    Nunavut,
    Unknown,
}

const REGIONS: &[(Region, &str, Bilingual)] = &[
    (Region::BritishColumbia, "BC", Bilingual::new("British Columbia", "Colombie-Britannique")),
    (Region::Alberta, "AB", Bilingual::new("Alberta", "Alberta")),
    (Region::Saskatchewan, "SK", Bilingual::new("Saskatchewan", "Saskatchewan")),
    (Region::Manitoba, "MB", Bilingual::new("Manitoba", "Manitoba")),
    (Region::Ontario, "ON", Bilingual::new("Ontario", "Ontario")),
    (Region::Quebec, "QC", Bilingual::new("Quebec", "Québec")),
    (Region::NewBrunswick, "NB", Bilingual::new("New Brunswick", "Nouveau-Brunswick")),
    (Region::NovaScotia, "NS", Bilingual::new("Nova Scotia", "Nouvelle-Écosse")),
    (Region::PrinceEdwardIsland, "PE", Bilingual::new("Prince Edward Island", "Île-du-Prince-Édouard")),
    (
        Region::NewfoundlandAndLabrador,
        "NL",
        Bilingual::new("Newfoundland and Labrador", "Terre-Neuve-et-Labrador"),
    ),
    (Region::Yukon, "YT", Bilingual::new("Yukon", "Yukon")),
    (Region::NorthwestTerritories, "NT", Bilingual::new("Northwest Territories", "Territoires du Nord-Ouest")),
    (Region::Nunavut, "NU", Bilingual::new("Nunavut", "Nunavut")),
];

impl Region {
    /// Resolve a region from its English name, French name or two-letter code.
    /// Anything else is [`Region::Unknown`].
    pub fn from_data(data: &str) -> Region {
        let needle = data.trim();
        let found = REGIONS.iter().find(|(_, code, names)| {
            code.eq_ignore_ascii_case(needle)
                || names.english.to_lowercase() == needle.to_lowercase()
                || names.french.to_lowercase() == needle.to_lowercase()
        });

        match found {
            Some((region, _, _)) => *region,
            None => {
                warn!(region = %data, "Unrecognized house region");
                Region::Unknown
            }
        }
    }

    pub fn code(&self) -> &'static str {
        REGIONS
            .iter()
            .find(|(region, _, _)| region == self)
            .map(|(_, code, _)| *code)
            .unwrap_or("unknown")
    }

    pub fn names(&self) -> Option<Bilingual> {
        REGIONS
            .iter()
            .find(|(region, _, _)| region == self)
            .map(|(_, _, names)| *names)
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
