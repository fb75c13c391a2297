//! Shallow extraction of house-file sections into fragment strings.
//!
//! The extract step does not interpret house files. It cuts out the
//! sub-trees the transform later parses and stores each as canonical
//! fragment text. Every snippet has an empty form for rows whose house file
//! lacks the section.

use serde::Serialize;

use crate::fragment::Element;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Codes {
    pub wall: Vec<String>,
    pub window: Vec<String>,
}

impl Codes {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseSnippet {
    pub ceilings: Vec<String>,
    pub floors: Vec<String>,
    pub walls: Vec<String>,
    pub doors: Vec<String>,
    pub windows: Vec<String>,
    pub heated_floor_area: Option<String>,
    #[serde(rename = "heating_cooling")]
    pub heating_cooling: Option<String>,
    #[serde(rename = "ventilations")]
    pub ventilation: Vec<String>,
    #[serde(rename = "waterHeatings")]
    pub water_heating: Option<String>,
    pub basements: Vec<String>,
    pub crawlspaces: Vec<String>,
    pub slabs: Vec<String>,
}

impl HouseSnippet {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnergyUpgradesSnippet {
    pub upgrades: Vec<String>,
}

impl EnergyUpgradesSnippet {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherDataSnippet {
    pub forward_sortation_area: Option<String>,
    pub ers_rating: Option<String>,
}

fn snip_all(node: &Element, path: &str) -> Vec<String> {
    node.xpath(path).into_iter().map(Element::to_string).collect()
}

fn snip_first(node: &Element, path: &str) -> Option<String> {
    node.find(path).map(Element::to_string)
}

fn nullable_field(root: &Element, path: &str) -> Option<String> {
    root.get::<String>(path).ok()
}

/// Postal-code prefix and ERS rating from the whole house file.
pub fn snip_other_data(root: &Element) -> OtherDataSnippet {
    let postal_code = nullable_field(root, "ProgramInformation/Client/StreetAddress/PostalCode/text()");

    OtherDataSnippet {
        forward_sortation_area: postal_code
            .filter(|code| !code.is_empty())
            .map(|code| code.chars().take(3).collect()),
        ers_rating: nullable_field(root, "Program/Results/Tsv/ERSRating/@value"),
    }
}

pub fn snip_house(house: &Element) -> HouseSnippet {
    HouseSnippet {
        ceilings: snip_all(house, "Components/Ceiling"),
        floors: snip_all(house, "Components/Floor"),
        walls: snip_all(house, "Components/Wall"),
        doors: snip_all(house, "Components//Components/Door"),
        windows: snip_all(house, "Components//Components/Window"),
        heated_floor_area: snip_first(house, "Specifications/HeatedFloorArea"),
        heating_cooling: snip_first(house, "HeatingCooling"),
        ventilation: snip_all(house, "Ventilation/WholeHouseVentilatorList/Hrv"),
        water_heating: snip_first(house, "Components/HotWater"),
        basements: snip_all(house, "Components/Basement"),
        crawlspaces: snip_all(house, "Components/Crawlspace"),
        slabs: snip_all(house, "Components/Slab"),
    }
}

pub fn snip_codes(codes: &Element) -> Codes {
    Codes {
        wall: snip_all(codes, "Wall/*/Code"),
        window: snip_all(codes, "Window/*/Code"),
    }
}

pub fn snip_energy_upgrades(energy_upgrades: &Element) -> EnergyUpgradesSnippet {
    EnergyUpgradesSnippet {
        upgrades: snip_all(energy_upgrades, "Settings/*"),
    }
}
