//! Domestic hot water systems from a house file's `HotWater` component.
//!
//! A `HotWater` element carries a mandatory `Primary` unit and an optional
//! `Secondary` unit. Each unit names its energy source and tank type by code
//! *and* by English/French label; both are checked against the tables below.

use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::constants::GALLONS_PER_LITRE;
use crate::domain::Bilingual;
use crate::error::{DataClass, EnerguideError, Result};
use crate::fragment::Element;
use WaterHeaterType::*;

/// How a label that disagrees with its code is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// Mismatched labels fail the unit.
    #[default]
    Strict,
    /// Mismatched labels are logged and the code wins.
    Warn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaterHeaterType {
    ElectricityNotApplicable,
    ElectricityConventionalTank,
    ElectricityConserverTank,
    ElectricityInstantaneous,
    ElectricityTanklessHeatPump,
    ElectricityHeatPump,
    ElectricityAddOnHeatPump,
    NaturalGasNotApplicable,
    NaturalGasConventionalTank,
    NaturalGasConventionalTankPilot,
    NaturalGasTanklessCoil,
    NaturalGasInstantaneous,
    NaturalGasInstantaneousCondensing,
    NaturalGasInstantaneousPilot,
    NaturalGasInducedDraftFan,
    NaturalGasDirectVent,
    NaturalGasDirectVentPilot,
    NaturalGasCondensing,
    OilNotApplicable,
    OilConventionalTank,
    OilTanklessCoil,
    PropaneNotApplicable,
    PropaneConventionalTank,
    PropaneConventionalTankPilot,
    PropaneTanklessCoil,
    PropaneInstantaneous,
    PropaneInstantaneousCondensing,
    PropaneInstantaneousPilot,
    PropaneInducedDraftFan,
    PropaneDirectVent,
    PropaneDirectVentPilot,
    PropaneCondensing,
    WoodNotApplicable,
    WoodFireplace,
    WoodStoveWaterCoil,
    WoodIndoorBoiler,
    WoodOutdoorBoiler,
    WoodHotWaterTank,
    SolarNotApplicable,
    SolarCollectorSystem,
}

const ENERGY_SOURCES: &[(u32, Bilingual)] = &[
    (1, Bilingual::new("Electricity", "Électricité")),
    (2, Bilingual::new("Natural gas", "Gaz naturel")),
    (3, Bilingual::new("Oil", "Mazout")),
    (4, Bilingual::new("Propane", "Propane")),
    (5, Bilingual::new("Wood", "Bois")),
    (6, Bilingual::new("Solar", "Solaire")),
];

const TANK_LOCATIONS: &[(u32, Bilingual)] = &[
    (1, Bilingual::new("Main floor", "Rez-de-chaussée")),
    (2, Bilingual::new("Basement", "Sous-sol")),
    (3, Bilingual::new("Crawl space", "Vide sanitaire")),
    (4, Bilingual::new("Garage", "Garage")),
    (5, Bilingual::new("Attic", "Grenier")),
];

const NOT_APPLICABLE: Bilingual = Bilingual::new("Not applicable", "Sans objet");
const CONVENTIONAL_TANK: Bilingual = Bilingual::new("Conventional tank", "Réservoir classique");
const CONVENTIONAL_TANK_PILOT: Bilingual =
    Bilingual::new("Conventional tank (pilot)", "Réservoir classique (veilleuse)");
const TANKLESS_COIL: Bilingual = Bilingual::new("Tankless coil", "Serpentin sans réservoir");
const INSTANTANEOUS: Bilingual = Bilingual::new("Instantaneous", "Instantané");
const INSTANTANEOUS_CONDENSING: Bilingual =
    Bilingual::new("Instantaneous (condensing)", "Instantané (à condensation)");
const INSTANTANEOUS_PILOT: Bilingual = Bilingual::new("Instantaneous (pilot)", "Instantané (veilleuse)");
const INDUCED_DRAFT_FAN: Bilingual = Bilingual::new("Induced draft fan", "Ventilateur à tirage induit");
const DIRECT_VENT: Bilingual = Bilingual::new("Direct vent (sealed)", "Évacuation directe (scellé)");
const DIRECT_VENT_PILOT: Bilingual = Bilingual::new(
    "Direct vent (sealed, pilot)",
    "Évacuation directe (scellé, veilleuse)",
);
const CONDENSING: Bilingual = Bilingual::new("Condensing", "À condensation");

/// `(energy source code, tank type code, tank type label, heater type)`.
const TANK_TYPES: &[(u32, u32, Bilingual, WaterHeaterType)] = &[
    (1, 1, NOT_APPLICABLE, ElectricityNotApplicable),
    (1, 2, CONVENTIONAL_TANK, ElectricityConventionalTank),
    (1, 3, Bilingual::new("Conserver tank", "Réservoir conservateur d'énergie"), ElectricityConserverTank),
    (1, 4, INSTANTANEOUS, ElectricityInstantaneous),
    (1, 5, Bilingual::new("Tankless heat pump", "Thermopompe sans réservoir"), ElectricityTanklessHeatPump),
    (1, 6, Bilingual::new("Heat pump", "Thermopompe"), ElectricityHeatPump),
    (1, 7, Bilingual::new("Add-on heat pump", "Thermopompe d'appoint"), ElectricityAddOnHeatPump),
    (2, 1, NOT_APPLICABLE, NaturalGasNotApplicable),
    (2, 2, CONVENTIONAL_TANK, NaturalGasConventionalTank),
    (2, 3, CONVENTIONAL_TANK_PILOT, NaturalGasConventionalTankPilot),
    (2, 4, TANKLESS_COIL, NaturalGasTanklessCoil),
    (2, 5, INSTANTANEOUS, NaturalGasInstantaneous),
    (2, 6, INSTANTANEOUS_CONDENSING, NaturalGasInstantaneousCondensing),
    (2, 7, INSTANTANEOUS_PILOT, NaturalGasInstantaneousPilot),
    (2, 8, INDUCED_DRAFT_FAN, NaturalGasInducedDraftFan),
    (2, 9, DIRECT_VENT, NaturalGasDirectVent),
    (2, 10, DIRECT_VENT_PILOT, NaturalGasDirectVentPilot),
    (2, 11, CONDENSING, NaturalGasCondensing),
    (3, 1, NOT_APPLICABLE, OilNotApplicable),
    (3, 2, CONVENTIONAL_TANK, OilConventionalTank),
    (3, 3, TANKLESS_COIL, OilTanklessCoil),
    (4, 1, NOT_APPLICABLE, PropaneNotApplicable),
    (4, 2, CONVENTIONAL_TANK, PropaneConventionalTank),
    (4, 3, CONVENTIONAL_TANK_PILOT, PropaneConventionalTankPilot),
    (4, 4, TANKLESS_COIL, PropaneTanklessCoil),
    (4, 5, INSTANTANEOUS, PropaneInstantaneous),
    (4, 6, INSTANTANEOUS_CONDENSING, PropaneInstantaneousCondensing),
    (4, 7, INSTANTANEOUS_PILOT, PropaneInstantaneousPilot),
    (4, 8, INDUCED_DRAFT_FAN, PropaneInducedDraftFan),
    (4, 9, DIRECT_VENT, PropaneDirectVent),
    (4, 10, DIRECT_VENT_PILOT, PropaneDirectVentPilot),
    (4, 11, CONDENSING, PropaneCondensing),
    (5, 1, NOT_APPLICABLE, WoodNotApplicable),
    (5, 2, Bilingual::new("Fireplace", "Foyer"), WoodFireplace),
    (5, 3, Bilingual::new("Wood stove water coil", "Serpentin de poêle à bois"), WoodStoveWaterCoil),
    (5, 4, Bilingual::new("Indoor wood boiler", "Chaudière à bois intérieure"), WoodIndoorBoiler),
    (5, 5, Bilingual::new("Outdoor wood boiler", "Chaudière à bois extérieure"), WoodOutdoorBoiler),
    (5, 6, Bilingual::new("Wood hot water tank", "Réservoir d'eau chaude au bois"), WoodHotWaterTank),
    (6, 1, NOT_APPLICABLE, SolarNotApplicable),
    (6, 2, Bilingual::new("Solar collector system", "Système de capteurs solaires"), SolarCollectorSystem),
];

impl WaterHeaterType {
    /// Canonical output names.
    pub fn names(&self) -> Bilingual {
        match self {
            ElectricityNotApplicable | NaturalGasNotApplicable | OilNotApplicable
            | PropaneNotApplicable | WoodNotApplicable | SolarNotApplicable => NOT_APPLICABLE,
            ElectricityConventionalTank => Bilingual::new("Electric storage tank", "Réservoir électrique"),
            ElectricityConserverTank => Bilingual::new(
                "Electric storage tank, energy conserver",
                "Réservoir électrique, conservateur d'énergie",
            ),
            ElectricityInstantaneous => Bilingual::new("Electric tankless water heater", "Chauffe-eau électrique instantané"),
            ElectricityTanklessHeatPump => Bilingual::new("Electric tankless heat pump", "Thermopompe électrique sans réservoir"),
            ElectricityHeatPump => Bilingual::new("Electric heat pump", "Thermopompe électrique"),
            ElectricityAddOnHeatPump => Bilingual::new("Integrated heat pump", "Thermopompe intégrée"),
            NaturalGasConventionalTank => Bilingual::new("Natural gas storage tank", "Réservoir au gaz naturel"),
            NaturalGasConventionalTankPilot => Bilingual::new(
                "Natural gas storage tank with pilot",
                "Réservoir au gaz naturel avec veilleuse",
            ),
            NaturalGasTanklessCoil => Bilingual::new("Natural gas tankless coil", "Serpentin sans réservoir au gaz naturel"),
            NaturalGasInstantaneous => Bilingual::new("Natural gas tankless", "Chauffe-eau instantané au gaz naturel"),
            NaturalGasInstantaneousCondensing => Bilingual::new(
                "Natural gas tankless, condensing",
                "Chauffe-eau instantané au gaz naturel à condensation",
            ),
            NaturalGasInstantaneousPilot => Bilingual::new(
                "Natural gas tankless with pilot",
                "Chauffe-eau instantané au gaz naturel avec veilleuse",
            ),
            NaturalGasInducedDraftFan => Bilingual::new(
                "Natural gas storage tank, induced draft",
                "Réservoir au gaz naturel à tirage induit",
            ),
            NaturalGasDirectVent => Bilingual::new(
                "Natural gas storage tank, direct vent",
                "Réservoir au gaz naturel à évacuation directe",
            ),
            NaturalGasDirectVentPilot => Bilingual::new(
                "Natural gas storage tank, direct vent with pilot",
                "Réservoir au gaz naturel à évacuation directe avec veilleuse",
            ),
            NaturalGasCondensing => Bilingual::new(
                "Natural gas storage tank, condensing",
                "Réservoir au gaz naturel à condensation",
            ),
            OilConventionalTank => Bilingual::new("Oil storage tank", "Réservoir au mazout"),
            OilTanklessCoil => Bilingual::new("Oil tankless coil", "Serpentin sans réservoir au mazout"),
            PropaneConventionalTank => Bilingual::new("Propane storage tank", "Réservoir au propane"),
            PropaneConventionalTankPilot => Bilingual::new(
                "Propane storage tank with pilot",
                "Réservoir au propane avec veilleuse",
            ),
            PropaneTanklessCoil => Bilingual::new("Propane tankless coil", "Serpentin sans réservoir au propane"),
            PropaneInstantaneous => Bilingual::new("Propane tankless", "Chauffe-eau instantané au propane"),
            PropaneInstantaneousCondensing => Bilingual::new(
                "Propane tankless, condensing",
                "Chauffe-eau instantané au propane à condensation",
            ),
            PropaneInstantaneousPilot => Bilingual::new(
                "Propane tankless with pilot",
                "Chauffe-eau instantané au propane avec veilleuse",
            ),
            PropaneInducedDraftFan => Bilingual::new(
                "Propane storage tank, induced draft",
                "Réservoir au propane à tirage induit",
            ),
            PropaneDirectVent => Bilingual::new(
                "Propane storage tank, direct vent",
                "Réservoir au propane à évacuation directe",
            ),
            PropaneDirectVentPilot => Bilingual::new(
                "Propane storage tank, direct vent with pilot",
                "Réservoir au propane à évacuation directe avec veilleuse",
            ),
            PropaneCondensing => Bilingual::new(
                "Propane storage tank, condensing",
                "Réservoir au propane à condensation",
            ),
            WoodFireplace => Bilingual::new("Fireplace", "Foyer"),
            WoodStoveWaterCoil => Bilingual::new("Wood stove water coil", "Serpentin de poêle à bois"),
            WoodIndoorBoiler => Bilingual::new("Indoor wood boiler", "Chaudière à bois intérieure"),
            WoodOutdoorBoiler => Bilingual::new("Outdoor wood boiler", "Chaudière à bois extérieure"),
            WoodHotWaterTank => Bilingual::new("Wood-fired hot water tank", "Réservoir d'eau chaude au bois"),
            SolarCollectorSystem => Bilingual::new("Solar collector system", "Système de capteurs solaires"),
        }
    }

    fn lookup(energy_source: u32, tank_type: u32) -> Option<(Bilingual, WaterHeaterType)> {
        TANK_TYPES
            .iter()
            .find(|(source, tank, _, _)| *source == energy_source && *tank == tank_type)
            .map(|(_, _, label, kind)| (*label, *kind))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterHeating {
    pub water_heater_type: WaterHeaterType,
    pub tank_volume_litres: f64,
    pub efficiency_ef: Option<f64>,
    pub efficiency_percentage: Option<f64>,
    pub drain_water_heat_recovery_efficiency_percentage: Option<f64>,
}

impl WaterHeating {
    pub fn tank_volume_gallon(&self) -> f64 {
        self.tank_volume_litres * GALLONS_PER_LITRE
    }

    pub fn from_data(hot_water: &Element) -> Result<Vec<WaterHeating>> {
        Self::from_data_with_policy(hot_water, LabelPolicy::Strict)
    }

    pub fn from_data_with_policy(hot_water: &Element, policy: LabelPolicy) -> Result<Vec<WaterHeating>> {
        let primary = hot_water
            .find("Primary")
            .ok_or_else(|| invalid(format!("No Primary unit in {}", hot_water.tag())))?;

        let mut units = vec![Self::from_unit(primary, policy)?];
        if let Some(secondary) = hot_water.find("Secondary") {
            units.push(Self::from_unit(secondary, policy)?);
        }
        Ok(units)
    }

    fn from_unit(unit: &Element, policy: LabelPolicy) -> Result<WaterHeating> {
        let energy_source = code_of(unit, "EnergySource")?;
        let tank_type = code_of(unit, "TankType")?;

        let source_labels = ENERGY_SOURCES
            .iter()
            .find(|(code, _)| *code == energy_source)
            .map(|(_, labels)| *labels)
            .ok_or_else(|| unknown_code(unit, "EnergySource", energy_source))?;
        check_labels(unit, "EnergySource", energy_source, source_labels, policy)?;

        let (tank_labels, water_heater_type) = WaterHeaterType::lookup(energy_source, tank_type)
            .ok_or_else(|| unknown_code(unit, "TankType", tank_type))?;
        check_labels(unit, "TankType", tank_type, tank_labels, policy)?;

        if unit.find("TankLocation").is_some() {
            let location = code_of(unit, "TankLocation")?;
            let location_labels = TANK_LOCATIONS
                .iter()
                .find(|(code, _)| *code == location)
                .map(|(_, labels)| *labels)
                .ok_or_else(|| unknown_code(unit, "TankLocation", location))?;
            check_labels(unit, "TankLocation", location, location_labels, policy)?;
        }

        let tank_volume_litres = unit.get_number("TankVolume/@value").map_err(embedded)?;

        let energy_factor = unit
            .find("EnergyFactor")
            .ok_or_else(|| invalid("Missing EnergyFactor".to_string()))?;
        let (efficiency_ef, efficiency_percentage) = if energy_factor.attribute("value").is_some() {
            (Some(energy_factor.get_number("@value").map_err(embedded)?), None)
        } else {
            energy_factor.get_number("@standbyHeatLoss").map_err(embedded)?;
            let thermal = energy_factor.get_number("@thermalEfficiency").map_err(embedded)?;
            (None, Some(thermal))
        };

        let drain_water_heat_recovery_efficiency_percentage = match unit.find("DrainWaterHeatRecovery") {
            Some(dwhr) => Some(dwhr.get_number("@effectivenessAt9.5").map_err(embedded)?),
            None => None,
        };

        Ok(WaterHeating {
            water_heater_type,
            tank_volume_litres,
            efficiency_ef,
            efficiency_percentage,
            drain_water_heat_recovery_efficiency_percentage,
        })
    }
}

impl Serialize for WaterHeating {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Doc {
            type_english: &'static str,
            type_french: &'static str,
            tank_volume_litres: f64,
            tank_volume_gallon: f64,
            efficiency_ef: Option<f64>,
            efficiency_percentage: Option<f64>,
            drain_water_heat_recovery_efficiency_percentage: Option<f64>,
        }

        let names = self.water_heater_type.names();
        Doc {
            type_english: names.english,
            type_french: names.french,
            tank_volume_litres: self.tank_volume_litres,
            tank_volume_gallon: self.tank_volume_gallon(),
            efficiency_ef: self.efficiency_ef,
            efficiency_percentage: self.efficiency_percentage,
            drain_water_heat_recovery_efficiency_percentage: self.drain_water_heat_recovery_efficiency_percentage,
        }
        .serialize(serializer)
    }
}

fn invalid(message: String) -> EnerguideError {
    EnerguideError::embedded(DataClass::WaterHeating, message)
}

fn embedded(err: EnerguideError) -> EnerguideError {
    invalid(err.to_string())
}

fn code_of(unit: &Element, tag: &str) -> Result<u32> {
    unit.get::<u32>(&format!("{}/@code", tag)).map_err(embedded)
}

fn labels(unit: &Element, tag: &str) -> (Option<String>, Option<String>) {
    (
        unit.findtext(&format!("{}/English", tag)),
        unit.findtext(&format!("{}/French", tag)),
    )
}

fn unknown_code(unit: &Element, tag: &str, code: u32) -> EnerguideError {
    let (english, french) = labels(unit, tag);
    invalid(format!(
        "Unknown {} code {} with labels English={:?} French={:?}",
        tag, code, english, french
    ))
}

fn check_labels(unit: &Element, tag: &str, code: u32, expected: Bilingual, policy: LabelPolicy) -> Result<()> {
    let (english, french) = labels(unit, tag);
    let english = english.ok_or_else(|| invalid(format!("Missing {}/English", tag)))?;

    let english_ok = english.trim() == expected.english;
    let french_ok = french.as_deref().map_or(true, |text| text.trim() == expected.french);
    if english_ok && french_ok {
        return Ok(());
    }

    let message = format!(
        "{} code {} does not match labels English={:?} French={:?}",
        tag, code, english, french
    );
    match policy {
        LabelPolicy::Strict => Err(invalid(message)),
        LabelPolicy::Warn => {
            warn!(element = tag, code, english = %english, "Label does not match code, using code");
            Ok(())
        }
    }
}
