//! Row parsing, evaluation assembly and dwelling grouping.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::constants::*;
use crate::domain::{
    EvaluationType, HouseType, LabelPolicy, Measurement, Region, Upgrade, Wall, WaterHeating,
};
use crate::error::{EnerguideError, Result};
use crate::pipeline::processing::dedup::{filter_dummy_evaluations, DatedEvaluation};
use crate::pipeline::processing::validator::{
    CoercedRow, FieldError, FieldRule, RawRecord, Schema, ValidationErrors,
};

static ROW_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    let optional_float = || FieldRule::float().nullable();
    let optional_int = || FieldRule::integer().nullable();

    Schema::new()
        .field(EVAL_ID, FieldRule::integer().required())
        .field(HOUSE_ID, FieldRule::integer().required())
        .field(
            EVAL_TYPE,
            FieldRule::string().required().allowed(EvaluationType::codes()),
        )
        .field(ENTRY_DATE, FieldRule::date().required())
        .field(CREATION_DATE, FieldRule::datetime().required())
        .field(YEAR_BUILT, FieldRule::integer().required())
        .field(CLIENT_CITY, FieldRule::string().required())
        .field(
            FORWARD_SORTATION_AREA,
            FieldRule::string().required().regex(FSA_PATTERN),
        )
        .field(HOUSE_REGION, FieldRule::string().required())
        .field(BUILDER, FieldRule::string().required())
        .field(UPGRADES, FieldRule::list_of(FieldRule::fragment()).required())
        .field(MODIFICATION_DATE, FieldRule::datetime().required().nullable())
        .field(HEATED_FLOOR_AREA, optional_float())
        .field(TYPE_OF_HOUSE, FieldRule::string().nullable())
        .field(EGH_RATING, optional_float())
        .field(UGR_RATING, optional_float())
        .field(ERS_RATING, optional_int())
        .field(UGR_ERS_RATING, optional_int())
        .field(ERS_GHG, optional_float())
        .field(UGR_ERS_GHG, optional_float())
        .field(ERS_ENERGY_INTENSITY, optional_float())
        .field(UGR_ERS_ENERGY_INTENSITY, optional_float())
        .field(EGH_DESIGN_HEAT_LOSS, optional_float())
        .field(UGR_DESIGN_HEAT_LOSS, optional_float())
        .field(WALL_DEFINITION, FieldRule::string().required().nullable())
        .field(UGR_WALL_DEFINITION, FieldRule::string().required().nullable())
        .field(EGH_HEAT_LOST_WALLS, FieldRule::float().required().nullable())
        .field(UGR_HEAT_LOST_WALLS, FieldRule::float().required().nullable())
        .field(WATER_HEATINGS, FieldRule::fragment().nullable())
});

/// One validated extract row.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDwellingDataRow {
    pub house_id: i64,
    pub eval_id: i64,
    pub file_id: String,
    pub eval_type: EvaluationType,
    pub entry_date: NaiveDate,
    pub creation_date: NaiveDateTime,
    pub modification_date: Option<NaiveDateTime>,
    pub year_built: i64,
    pub city: String,
    pub region: Region,
    pub forward_sortation_area: String,
    pub house_type: Option<String>,
    pub energy_upgrades: Vec<Upgrade>,
    pub water_heatings: Vec<WaterHeating>,
    pub heated_floor_area: Option<f64>,
    pub egh_rating: Measurement<f64>,
    pub ers_rating: Measurement<i64>,
    pub greenhouse_gas_emissions: Measurement<f64>,
    pub energy_intensity: Measurement<f64>,
    pub walls: Measurement<Wall>,
    pub design_heat_loss: Measurement<f64>,
}

impl ParsedDwellingDataRow {
    pub fn from_row(row: &RawRecord) -> Result<Self> {
        Self::from_row_with_policy(row, LabelPolicy::default())
    }

    pub fn from_row_with_policy(row: &RawRecord, policy: LabelPolicy) -> Result<Self> {
        let parsed = ROW_SCHEMA
            .validate(row)
            .map_err(EnerguideError::InvalidInputData)?;

        let eval_type = parsed
            .str(EVAL_TYPE)
            .and_then(EvaluationType::from_code)
            .ok_or_else(|| invalid(EVAL_TYPE))?;

        let energy_upgrades = parsed
            .fragments(UPGRADES)
            .into_iter()
            .map(Upgrade::from_data)
            .collect::<Result<Vec<_>>>()?;

        let water_heatings = match parsed.fragment(WATER_HEATINGS) {
            Some(hot_water) => WaterHeating::from_data_with_policy(hot_water, policy)?,
            None => Vec::new(),
        };

        Ok(ParsedDwellingDataRow {
            house_id: required(&parsed, HOUSE_ID, CoercedRow::int)?,
            eval_id: required(&parsed, EVAL_ID, CoercedRow::int)?,
            file_id: required(&parsed, BUILDER, |p, f| p.str(f).map(str::to_string))?,
            eval_type,
            entry_date: required(&parsed, ENTRY_DATE, CoercedRow::date)?,
            creation_date: required(&parsed, CREATION_DATE, CoercedRow::datetime)?,
            modification_date: parsed.datetime(MODIFICATION_DATE),
            year_built: required(&parsed, YEAR_BUILT, CoercedRow::int)?,
            city: required(&parsed, CLIENT_CITY, |p, f| p.str(f).map(str::to_string))?,
            region: Region::from_data(required(&parsed, HOUSE_REGION, CoercedRow::str)?),
            forward_sortation_area: required(&parsed, FORWARD_SORTATION_AREA, |p, f| {
                p.str(f).map(str::to_string)
            })?,
            house_type: HouseType::normalize(parsed.str(TYPE_OF_HOUSE)),
            energy_upgrades,
            water_heatings,
            heated_floor_area: parsed.float(HEATED_FLOOR_AREA),
            egh_rating: Measurement::new(parsed.float(EGH_RATING), parsed.float(UGR_RATING)),
            ers_rating: Measurement::new(parsed.int(ERS_RATING), parsed.int(UGR_ERS_RATING)),
            greenhouse_gas_emissions: Measurement::new(
                parsed.float(ERS_GHG),
                parsed.float(UGR_ERS_GHG),
            ),
            energy_intensity: Measurement::new(
                parsed.float(ERS_ENERGY_INTENSITY),
                parsed.float(UGR_ERS_ENERGY_INTENSITY),
            ),
            walls: Measurement::new(
                Wall::from_data(parsed.str(WALL_DEFINITION), parsed.float(EGH_HEAT_LOST_WALLS))?,
                Wall::from_data(
                    parsed.str(UGR_WALL_DEFINITION),
                    parsed.float(UGR_HEAT_LOST_WALLS),
                )?,
            ),
            design_heat_loss: Measurement::new(
                parsed.float(EGH_DESIGN_HEAT_LOSS),
                parsed.float(UGR_DESIGN_HEAT_LOSS),
            ),
        })
    }
}

impl DatedEvaluation for ParsedDwellingDataRow {
    fn evaluation_type(&self) -> EvaluationType {
        self.eval_type
    }

    fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }
}

fn invalid(field: &str) -> EnerguideError {
    EnerguideError::InvalidInputData(ValidationErrors::single(field, FieldError::Required))
}

/// Pull a required field out of a validated row. Validation guarantees
/// presence, so a miss here means the schema and this code disagree.
fn required<'a, T>(
    parsed: &'a CoercedRow,
    field: &str,
    get: impl Fn(&'a CoercedRow, &str) -> Option<T>,
) -> Result<T> {
    get(parsed, field).ok_or_else(|| invalid(field))
}

/// A single audit of a dwelling, in output-document form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub file_id: String,
    pub evaluation_id: i64,
    pub evaluation_type: EvaluationType,
    pub house_type: Option<String>,
    pub entry_date: NaiveDate,
    pub creation_date: NaiveDateTime,
    pub modification_date: Option<NaiveDateTime>,
    pub energy_upgrades: Vec<Upgrade>,
    pub water_heatings: Vec<WaterHeating>,
    pub heated_floor_area: Option<f64>,
    pub egh_rating: Measurement<f64>,
    pub ers_rating: Measurement<i64>,
    pub greenhouse_gas_emissions: Measurement<f64>,
    pub energy_intensity: Measurement<f64>,
    pub walls: Measurement<Wall>,
    pub design_heat_loss: Measurement<f64>,
}

impl Evaluation {
    pub fn from_data(data: ParsedDwellingDataRow) -> Evaluation {
        Evaluation {
            file_id: data.file_id,
            evaluation_id: data.eval_id,
            evaluation_type: data.eval_type,
            house_type: data.house_type,
            entry_date: data.entry_date,
            creation_date: data.creation_date,
            modification_date: data.modification_date,
            energy_upgrades: data.energy_upgrades,
            water_heatings: data.water_heatings,
            heated_floor_area: data.heated_floor_area,
            egh_rating: data.egh_rating,
            ers_rating: data.ers_rating,
            greenhouse_gas_emissions: data.greenhouse_gas_emissions,
            energy_intensity: data.energy_intensity,
            walls: data.walls,
            design_heat_loss: data.design_heat_loss,
        }
    }
}

/// Every surviving evaluation of one house.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dwelling {
    pub house_id: i64,
    pub year_built: i64,
    pub city: String,
    pub region: Region,
    pub forward_sortation_area: String,
    pub evaluations: Vec<Evaluation>,
}

impl Dwelling {
    pub fn from_group(rows: &[RawRecord]) -> Result<Dwelling> {
        Self::from_group_with_policy(rows, LabelPolicy::default())
    }

    pub fn from_group_with_policy(rows: &[RawRecord], policy: LabelPolicy) -> Result<Dwelling> {
        let parsed = rows
            .iter()
            .map(|row| ParsedDwellingDataRow::from_row_with_policy(row, policy))
            .collect::<Result<Vec<_>>>()?;
        Self::from_parsed_group(parsed)
    }

    pub fn from_parsed_group(rows: Vec<ParsedDwellingDataRow>) -> Result<Dwelling> {
        let Some(first) = rows.first() else {
            return Err(EnerguideError::InvalidGroupSize(
                "Empty groups are invalid".to_string(),
            ));
        };

        let house_id = first.house_id;
        let year_built = first.year_built;
        let city = first.city.clone();
        let region = first.region;
        let forward_sortation_area = first.forward_sortation_area.clone();

        let evaluations = filter_dummy_evaluations(rows)
            .into_iter()
            .map(Evaluation::from_data)
            .collect();

        Ok(Dwelling {
            house_id,
            year_built,
            city,
            region,
            forward_sortation_area,
            evaluations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompositeValue, ToDict};
    use crate::error::DataClass;
    use serde_json::{json, Value};

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    fn sample_input_d() -> RawRecord {
        record(json!({
            "HOUSE_ID": "456",
            "EVAL_ID": "123",
            "EVAL_TYPE": "D",
            "ENTRYDATE": "2018-01-01",
            "CREATIONDATE": "2018-01-08 09:00:00",
            "MODIFICATIONDATE": "2018-06-01 09:00:00",
            "CLIENTCITY": "Ottawa",
            "forwardSortationArea": "K1P",
            "HOUSEREGION": "Ontario",
            "YEARBUILT": "2000",
            "BUILDER": "4K13D01404",
            "HEATEDFLOORAREA": "12.34",
            "TYPEOFHOUSE": "Single detached",
            "ERSRATING": "567",
            "UGRERSRATING": "565",
            "ERSGHG": "12.5",
            "UGRERSGHG": "12.34",
            "upgrades": [
                "<Ceilings cost=\"0\" priority=\"12\" />",
                "<MainWalls cost=\"1\" priority=\"2\" />",
                "<Foundation cost=\"2\" priority=\"3\" />",
            ],
            "ERSENERGYINTENSITY": "0.82",
            "UGRERSENERGYINTENSITY": "0.80",
            "EGHRATING": "50.5",
            "UGRRATING": "49.0",
            "WALLDEF": "45.3;12;50;12;4.7;12",
            "UGRWALLDEF": "45.3;12;50;12;4.7;10",
            "EGHHLWALLS": "27799.9",
            "UGRHLWALLS": "27799.9",
            "EGHDESHTLOSS": "11242.1",
            "UGRDESHTLOSS": "10757.3",
        }))
    }

    fn sample_input_e() -> RawRecord {
        let mut row = sample_input_d();
        row.insert(EVAL_TYPE.into(), json!("E"));
        row.insert(ENTRY_DATE.into(), json!("2018-01-02"));
        row
    }

    fn with(mut row: RawRecord, field: &str, value: Value) -> RawRecord {
        row.insert(field.into(), value);
        row
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn wall(last_r_value: f64) -> Wall {
        Wall {
            insulation: vec![
                CompositeValue::new(45.3, 12.0, "rValue"),
                CompositeValue::new(50.0, 12.0, "rValue"),
                CompositeValue::new(4.7, last_r_value, "rValue"),
            ],
            heat_lost: 27799.9,
        }
    }

    #[test]
    fn test_from_row() {
        let output = ParsedDwellingDataRow::from_row(&sample_input_d()).unwrap();

        let upgrade = |kind: &str, cost: f64, priority: i64| Upgrade {
            upgrade_type: kind.to_string(),
            cost,
            priority,
        };

        assert_eq!(
            output,
            ParsedDwellingDataRow {
                house_id: 456,
                eval_id: 123,
                file_id: "4K13D01404".to_string(),
                eval_type: EvaluationType::PreRetrofit,
                entry_date: date(2018, 1, 1),
                creation_date: datetime(2018, 1, 8, 9),
                modification_date: Some(datetime(2018, 6, 1, 9)),
                year_built: 2000,
                city: "Ottawa".to_string(),
                region: Region::Ontario,
                forward_sortation_area: "K1P".to_string(),
                house_type: Some("Single detached".to_string()),
                energy_upgrades: vec![
                    upgrade("Ceilings", 0.0, 12),
                    upgrade("MainWalls", 1.0, 2),
                    upgrade("Foundation", 2.0, 3),
                ],
                water_heatings: Vec::new(),
                heated_floor_area: Some(12.34),
                egh_rating: Measurement::new(Some(50.5), Some(49.0)),
                ers_rating: Measurement::new(Some(567), Some(565)),
                greenhouse_gas_emissions: Measurement::new(Some(12.5), Some(12.34)),
                energy_intensity: Measurement::new(Some(0.82), Some(0.80)),
                walls: Measurement::new(Some(wall(12.0)), Some(wall(10.0))),
                design_heat_loss: Measurement::new(Some(11242.1), Some(10757.3)),
            }
        );
    }

    #[test]
    fn test_null_fields_are_accepted() {
        let row = with(sample_input_d(), MODIFICATION_DATE, Value::Null);
        let row = with(row, ERS_RATING, Value::Null);
        let row = with(row, UGR_ERS_RATING, Value::Null);
        let output = ParsedDwellingDataRow::from_row(&row).unwrap();

        assert_eq!(output.modification_date, None);
        assert_eq!(output.ers_rating, Measurement::empty());
    }

    #[test]
    fn test_null_wall_definition() {
        let row = with(sample_input_d(), UGR_WALL_DEFINITION, Value::Null);
        let output = ParsedDwellingDataRow::from_row(&row).unwrap();
        assert_eq!(output.walls.upgrade, None);
        assert!(output.walls.measurement.is_some());
    }

    #[test]
    fn test_bad_postal_code() {
        let row = with(sample_input_d(), FORWARD_SORTATION_AREA, json!("K16"));
        let err = ParsedDwellingDataRow::from_row(&row).unwrap_err();
        match err {
            EnerguideError::InvalidInputData(errors) => {
                assert_eq!(errors.fields().collect::<Vec<_>>(), vec![FORWARD_SORTATION_AREA]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_from_bad_row() {
        let row = record(json!({"EVAL_ID": 123}));
        let err = ParsedDwellingDataRow::from_row(&row).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validator failed on keys:"));
        assert!(message.contains(EVAL_TYPE));
        assert!(!message.contains("EVAL_ID"));
    }

    #[test]
    fn test_bad_upgrade_is_embedded_error() {
        let row = with(sample_input_d(), UPGRADES, json!(["<Ceilings cost=\"free\" priority=\"1\" />"]));
        let err = ParsedDwellingDataRow::from_row(&row).unwrap_err();
        assert_eq!(err.data_class(), Some(DataClass::Upgrade));
    }

    #[test]
    fn test_water_heatings_fragment() {
        let hot_water = r#"<HotWater><Primary>
            <EnergySource code="1"><English>Electricity</English></EnergySource>
            <TankType code="2"><English>Conventional tank</English></TankType>
            <TankVolume value="189.3001" />
            <EnergyFactor value="0.8217" />
        </Primary></HotWater>"#;
        let row = with(sample_input_d(), WATER_HEATINGS, json!(hot_water));
        let output = ParsedDwellingDataRow::from_row(&row).unwrap();
        assert_eq!(output.water_heatings.len(), 1);
        assert_eq!(output.water_heatings[0].efficiency_ef, Some(0.8217));
    }

    fn hot_water(tank_type: &str) -> Value {
        json!(format!(
            r#"<HotWater><Primary>
                <EnergySource code="1"><English>Electricity</English></EnergySource>
                {}
                <TankVolume value="189.3001" />
                <EnergyFactor value="0.8217" />
            </Primary></HotWater>"#,
            tank_type
        ))
    }

    #[test]
    fn test_water_heating_label_mismatch_follows_policy() {
        let row = with(
            sample_input_d(),
            WATER_HEATINGS,
            hot_water(r#"<TankType code="2"><English>Tankless</English></TankType>"#),
        );

        let err = ParsedDwellingDataRow::from_row(&row).unwrap_err();
        assert_eq!(err.data_class(), Some(DataClass::WaterHeating));
        let err = Dwelling::from_group(&[row.clone(), sample_input_e()]).unwrap_err();
        assert_eq!(err.data_class(), Some(DataClass::WaterHeating));

        let output = Dwelling::from_group_with_policy(&[row, sample_input_e()], LabelPolicy::Warn).unwrap();
        assert_eq!(output.evaluations.len(), 2);
        let pre = &output.evaluations[1];
        assert_eq!(pre.evaluation_type, EvaluationType::PreRetrofit);
        assert_eq!(pre.water_heatings.len(), 1);
    }

    #[test]
    fn test_unknown_water_heater_code_fails_under_every_policy() {
        let row = with(
            sample_input_d(),
            WATER_HEATINGS,
            hot_water(r#"<TankType code="42"><English>Mystery tank</English></TankType>"#),
        );
        for policy in [LabelPolicy::Strict, LabelPolicy::Warn] {
            let err = ParsedDwellingDataRow::from_row_with_policy(&row, policy).unwrap_err();
            assert_eq!(err.data_class(), Some(DataClass::WaterHeating));
            assert!(err.to_string().contains("Mystery tank"), "{}", err);
        }
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let row = with(sample_input_d(), WALL_DEFINITION, json!("inf;NaN"));
        let err = ParsedDwellingDataRow::from_row(&row).unwrap_err();
        assert_eq!(err.data_class(), Some(DataClass::Wall));

        let row = with(sample_input_d(), EGH_RATING, json!("NaN"));
        match ParsedDwellingDataRow::from_row(&row).unwrap_err() {
            EnerguideError::InvalidInputData(errors) => {
                assert_eq!(errors.fields().collect::<Vec<_>>(), vec![EGH_RATING]);
            }
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn test_offset_creation_date_is_utc() {
        let row = with(sample_input_d(), CREATION_DATE, json!("2018-01-08T09:00:00+05:00"));
        let output = Evaluation::from_data(ParsedDwellingDataRow::from_row(&row).unwrap());
        assert_eq!(output.creation_date, datetime(2018, 1, 8, 4));
        assert_eq!(output.to_dict()["creationDate"], json!("2018-01-08T04:00:00"));
    }

    #[test]
    fn test_evaluation_fields() {
        let parsed = ParsedDwellingDataRow::from_row(&sample_input_d()).unwrap();
        let output = Evaluation::from_data(parsed);
        assert_eq!(output.evaluation_type, EvaluationType::PreRetrofit);
        assert_eq!(output.entry_date, date(2018, 1, 1));
        assert_eq!(output.creation_date, datetime(2018, 1, 8, 9));
        assert_eq!(output.modification_date, Some(datetime(2018, 6, 1, 9)));
    }

    #[test]
    fn test_evaluation_to_dict() {
        let parsed = ParsedDwellingDataRow::from_row(&sample_input_d()).unwrap();
        let output = Evaluation::from_data(parsed).to_dict();
        let insulation = |last: f64| {
            json!([
                {"percentage": 45.3, "rValue": 12.0},
                {"percentage": 50.0, "rValue": 12.0},
                {"percentage": 4.7, "rValue": last},
            ])
        };

        assert_eq!(
            output,
            json!({
                "fileId": "4K13D01404",
                "evaluationId": 123,
                "evaluationType": "D",
                "houseType": "Single detached",
                "entryDate": "2018-01-01",
                "creationDate": "2018-01-08T09:00:00",
                "modificationDate": "2018-06-01T09:00:00",
                "energyUpgrades": [
                    {"upgradeType": "Ceilings", "cost": 0.0, "priority": 12},
                    {"upgradeType": "MainWalls", "cost": 1.0, "priority": 2},
                    {"upgradeType": "Foundation", "cost": 2.0, "priority": 3},
                ],
                "waterHeatings": [],
                "heatedFloorArea": 12.34,
                "eghRating": {"measurement": 50.5, "upgrade": 49.0},
                "ersRating": {"measurement": 567, "upgrade": 565},
                "greenhouseGasEmissions": {"measurement": 12.5, "upgrade": 12.34},
                "energyIntensity": {"measurement": 0.82, "upgrade": 0.80},
                "walls": {
                    "measurement": {"insulation": insulation(12.0), "heatLost": 27799.9},
                    "upgrade": {"insulation": insulation(10.0), "heatLost": 27799.9},
                },
                "designHeatLoss": {"measurement": 11242.1, "upgrade": 10757.3},
            })
        );
    }

    #[test]
    fn test_dwelling_fields() {
        let output = Dwelling::from_group(&[sample_input_d(), sample_input_e()]).unwrap();
        assert_eq!(output.house_id, 456);
        assert_eq!(output.year_built, 2000);
        assert_eq!(output.city, "Ottawa");
        assert_eq!(output.region, Region::Ontario);
        assert_eq!(output.forward_sortation_area, "K1P");
        assert_eq!(output.evaluations.len(), 2);
    }

    #[test]
    fn test_no_data() {
        let err = Dwelling::from_group(&[]).unwrap_err();
        assert!(matches!(err, EnerguideError::InvalidGroupSize(_)));
    }

    #[test]
    fn test_dwelling_to_dict() {
        let mut output = Dwelling::from_group(&[sample_input_d(), sample_input_e()])
            .unwrap()
            .to_dict();
        let evaluations = output
            .as_object_mut()
            .unwrap()
            .remove("evaluations")
            .unwrap();

        assert_eq!(
            output,
            json!({
                "houseId": 456,
                "yearBuilt": 2000,
                "city": "Ottawa",
                "region": "ON",
                "forwardSortationArea": "K1P",
            })
        );
        assert!(output.get("postalCode").is_none());
        assert_eq!(evaluations.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_filter_dummies() {
        let dummy_d = with(sample_input_e(), EVAL_TYPE, json!("D"));
        let new_e = with(sample_input_e(), ENTRY_DATE, json!("2018-06-01"));
        let new_f = with(
            with(sample_input_e(), EVAL_TYPE, json!("F")),
            ENTRY_DATE,
            json!("2018-08-01"),
        );

        let output =
            Dwelling::from_group(&[sample_input_d(), sample_input_e(), dummy_d, new_e, new_f]).unwrap();
        assert_eq!(output.evaluations.len(), 4);

        let kinds: Vec<_> = output.evaluations.iter().map(|e| e.evaluation_type).collect();
        assert_eq!(
            kinds,
            vec![
                EvaluationType::Incentive,
                EvaluationType::PostRetrofit,
                EvaluationType::PostRetrofit,
                EvaluationType::PreRetrofit,
            ]
        );
    }

    #[test]
    fn test_pre_and_post_same_date() {
        let post = with(sample_input_d(), EVAL_TYPE, json!("E"));
        let output = Dwelling::from_group(&[sample_input_d(), post]).unwrap();
        assert_eq!(output.evaluations.len(), 1);
        assert_eq!(output.evaluations[0].evaluation_type, EvaluationType::PostRetrofit);
    }

    #[test]
    fn test_bad_row_fails_group() {
        let bad = with(sample_input_e(), YEAR_BUILT, json!("two thousand"));
        let err = Dwelling::from_group(&[sample_input_d(), bad]).unwrap_err();
        assert!(matches!(err, EnerguideError::InvalidInputData(_)));
    }
}
