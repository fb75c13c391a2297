/// Raw extract column names to ensure consistency across the codebase.
/// These are the keys of a raw row as exported from the EnerGuide database.

// Identity and dates
pub const EVAL_ID: &str = "EVAL_ID";
pub const HOUSE_ID: &str = "HOUSE_ID";
pub const EVAL_TYPE: &str = "EVAL_TYPE";
pub const ENTRY_DATE: &str = "ENTRYDATE";
pub const CREATION_DATE: &str = "CREATIONDATE";
pub const MODIFICATION_DATE: &str = "MODIFICATIONDATE";
pub const YEAR_BUILT: &str = "YEARBUILT";
pub const CLIENT_CITY: &str = "CLIENTCITY";
pub const FORWARD_SORTATION_AREA: &str = "forwardSortationArea";
pub const HOUSE_REGION: &str = "HOUSEREGION";
pub const BUILDER: &str = "BUILDER";

// Embedded fragments
pub const UPGRADES: &str = "upgrades";
pub const WATER_HEATINGS: &str = "waterHeatings";

// House characteristics
pub const HEATED_FLOOR_AREA: &str = "HEATEDFLOORAREA";
pub const TYPE_OF_HOUSE: &str = "TYPEOFHOUSE";

// Measurement pairs: as-built / post-upgrade
pub const EGH_RATING: &str = "EGHRATING";
pub const UGR_RATING: &str = "UGRRATING";
pub const ERS_RATING: &str = "ERSRATING";
pub const UGR_ERS_RATING: &str = "UGRERSRATING";
pub const ERS_GHG: &str = "ERSGHG";
pub const UGR_ERS_GHG: &str = "UGRERSGHG";
pub const ERS_ENERGY_INTENSITY: &str = "ERSENERGYINTENSITY";
pub const UGR_ERS_ENERGY_INTENSITY: &str = "UGRERSENERGYINTENSITY";
pub const EGH_DESIGN_HEAT_LOSS: &str = "EGHDESHTLOSS";
pub const UGR_DESIGN_HEAT_LOSS: &str = "UGRDESHTLOSS";
pub const WALL_DEFINITION: &str = "WALLDEF";
pub const UGR_WALL_DEFINITION: &str = "UGRWALLDEF";
pub const EGH_HEAT_LOST_WALLS: &str = "EGHHLWALLS";
pub const UGR_HEAT_LOST_WALLS: &str = "UGRHLWALLS";

/// Rows sharing this field belong to the same dwelling.
pub const GROUPING_FIELD: &str = HOUSE_ID;

// Extract (CSV) input
pub const RAW_XML: &str = "RAW_XML";

/// Forward sortation area: letter, digit, letter.
pub const FSA_PATTERN: &str = "[A-Z][0-9][A-Z]";

/// US gallons per litre.
pub const GALLONS_PER_LITRE: f64 = 0.264172;
