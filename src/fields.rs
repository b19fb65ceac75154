//! The eleven form controls and their closed option lists.
//!
//! Column names are the names the model was trained on. Option strings are
//! the exact categories the encoders were fitted on, typos included
//! ("Darkeness: No street lighting"), so do not tidy them.

use serde::Serialize;

/// How a display selection becomes a raw record value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Kept as the display string; an encoder for the column must exist.
    Categorical,
    /// Kept as the display string, open-ended top bucket included. Encoded
    /// only if the encoder set happens to carry the column.
    Count,
    /// Static display → integer table.
    Lookup(&'static [(&'static str, i64)]),
    /// Display string parsed as an integer.
    Integer,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormField {
    pub column: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
    #[serde(skip)]
    pub conversion: Conversion,
}

pub static DAY_OF_WEEK: [(&str, i64); 7] = [
    ("Monday", 1),
    ("Tuesday", 2),
    ("Wednesday", 3),
    ("Thursday", 4),
    ("Friday", 5),
    ("Saturday", 6),
    ("Sunday", 7),
];

pub static URBAN_RURAL: [(&str, i64); 2] = [("Urban", 1), ("Rural", 2)];

pub const WEATHER_CONDITIONS: &str = "Weather_Conditions";
pub const ROAD_SURFACE_CONDITIONS: &str = "Road_Surface_Conditions";
pub const LIGHT_CONDITIONS: &str = "Light_Conditions";
pub const URBAN_OR_RURAL_AREA: &str = "Urban_or_Rural_Area";
pub const ROAD_TYPE: &str = "Road_Type";
pub const SPEED_LIMIT: &str = "Speed_limit";
pub const NUMBER_OF_VEHICLES: &str = "Number_of_Vehicles";
pub const NUMBER_OF_CASUALTIES: &str = "Number_of_Casualties";
pub const DAY_OF_WEEK_COLUMN: &str = "Day_of_Week";
pub const JUNCTION_CONTROL: &str = "Junction_Control";
pub const PEDESTRIAN_FACILITIES: &str = "Pedestrian_Crossing-Physical_Facilities";

/// Form controls in display order.
pub static FIELDS: [FormField; 11] = [
    FormField {
        column: WEATHER_CONDITIONS,
        label: "Weather Conditions",
        options: &[
            "Fine without high winds",
            "Fine with high winds",
            "Raining without high winds",
            "Raining with high winds",
            "Snowing without high winds",
            "Snowing with high winds",
            "Fog or mist",
        ],
        conversion: Conversion::Categorical,
    },
    FormField {
        column: ROAD_SURFACE_CONDITIONS,
        label: "Road Surface Conditions",
        options: &[
            "Dry",
            "Wet/Damp",
            "Frost/Ice",
            "Snow",
            "Flood (Over 3cm of water)",
            "Normal",
        ],
        conversion: Conversion::Categorical,
    },
    FormField {
        column: LIGHT_CONDITIONS,
        label: "Light Conditions",
        options: &[
            "Daylight: Street light present",
            "Darkness: Street lights present and lit",
            "Darkness: Street lights present but unlit",
            "Darkness: Street lighting unknown",
            "Darkeness: No street lighting",
        ],
        conversion: Conversion::Categorical,
    },
    FormField {
        column: URBAN_OR_RURAL_AREA,
        label: "Urban or Rural Area",
        options: &["Urban", "Rural"],
        conversion: Conversion::Lookup(&URBAN_RURAL),
    },
    FormField {
        column: ROAD_TYPE,
        label: "Road Type",
        options: &[
            "Single carriageway",
            "Dual carriageway",
            "One way street",
            "Roundabout",
            "Slip road",
            "Unknown",
        ],
        conversion: Conversion::Categorical,
    },
    FormField {
        column: SPEED_LIMIT,
        label: "Speed Limit (mph)",
        options: &["10", "15", "20", "30", "40", "50", "60", "70"],
        conversion: Conversion::Integer,
    },
    FormField {
        column: NUMBER_OF_VEHICLES,
        label: "Number of Vehicles",
        options: &["1", "2", "3", "4", "5+"],
        conversion: Conversion::Count,
    },
    FormField {
        column: NUMBER_OF_CASUALTIES,
        label: "Number of Casualties",
        options: &["1", "2", "3", "4", "5", "6", "7", "8+"],
        conversion: Conversion::Count,
    },
    FormField {
        column: DAY_OF_WEEK_COLUMN,
        label: "Day of Week",
        options: &[
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ],
        conversion: Conversion::Lookup(&DAY_OF_WEEK),
    },
    FormField {
        column: JUNCTION_CONTROL,
        label: "Junction Control",
        options: &[
            "Automatic traffic signal",
            "Giveway or uncontrolled",
            "Stop Sign",
            "Authorised person",
        ],
        conversion: Conversion::Categorical,
    },
    FormField {
        column: PEDESTRIAN_FACILITIES,
        label: "Pedestrian Crossing Facility",
        options: &[
            "Zebra crossing",
            "Pedestrian phase at traffic signal junction",
            "No crossing within 50 meters",
            "Pedestrian island (formerly 'Central refuge')",
            "Non-junction pedestrian crossing",
            "Footbridge or subway",
        ],
        conversion: Conversion::Categorical,
    },
];

pub fn field(column: &str) -> Option<&'static FormField> {
    FIELDS.iter().find(|f| f.column == column)
}

/// Columns that must have a fitted encoder.
pub fn categorical_columns() -> impl Iterator<Item = &'static str> {
    FIELDS
        .iter()
        .filter(|f| f.conversion == Conversion::Categorical)
        .map(|f| f.column)
}

pub fn lookup_code(table: &[(&str, i64)], display: &str) -> Option<i64> {
    table
        .iter()
        .find(|(name, _)| *name == display)
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_day_of_week_is_bijection() {
        let codes: HashSet<i64> = DAY_OF_WEEK.iter().map(|(_, c)| *c).collect();
        assert_eq!(codes, (1..=7).collect::<HashSet<_>>());
        assert_eq!(lookup_code(&DAY_OF_WEEK, "Monday"), Some(1));
        assert_eq!(lookup_code(&DAY_OF_WEEK, "Sunday"), Some(7));
        assert_eq!(lookup_code(&DAY_OF_WEEK, "Funday"), None);
    }

    #[test]
    fn test_urban_rural_is_bijection() {
        assert_eq!(lookup_code(&URBAN_RURAL, "Urban"), Some(1));
        assert_eq!(lookup_code(&URBAN_RURAL, "Rural"), Some(2));
        assert_eq!(URBAN_RURAL.len(), 2);
    }

    #[test]
    fn test_lookup_options_match_tables() {
        for f in FIELDS.iter() {
            if let Conversion::Lookup(table) = f.conversion {
                let keys: Vec<&str> = table.iter().map(|(k, _)| *k).collect();
                assert_eq!(keys, f.options, "options drift for {}", f.column);
            }
        }
    }

    #[test]
    fn test_integer_options_parse() {
        for f in FIELDS.iter().filter(|f| f.conversion == Conversion::Integer) {
            for opt in f.options {
                assert!(opt.parse::<i64>().is_ok(), "{} option {}", f.column, opt);
            }
        }
    }

    #[test]
    fn test_field_table_shape() {
        let columns: HashSet<&str> = FIELDS.iter().map(|f| f.column).collect();
        assert_eq!(columns.len(), 11);
        assert_eq!(field(WEATHER_CONDITIONS).map(|f| f.options.len()), Some(7));
        assert_eq!(categorical_columns().count(), 6);
        assert!(field("Number_of_Pedestrians").is_none());
    }
}
