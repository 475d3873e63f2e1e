use serde::Serialize;

/// School weekdays, in timetable column order (column 1 = Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Convert enum → DB string (Spanish day names, as stored by the school)
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "lunes",
            Weekday::Tuesday => "martes",
            Weekday::Wednesday => "miercoles",
            Weekday::Thursday => "jueves",
            Weekday::Friday => "viernes",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "lunes" => Some(Weekday::Monday),
            "martes" => Some(Weekday::Tuesday),
            "miercoles" => Some(Weekday::Wednesday),
            "jueves" => Some(Weekday::Thursday),
            "viernes" => Some(Weekday::Friday),
            _ => None,
        }
    }
}
