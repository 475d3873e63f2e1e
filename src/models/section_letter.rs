use serde::Serialize;

/// Section letter within a grade. Anything outside A-D is stored as `U`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SectionLetter {
    A,
    B,
    C,
    D,
    Unassigned,
}

impl SectionLetter {
    pub fn code(&self) -> &'static str {
        match self {
            SectionLetter::A => "A",
            SectionLetter::B => "B",
            SectionLetter::C => "C",
            SectionLetter::D => "D",
            SectionLetter::Unassigned => "U",
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "A" => Some(SectionLetter::A),
            "B" => Some(SectionLetter::B),
            "C" => Some(SectionLetter::C),
            "D" => Some(SectionLetter::D),
            "U" => Some(SectionLetter::Unassigned),
            _ => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        !matches!(self, SectionLetter::Unassigned)
    }
}
