//! The four BASIC type sigils (`%!#$`).

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Sigil {
    Integer,
    Single,
    Double,
    String,
}

impl Sigil {
    pub fn as_char(self) -> char {
        match self {
            Sigil::Integer => '%',
            Sigil::Single => '!',
            Sigil::Double => '#',
            Sigil::String => '$',
        }
    }

    /// Storage size in bytes, per the wire/in-memory layout table.
    pub fn size_bytes(self) -> usize {
        match self {
            Sigil::Integer => 2,
            Sigil::Single => 4,
            Sigil::Double => 8,
            Sigil::String => 3,
        }
    }

    pub fn from_size_bytes(size: usize) -> Option<Self> {
        match size {
            2 => Some(Sigil::Integer),
            3 => Some(Sigil::String),
            4 => Some(Sigil::Single),
            8 => Some(Sigil::Double),
            _ => None,
        }
    }
}

impl fmt::Display for Sigil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
