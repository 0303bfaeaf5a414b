use std::{fmt, sync::Arc};

/// Integer identifier of a taxi zone (`LocationID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneId(pub i64);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<i64> for ZoneId {
    fn from(id: i64) -> Self { Self(id) }
}

/// Census tract identifier.
/// Kept as text so leading zeros survive (e.g. "1000100"); numeric source fields are
/// rendered as integer text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TractId(Arc<str>);

impl TractId {
    pub fn new(id: impl AsRef<str>) -> Self { Self(Arc::from(id.as_ref().trim())) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for TractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for TractId {
    fn from(id: &str) -> Self { Self::new(id) }
}
