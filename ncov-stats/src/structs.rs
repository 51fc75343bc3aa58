#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Key names of the statistics API's result rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    pub updated_at: String,
    pub confirmed: String,
    pub suspected: String,
    pub cured: String,
    pub dead: String,
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            updated_at: "updateTime".into(),
            confirmed: "confirmedCount".into(),
            suspected: "suspectedCount".into(),
            cured: "curedCount".into(),
            dead: "deadCount".into(),
        }
    }
}

impl Fields {
    /// All required keys, in the order rows are validated.
    pub fn required(&self) -> [&str; 5] {
        [
            self.updated_at.as_str(),
            self.confirmed.as_str(),
            self.suspected.as_str(),
            self.cured.as_str(),
            self.dead.as_str(),
        ]
    }
}

/// One validated statistics snapshot.
///
/// The `uid` only encodes the UTC calendar day of `updated_at`, so every
/// snapshot published on the same day maps to the same calendar event.
/// Calendar clients then replace the day's entry instead of stacking them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CanonicalRecord {
    pub confirmed: u64,
    pub suspected: u64,
    pub cured: u64,
    pub dead: u64,
    pub updated_at: String,
    pub updated_at_unix_timestamp: i64,
    pub uid: String,
}
