//! Veteran identity and legacy appeal status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// A validated social security number
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ssn(String);

impl Ssn {
    /// Accepts exactly nine ASCII digits
    pub fn parse(value: &str) -> Result<Self, ReviewError> {
        if value.len() == 9 && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(ReviewError::InvalidSsn)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the full number in logs
impl std::fmt::Debug for Ssn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ssn(***-**-{})", &self.0[5..])
    }
}

/// Converts a claims file number to the legacy appeals system id
///
/// Nine character file numbers are social security numbers and get an `S`
/// suffix; shorter claim numbers lose leading zeros and get a `C` suffix.
pub fn vacols_id_for_file_number(file_number: &str) -> Result<String, ReviewError> {
    let trimmed = file_number.trim();
    match trimmed.len() {
        9 => Ok(format!("{trimmed}S")),
        1..=8 => Ok(format!("{}C", trimmed.trim_start_matches('0'))),
        _ => Err(ReviewError::InvalidFileNumber(file_number.to_string())),
    }
}

/// Status of one legacy appeal series from the legacy appeals system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAppealStatus {
    pub id: String,
    pub appeal_ids: Vec<String>,
    pub status_type: String,
    pub active: bool,
    pub aoj: String,
    pub program_area: String,
    pub description: String,
    pub updated: DateTime<Utc>,
}

impl LegacyAppealStatus {
    /// The status API only reports appeals originating at VBA
    pub fn is_vba(&self) -> bool {
        self.aoj == "vba"
    }
}
