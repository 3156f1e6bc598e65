use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 24-character lowercase hex identifier shared by every stored record.
///
/// Layout: 4 bytes of unix seconds followed by 8 random bytes, so ids sort
/// roughly by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct RecordId(String);

impl RecordId {
    pub(crate) const LEN: usize = 24;

    pub(crate) fn generate() -> Self {
        let seconds = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let entropy: u64 = rand::random();
        Self(format!("{seconds:08x}{entropy:016x}"))
    }

    /// Returns `None` unless `raw` is exactly 24 hex digits.
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        if raw.len() == Self::LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Wraps an id read back from storage, where the format is enforced by a
    /// table constraint.
    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
