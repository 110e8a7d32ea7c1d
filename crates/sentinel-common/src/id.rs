//! Assessment identifiers: `sa-YYYYMMDD-HHMMSS-xxxx`.
//!
//! The timestamp is the scoring instant in UTC. The suffix is four
//! lowercase base32 characters drawn from a v4 UUID, so ids created in the
//! same second still differ.

use chrono::{DateTime, NaiveDateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "sa-";
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
const SUFFIX_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";
const SUFFIX_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AssessmentId(String);

impl AssessmentId {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Id stamped with `now`. Used for reproducible results.
    pub fn at(now: DateTime<Utc>) -> Self {
        let mut bits = uuid::Uuid::new_v4().as_u128();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let c = SUFFIX_ALPHABET[(bits & 0x1f) as usize] as char;
                bits >>= 5;
                c
            })
            .collect();
        AssessmentId(format!("{PREFIX}{}-{suffix}", now.format(STAMP_FORMAT)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssessmentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| format!("assessment id must start with {PREFIX:?}: {s}"))?;
        let (stamp, suffix) = rest
            .rsplit_once('-')
            .ok_or_else(|| format!("assessment id has no suffix: {s}"))?;
        NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT)
            .map_err(|e| format!("bad timestamp in assessment id {s}: {e}"))?;
        let suffix_ok = suffix.len() == SUFFIX_LEN
            && suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b));
        if !suffix_ok {
            return Err(format!("bad suffix in assessment id: {s}"));
        }
        Ok(AssessmentId(s.to_string()))
    }
}
