//! Consent categories and the persisted record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConsentError;

/// Version written into new records.
pub const RECORD_VERSION: u32 = 1;

/// Cookie category a visitor can consent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsentCategory {
    /// Strictly necessary cookies; always granted.
    Essential,
    /// Analytics (GA4).
    Analytics,
    /// Marketing pixels (`TikTok`, Facebook).
    Marketing,
}

impl ConsentCategory {
    /// All categories.
    pub const ALL: [Self; 3] = [Self::Essential, Self::Analytics, Self::Marketing];

    /// Category key as stored in the record.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Analytics => "analytics",
            Self::Marketing => "marketing",
        }
    }
}

impl fmt::Display for ConsentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsentCategory {
    type Err = ConsentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConsentError::UnknownCategory(s.to_owned()))
    }
}

/// The visitor's decision per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentState {
    /// Always `true` for states written by this crate.
    pub essential: bool,
    /// Analytics granted.
    pub analytics: bool,
    /// Marketing granted.
    pub marketing: bool,
}

impl Default for ConsentState {
    fn default() -> Self {
        Self::essential_only()
    }
}

impl ConsentState {
    /// Every category granted.
    #[must_use]
    pub fn all() -> Self {
        Self {
            essential: true,
            analytics: true,
            marketing: true,
        }
    }

    /// Only essential cookies.
    #[must_use]
    pub fn essential_only() -> Self {
        Self {
            essential: true,
            analytics: false,
            marketing: false,
        }
    }

    /// Essential plus the given categories.
    #[must_use]
    pub fn with_categories(categories: &[ConsentCategory]) -> Self {
        let mut state = Self::essential_only();
        for category in categories {
            match category {
                ConsentCategory::Essential => {}
                ConsentCategory::Analytics => state.analytics = true,
                ConsentCategory::Marketing => state.marketing = true,
            }
        }
        state
    }

    /// Whether `category` is granted.
    #[must_use]
    pub fn allows(&self, category: ConsentCategory) -> bool {
        match category {
            ConsentCategory::Essential => self.essential,
            ConsentCategory::Analytics => self.analytics,
            ConsentCategory::Marketing => self.marketing,
        }
    }
}

/// Persisted consent: the decision plus when it was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    /// The decision.
    pub consent: ConsentState,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Record format version.
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    RECORD_VERSION
}

impl ConsentRecord {
    /// Record `consent` made at `timestamp`.
    #[must_use]
    pub fn new(consent: ConsentState, timestamp: u64) -> Self {
        Self {
            consent,
            timestamp,
            version: RECORD_VERSION,
        }
    }

    /// Whether the record is older than `max_age_ms` at `now_ms`.
    #[must_use]
    pub fn is_expired(&self, now_ms: u64, max_age_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) > max_age_ms
    }
}
