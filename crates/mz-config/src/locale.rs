//! Site locales.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::ConfigError;

/// Locale the site content is published in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum Locale {
    /// Swiss German (default).
    #[default]
    #[serde(rename = "de-CH")]
    DeCh,
    /// Swiss French.
    #[serde(rename = "fr-CH")]
    FrCh,
    /// Swiss Italian.
    #[serde(rename = "it-CH")]
    ItCh,
}

impl Locale {
    /// All supported locales.
    pub const ALL: [Self; 3] = [Self::DeCh, Self::FrCh, Self::ItCh];

    /// BCP 47 tag used in API paths and cache keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeCh => "de-CH",
            Self::FrCh => "fr-CH",
            Self::ItCh => "it-CH",
        }
    }

    /// Detect the locale from a URL path.
    ///
    /// `/fr/...` and `/it/...` select French and Italian; everything else is
    /// German.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        if path.starts_with("/fr/") {
            Self::FrCh
        } else if path.starts_with("/it/") {
            Self::ItCh
        } else {
            Self::DeCh
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::Validation(format!("unsupported locale: {s}")))
    }
}
