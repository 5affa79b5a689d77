//! Third-party tags gated by consent.

use std::fmt;

use mz_config::TrackingConfig;

use crate::state::{ConsentCategory, ConsentState};

/// A tracking tag that may be loaded once its category is granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tracker {
    /// Google Analytics 4 (analytics).
    Ga4 {
        /// Measurement id.
        id: String,
    },
    /// `TikTok` pixel (marketing).
    TikTokPixel {
        /// Pixel id.
        id: String,
    },
    /// Facebook pixel (marketing).
    FacebookPixel {
        /// Pixel id.
        id: String,
    },
}

impl Tracker {
    /// Category that gates this tracker.
    #[must_use]
    pub fn category(&self) -> ConsentCategory {
        match self {
            Self::Ga4 { .. } => ConsentCategory::Analytics,
            Self::TikTokPixel { .. } | Self::FacebookPixel { .. } => ConsentCategory::Marketing,
        }
    }

    /// Script URL the tag loads.
    #[must_use]
    pub fn script_url(&self) -> String {
        match self {
            Self::Ga4 { id } => format!("https://www.googletagmanager.com/gtag/js?id={id}"),
            Self::TikTokPixel { id } => {
                format!("https://analytics.tiktok.com/i18n/pixel/events.js?sdkid={id}&lib=ttq")
            }
            Self::FacebookPixel { .. } => {
                "https://connect.facebook.net/en_US/fbevents.js".to_owned()
            }
        }
    }
}

impl fmt::Display for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ga4 { id } => write!(f, "GA4 ({id})"),
            Self::TikTokPixel { id } => write!(f, "TikTok pixel ({id})"),
            Self::FacebookPixel { id } => write!(f, "Facebook pixel ({id})"),
        }
    }
}

/// Configured id, ignoring blanks.
fn configured(id: Option<&String>) -> Option<String> {
    id.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Trackers `state` allows, given the configured tag ids.
///
/// Analytics enables GA4; marketing enables the `TikTok` and Facebook pixels.
/// Tags without a configured id are never returned.
#[must_use]
pub fn allowed_trackers(state: &ConsentState, tracking: &TrackingConfig) -> Vec<Tracker> {
    let mut trackers = Vec::new();

    if state.allows(ConsentCategory::Analytics)
        && let Some(id) = configured(tracking.ga4_id.as_ref())
    {
        trackers.push(Tracker::Ga4 { id });
    }

    if state.allows(ConsentCategory::Marketing) {
        if let Some(id) = configured(tracking.tiktok_pixel_id.as_ref()) {
            trackers.push(Tracker::TikTokPixel { id });
        }
        if let Some(id) = configured(tracking.facebook_pixel_id.as_ref()) {
            trackers.push(Tracker::FacebookPixel { id });
        }
    }

    trackers
}
