//! `mz consent` subcommand group.

use clap::{Args, Subcommand};
use mz_config::TrackingConfig;
use mz_consent::{ConsentCategory, ConsentManager};
use serde_json::{Value, json};

use crate::context::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Cookie consent commands.
#[derive(Subcommand)]
pub(crate) enum ConsentCommand {
    /// Show the stored decision and the tracking tags it allows.
    Show,
    /// Grant every category.
    AcceptAll,
    /// Grant essential cookies only.
    Reject,
    /// Grant essential cookies plus the selected categories.
    Set(SetArgs),
}

/// Arguments for `mz consent set`.
#[derive(Args)]
pub(crate) struct SetArgs {
    /// Grant analytics.
    #[arg(long)]
    analytics: bool,

    /// Grant marketing.
    #[arg(long)]
    marketing: bool,
}

impl SetArgs {
    fn categories(&self) -> Vec<ConsentCategory> {
        let mut selected = Vec::new();
        if self.analytics {
            selected.push(ConsentCategory::Analytics);
        }
        if self.marketing {
            selected.push(ConsentCategory::Marketing);
        }
        selected
    }
}

impl ConsentCommand {
    /// Execute the consent subcommand.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let config = global.load_config(None)?;
        let manager = ConsentManager::from_config(&config.consent_resolved);
        let output = Output::new();

        match self {
            Self::Show => {
                if manager.banner_required() {
                    output.note("No consent decision stored; the banner would be shown");
                }
                let summary = consent_summary(&manager, &config.tracking);
                output.data(&serde_json::to_string_pretty(&summary)?)?;
                return Ok(());
            }
            Self::AcceptAll => manager.accept_all()?,
            Self::Reject => manager.reject_all()?,
            Self::Set(args) => manager.save_selection(&args.categories())?,
        }

        output.success(&format!(
            "Consent saved to {}",
            config.consent_resolved.storage_dir.display()
        ));
        Ok(())
    }
}

/// Stored decision plus the tracking tags it enables.
fn consent_summary(manager: &ConsentManager, tracking: &TrackingConfig) -> Value {
    let trackers: Vec<Value> = manager
        .active_trackers(tracking)
        .iter()
        .map(|tracker| {
            json!({
                "tracker": tracker.to_string(),
                "category": tracker.category().as_str(),
                "script": tracker.script_url(),
            })
        })
        .collect();

    json!({
        "consent": manager.current(),
        "banner_required": manager.banner_required(),
        "trackers": trackers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mz_consent::{ConsentState, MemoryStore, SystemClock};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_args_categories() {
        let args = SetArgs {
            analytics: true,
            marketing: false,
        };
        assert_eq!(args.categories(), vec![ConsentCategory::Analytics]);
    }

    #[test]
    fn test_summary_without_decision() {
        let manager = ConsentManager::new(MemoryStore::new(), SystemClock, 365);
        let summary = consent_summary(&manager, &TrackingConfig::default());
        assert_eq!(
            summary,
            json!({"consent": null, "banner_required": true, "trackers": []})
        );
    }

    #[test]
    fn test_summary_lists_allowed_trackers() {
        let manager = ConsentManager::new(MemoryStore::new(), SystemClock, 365);
        manager
            .set_consent(ConsentState {
                essential: true,
                analytics: true,
                marketing: false,
            })
            .unwrap();
        let tracking = TrackingConfig {
            ga4_id: Some("G-TEST".to_owned()),
            facebook_pixel_id: Some("123".to_owned()),
            ..TrackingConfig::default()
        };

        let summary = consent_summary(&manager, &tracking);

        assert_eq!(summary["banner_required"], json!(false));
        assert_eq!(
            summary["consent"],
            json!({"essential": true, "analytics": true, "marketing": false})
        );
        let trackers = summary["trackers"].as_array().unwrap();
        assert_eq!(trackers.len(), 1);
        assert_eq!(trackers[0]["category"], json!("analytics"));
    }
}
