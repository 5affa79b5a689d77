//! Cookie consent for the Maklerzentrum site.
//!
//! [`ConsentManager`] keeps the visitor's decision per [`ConsentCategory`],
//! persists it as a [`ConsentRecord`] in a [`ConsentStore`] and reports which
//! tracking tags may be loaded. Essential cookies are always granted.
//!
//! A stored decision expires after the configured number of days (365 by
//! default); expired and corrupt records are treated as absent, which means
//! the consent banner has to be shown again.
//!
//! Listeners registered with [`ConsentManager::subscribe`] receive a
//! [`ConsentEvent`] for every change.

mod clock;
mod error;
mod state;
mod store;
mod tracking;

pub use clock::{Clock, SystemClock};
pub use error::ConsentError;
pub use state::{ConsentCategory, ConsentRecord, ConsentState, RECORD_VERSION};
pub use store::{ConsentStore, FileStore, MemoryStore};
pub use tracking::{Tracker, allowed_trackers};

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError, RwLock};

use mz_config::{ConsentConfig, TrackingConfig};

/// Store key for the consent record.
pub const STORAGE_KEY: &str = "mz_consent_v1";

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Notification sent to subscribers after consent changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsentEvent {
    /// The new decision.
    pub consent: ConsentState,
}

/// Consent state holder.
pub struct ConsentManager {
    store: Box<dyn ConsentStore>,
    clock: Box<dyn Clock>,
    max_age_ms: u64,
    state: RwLock<Option<ConsentState>>,
    subscribers: Mutex<Vec<Sender<ConsentEvent>>>,
}

impl ConsentManager {
    /// Create a manager and load any stored decision.
    pub fn new(
        store: impl ConsentStore + 'static,
        clock: impl Clock + 'static,
        max_age_days: u32,
    ) -> Self {
        let manager = Self {
            store: Box::new(store),
            clock: Box::new(clock),
            max_age_ms: u64::from(max_age_days) * MILLIS_PER_DAY,
            state: RwLock::new(None),
            subscribers: Mutex::new(Vec::new()),
        };
        manager.load();
        manager
    }

    /// File-backed manager using wall-clock time.
    #[must_use]
    pub fn from_config(config: &ConsentConfig) -> Self {
        Self::new(
            FileStore::new(&config.storage_dir),
            SystemClock,
            config.max_age_days,
        )
    }

    /// Re-read the stored decision.
    ///
    /// Expired records are deleted. Unreadable or corrupt records are logged
    /// and treated as absent.
    pub fn load(&self) -> Option<ConsentState> {
        let loaded = self.read_record();
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = loaded;
        loaded
    }

    fn read_record(&self) -> Option<ConsentState> {
        let raw = match self.store.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load consent");
                return None;
            }
        };

        let record: ConsentRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load consent");
                return None;
            }
        };

        if record.is_expired(self.clock.now_millis(), self.max_age_ms) {
            tracing::info!(timestamp = record.timestamp, "Stored consent expired");
            if let Err(e) = self.store.remove(STORAGE_KEY) {
                tracing::warn!(error = %e, "Failed to remove expired consent");
            }
            return None;
        }

        Some(record.consent)
    }

    /// Current decision, `None` if the visitor has not decided yet.
    #[must_use]
    pub fn current(&self) -> Option<ConsentState> {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether `category` has been explicitly granted.
    #[must_use]
    pub fn has_consent(&self, category: ConsentCategory) -> bool {
        self.current().is_some_and(|state| state.allows(category))
    }

    /// Whether the consent banner must be shown.
    #[must_use]
    pub fn banner_required(&self) -> bool {
        self.current().is_none()
    }

    /// Record a new decision, persist it and notify subscribers.
    ///
    /// `essential` is forced to `true`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError`] if the record cannot be written. The in-memory
    /// decision is left unchanged in that case.
    pub fn set_consent(&self, state: ConsentState) -> Result<(), ConsentError> {
        let state = ConsentState {
            essential: true,
            ..state
        };
        let record = ConsentRecord::new(state, self.clock.now_millis());

        let persisted = serde_json::to_string(&record)
            .map_err(ConsentError::from)
            .and_then(|json| self.store.write(STORAGE_KEY, &json));
        if let Err(e) = persisted {
            tracing::error!(error = %e, "Failed to persist consent");
            return Err(e);
        }

        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(state);
        tracing::info!(
            analytics = state.analytics,
            marketing = state.marketing,
            "Consent updated"
        );
        self.notify(state);
        Ok(())
    }

    /// Grant every category.
    ///
    /// # Errors
    ///
    /// See [`set_consent`](Self::set_consent).
    pub fn accept_all(&self) -> Result<(), ConsentError> {
        self.set_consent(ConsentState::all())
    }

    /// Grant essential cookies only.
    ///
    /// # Errors
    ///
    /// See [`set_consent`](Self::set_consent).
    pub fn reject_all(&self) -> Result<(), ConsentError> {
        self.set_consent(ConsentState::essential_only())
    }

    /// Grant essential cookies plus the `selected` categories.
    ///
    /// # Errors
    ///
    /// See [`set_consent`](Self::set_consent).
    pub fn save_selection(&self, selected: &[ConsentCategory]) -> Result<(), ConsentError> {
        self.set_consent(ConsentState::with_categories(selected))
    }

    /// Register for change notifications.
    pub fn subscribe(&self) -> Receiver<ConsentEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn notify(&self, consent: ConsentState) {
        let event = ConsentEvent { consent };
        // Dropped receivers unsubscribe implicitly
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(event).is_ok());
    }

    /// Tracking tags the current decision allows.
    #[must_use]
    pub fn active_trackers(&self, tracking: &TrackingConfig) -> Vec<Tracker> {
        self.current()
            .map(|state| allowed_trackers(&state, tracking))
            .unwrap_or_default()
    }
}
