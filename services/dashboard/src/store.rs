//! The data store: owns the dashboard state and the actions that
//! mutate it.
//!
//! Every action is fatal only to itself. Failures are logged, turned
//! into a transient status message, and never block the next periodic
//! or user-initiated attempt.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Deserialize;

use crate::api::{EquipmentApi, NewEquipment};
use crate::prompt::ConfirmPrompt;
use crate::state::{MessageKind, StateHandle};
use crate::FleetwatchError;

/// Raw, unvalidated add-form input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormDraft {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub equipment_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub total_hours: String,
    #[serde(default)]
    pub uptime_hours: String,
    #[serde(default)]
    pub failures: String,
}

impl FormDraft {
    /// Convert the raw strings into a typed request body.
    ///
    /// Numeric fields must parse and the name must be non-empty;
    /// range and cross-field checks (uptime vs. total) stay on the
    /// server.
    pub fn parse(&self) -> crate::Result<NewEquipment> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FleetwatchError::Invalid(
                "Equipment name cannot be empty".to_string(),
            ));
        }
        let total_hours: f64 = parse_number(&self.total_hours, "Total hours")?;
        let uptime_hours: f64 = parse_number(&self.uptime_hours, "Uptime hours")?;
        let failures: u32 = self.failures.trim().parse().map_err(|_| {
            FleetwatchError::Invalid(format!(
                "Failures must be a non-negative whole number, got {:?}",
                self.failures
            ))
        })?;

        Ok(NewEquipment {
            name: name.to_string(),
            equipment_type: self.equipment_type.trim().to_string(),
            location: self.location.trim().to_string(),
            total_hours,
            uptime_hours,
            failures,
        })
    }
}

fn parse_number(raw: &str, field: &str) -> crate::Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| FleetwatchError::Invalid(format!("{} must be a number, got {:?}", field, raw)))?;
    if !value.is_finite() {
        return Err(FleetwatchError::Invalid(format!(
            "{} must be a finite number, got {:?}",
            field, raw
        )));
    }
    Ok(value)
}

/// Owns all client-side dashboard state; every mutation goes through
/// one of its actions.
pub struct Store {
    api: EquipmentApi,
    state: StateHandle,
    confirm: Arc<dyn ConfirmPrompt>,
    refresh_seq: AtomicU64,
}

impl Store {
    pub fn new(api: EquipmentApi, state: StateHandle, confirm: Arc<dyn ConfirmPrompt>) -> Self {
        Self {
            api,
            state,
            confirm,
            refresh_seq: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> StateHandle {
        Arc::clone(&self.state)
    }

    /// Fetch the fleet and replace the displayed snapshot wholesale.
    ///
    /// Overlapping refreshes are allowed; each one carries a sequence
    /// number taken at issue time, and a completion older than the
    /// last applied one is discarded instead of overwriting fresher
    /// data. A failure leaves the previous data in place and posts an
    /// error message.
    pub async fn refresh(&self) {
        let seq = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        match self.api.fetch_fleet().await {
            Ok(snapshot) => {
                let mut state = self.state.write().await;
                if state.apply_snapshot(seq, snapshot) {
                    tracing::debug!(
                        "Refresh #{} applied ({} records)",
                        seq,
                        state.equipment.len()
                    );
                } else {
                    tracing::debug!("Refresh #{} discarded as stale", seq);
                }
            }
            Err(e) => {
                tracing::warn!("Refresh #{} failed: {}", seq, e);
                let mut state = self.state.write().await;
                state.finish_loading();
                state.post_message(
                    MessageKind::Error,
                    "Error connecting to backend. Make sure the fleet API is running!",
                );
            }
        }
    }

    /// Validate and submit the add form. On success the form closes
    /// and the fleet is re-fetched.
    pub async fn add(&self, draft: &FormDraft) {
        let new_equipment = match draft.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Rejected add form: {}", e);
                self.state
                    .write()
                    .await
                    .post_message(MessageKind::Error, e.to_string());
                return;
            }
        };

        match self.api.add_equipment(&new_equipment).await {
            Ok(message) => {
                {
                    let mut state = self.state.write().await;
                    state.post_message(MessageKind::Success, message);
                    state.close_form();
                }
                self.refresh().await;
            }
            Err(FleetwatchError::Backend(text)) => {
                self.state
                    .write()
                    .await
                    .post_message(MessageKind::Error, text);
            }
            Err(e) => {
                tracing::warn!("Add equipment failed: {}", e);
                self.state
                    .write()
                    .await
                    .post_message(MessageKind::Error, "Error adding equipment");
            }
        }
    }

    /// Delete a record after interactive confirmation. Declining
    /// issues no network call and changes nothing.
    pub async fn remove(&self, id: u64) {
        let name = {
            let state = self.state.read().await;
            state
                .find_name(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("equipment {}", id))
        };

        if !self.confirm.confirm(&format!("Delete {}?", name)).await {
            tracing::debug!("Delete of '{}' declined", name);
            return;
        }

        match self.api.delete_equipment(id).await {
            Ok(message) => {
                self.state
                    .write()
                    .await
                    .post_message(MessageKind::Success, message);
                self.refresh().await;
            }
            Err(FleetwatchError::Backend(text)) => {
                self.state
                    .write()
                    .await
                    .post_message(MessageKind::Error, text);
            }
            Err(e) => {
                tracing::warn!("Delete equipment failed: {}", e);
                self.state
                    .write()
                    .await
                    .post_message(MessageKind::Error, "Error deleting equipment");
            }
        }
    }

    pub async fn toggle_form(&self) {
        self.state.write().await.toggle_form();
    }
}
