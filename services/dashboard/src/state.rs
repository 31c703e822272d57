//! Shared dashboard state
//!
//! A single state tree owned by the store and read by the dashboard
//! renderers. All mutation happens behind the `StateHandle` lock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::api::{EquipmentRecord, FleetSnapshot, FleetStatistics};

/// Flavor of a transient status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

/// A transient action-result message
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    pub posted_at: Instant,
}

/// The dashboard's entire client-side state
#[derive(Debug)]
pub struct DashboardState {
    pub equipment: Vec<EquipmentRecord>,
    pub statistics: FleetStatistics,
    pub loading: bool,
    pub form_open: bool,
    message: Option<StatusMessage>,
    message_ttl: Duration,
    applied_refresh: u64,
}

impl DashboardState {
    pub fn new(message_ttl: Duration) -> Self {
        Self {
            equipment: Vec::new(),
            statistics: FleetStatistics::default(),
            loading: true,
            form_open: false,
            message: None,
            message_ttl,
            applied_refresh: 0,
        }
    }

    /// Replace the displayed fleet with a freshly fetched snapshot.
    ///
    /// `seq` is the sequence number allocated when the refresh was
    /// issued. Returns false, leaving the data untouched, when a
    /// later-issued refresh has already been applied.
    pub fn apply_snapshot(&mut self, seq: u64, snapshot: FleetSnapshot) -> bool {
        if seq <= self.applied_refresh {
            return false;
        }
        self.applied_refresh = seq;
        self.equipment = snapshot.equipment;
        self.statistics = snapshot.statistics;
        self.loading = false;
        true
    }

    /// Mark the initial load as finished without touching the data
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Post a transient message, replacing any previous one
    pub fn post_message(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            kind,
            posted_at: Instant::now(),
        });
    }

    /// Current message, suppressing ones older than the TTL
    pub fn message(&self) -> Option<&StatusMessage> {
        self.message
            .as_ref()
            .filter(|m| m.posted_at.elapsed() < self.message_ttl)
    }

    /// Display name of a record, if it is currently listed
    pub fn find_name(&self, id: u64) -> Option<&str> {
        self.equipment
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }

    pub fn toggle_form(&mut self) {
        self.form_open = !self.form_open;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<DashboardState>>;

pub fn new_state_handle(message_ttl: Duration) -> StateHandle {
    Arc::new(RwLock::new(DashboardState::new(message_ttl)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EquipmentStatus;

    fn record(id: u64, name: &str) -> EquipmentRecord {
        EquipmentRecord {
            id,
            name: name.to_string(),
            equipment_type: Some("Pump".to_string()),
            location: None,
            total_hours: 100.0,
            uptime_hours: 95.0,
            failures: 2,
            availability: Some(95.0),
            mtbf: Some(47.5),
            status: EquipmentStatus::Good,
        }
    }

    fn snapshot(names: &[(u64, &str)]) -> FleetSnapshot {
        FleetSnapshot {
            equipment: names.iter().map(|(id, n)| record(*id, n)).collect(),
            statistics: FleetStatistics {
                fleet_availability: 95.0,
                total_equipment: names.len() as u64,
                critical_alerts: 0,
                avg_mtbf: 47.5,
            },
        }
    }

    #[test]
    fn new_state_is_loading_and_empty() {
        let state = DashboardState::new(Duration::from_secs(5));
        assert!(state.loading);
        assert!(!state.form_open);
        assert!(state.equipment.is_empty());
        assert_eq!(state.statistics, FleetStatistics::default());
        assert!(state.message().is_none());
    }

    #[test]
    fn apply_snapshot_replaces_wholesale() {
        let mut state = DashboardState::new(Duration::from_secs(5));
        assert!(state.apply_snapshot(1, snapshot(&[(1, "Pump-101"), (2, "Fan-3")])));
        assert!(!state.loading);
        assert_eq!(state.equipment.len(), 2);

        assert!(state.apply_snapshot(2, snapshot(&[(3, "Motor-9")])));
        assert_eq!(state.equipment.len(), 1);
        assert_eq!(state.equipment[0].name, "Motor-9");
        assert_eq!(state.statistics.total_equipment, 1);
    }

    #[test]
    fn stale_snapshot_is_discarded() {
        let mut state = DashboardState::new(Duration::from_secs(5));
        assert!(state.apply_snapshot(2, snapshot(&[(3, "Motor-9")])));
        assert!(!state.apply_snapshot(1, snapshot(&[(1, "Pump-101")])));
        assert_eq!(state.equipment[0].name, "Motor-9");
    }

    #[test]
    fn finish_loading_keeps_data() {
        let mut state = DashboardState::new(Duration::from_secs(5));
        state.apply_snapshot(1, snapshot(&[(1, "Pump-101")]));
        state.finish_loading();
        assert_eq!(state.equipment.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn message_expires_after_ttl() {
        let mut state = DashboardState::new(Duration::from_secs(5));
        state.post_message(MessageKind::Success, "Equipment added");

        let visible = state.message().expect("message should be visible");
        assert_eq!(visible.text, "Equipment added");
        assert_eq!(visible.kind, MessageKind::Success);

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(state.message().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(state.message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn new_message_replaces_old_one() {
        let mut state = DashboardState::new(Duration::from_secs(5));
        state.post_message(MessageKind::Success, "first");
        tokio::time::advance(Duration::from_secs(4)).await;
        state.post_message(MessageKind::Error, "second");
        tokio::time::advance(Duration::from_secs(2)).await;

        let visible = state.message().expect("second message still fresh");
        assert_eq!(visible.text, "second");
        assert_eq!(visible.kind, MessageKind::Error);
    }

    #[test]
    fn find_name_resolves_listed_records() {
        let mut state = DashboardState::new(Duration::from_secs(5));
        state.apply_snapshot(1, snapshot(&[(1, "Pump-101"), (2, "Fan-3")]));
        assert_eq!(state.find_name(2), Some("Fan-3"));
        assert_eq!(state.find_name(99), None);
    }

    #[test]
    fn form_toggles_and_closes() {
        let mut state = DashboardState::new(Duration::from_secs(5));
        state.toggle_form();
        assert!(state.form_open);
        state.toggle_form();
        assert!(!state.form_open);
        state.toggle_form();
        state.close_form();
        assert!(!state.form_open);
    }
}
