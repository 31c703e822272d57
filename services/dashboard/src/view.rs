//! Pure presentation: threshold classification, metric formatting,
//! and the HTML fragments the dashboard page is composed from.

use crate::api::{EquipmentRecord, EquipmentStatus, FleetStatistics};
use crate::state::StatusMessage;

/// Three-tier classification used by the metric cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStatus {
    Good,
    Fair,
    Poor,
}

impl MetricStatus {
    pub fn css_class(self) -> &'static str {
        match self {
            MetricStatus::Good => "status-good",
            MetricStatus::Fair => "status-fair",
            MetricStatus::Poor => "status-poor",
        }
    }
}

/// Fleet availability tiers: 95 and up is good, 90 and up is fair
pub fn availability_status(pct: f64) -> MetricStatus {
    if pct >= 95.0 {
        MetricStatus::Good
    } else if pct >= 90.0 {
        MetricStatus::Fair
    } else {
        MetricStatus::Poor
    }
}

/// Any critical alert at all flips the card to poor
pub fn alerts_status(critical_alerts: u64) -> MetricStatus {
    if critical_alerts > 0 {
        MetricStatus::Poor
    } else {
        MetricStatus::Good
    }
}

/// MTBF at or above this value is the backend's "never failed" sentinel
pub const MTBF_NO_FAILURES: f64 = 999_999.0;

pub fn format_mtbf(mtbf: Option<f64>) -> String {
    match mtbf {
        Some(value) if value < MTBF_NO_FAILURES => format!("{:.1}h", value),
        _ => "No failures".to_string(),
    }
}

pub fn format_availability(availability: Option<f64>) -> String {
    match availability {
        Some(value) => format!("{:.1}%", value),
        None => "No data".to_string(),
    }
}

pub fn badge_class(status: EquipmentStatus) -> &'static str {
    match status {
        EquipmentStatus::Good => "badge-good",
        EquipmentStatus::Fair => "badge-fair",
        EquipmentStatus::Poor => "badge-poor",
        EquipmentStatus::Unknown => "badge-nodata",
    }
}

pub fn metric_card(
    label: &str,
    value: &str,
    status: Option<MetricStatus>,
    subtitle: &str,
) -> String {
    let status_class = status.map(MetricStatus::css_class).unwrap_or("");
    format!(
        r#"<div class="metric-card">
            <div class="metric-label">{label}</div>
            <div class="metric-value {status_class}">{value}</div>
            <div class="metric-subtitle">{subtitle}</div>
        </div>"#
    )
}

/// The four-card metrics grid
pub fn metrics_grid(statistics: &FleetStatistics) -> String {
    let cards = [
        metric_card(
            "Fleet Availability",
            &format!("{}%", statistics.fleet_availability),
            Some(availability_status(statistics.fleet_availability)),
            "Average across fleet",
        ),
        metric_card(
            "Total Equipment",
            &statistics.total_equipment.to_string(),
            None,
            "Active units",
        ),
        metric_card(
            "Critical Alerts",
            &statistics.critical_alerts.to_string(),
            Some(alerts_status(statistics.critical_alerts)),
            "Below 90% availability",
        ),
        metric_card(
            "Average MTBF",
            &format!("{}h", statistics.avg_mtbf),
            None,
            "Fleet average",
        ),
    ];
    cards.join("\n")
}

pub fn equipment_row(record: &EquipmentRecord) -> String {
    let equipment_type = record.equipment_type.as_deref().unwrap_or("Unknown");
    let location = record.location.as_deref().unwrap_or("Not specified");
    format!(
        r#"<tr>
            <td><strong>{name}</strong></td>
            <td>{equipment_type}</td>
            <td>{location}</td>
            <td>{availability}</td>
            <td>{mtbf}</td>
            <td><span class="status-badge {badge}">{status}</span></td>
            <td>
                <button class="btn btn-sm" onclick="alert('Details for {name}\nType: {equipment_type}\nLocation: {location}')">View</button>
                <button class="btn btn-sm btn-danger" onclick="deleteEquipment({id}, '{name}')">Delete</button>
            </td>
        </tr>"#,
        name = record.name,
        equipment_type = equipment_type,
        location = location,
        availability = format_availability(record.availability),
        mtbf = format_mtbf(record.mtbf),
        badge = badge_class(record.status),
        status = record.status,
        id = record.id,
    )
}

pub fn equipment_table(equipment: &[EquipmentRecord]) -> String {
    if equipment.is_empty() {
        return r#"<p class="no-data">No equipment found. Add some to get started!</p>"#
            .to_string();
    }

    let rows: String = equipment.iter().map(equipment_row).collect();
    format!(
        r#"<table>
            <thead>
                <tr>
                    <th>Equipment</th>
                    <th>Type</th>
                    <th>Location</th>
                    <th>Availability</th>
                    <th>MTBF</th>
                    <th>Status</th>
                    <th>Actions</th>
                </tr>
            </thead>
            <tbody id="equipment-body">{rows}</tbody>
        </table>"#
    )
}

pub fn message_banner(message: Option<&StatusMessage>) -> String {
    match message {
        Some(m) => format!(
            r#"<div class="message {}">{}</div>"#,
            m.kind.as_str(),
            m.text
        ),
        None => String::new(),
    }
}

/// The add-equipment form, posted as regular form data
pub fn add_form() -> String {
    r#"<div class="add-form-container">
        <h2>Add New Equipment</h2>
        <form method="post" action="/equipment" class="equipment-form">
            <div class="form-row">
                <input type="text" name="name" placeholder="Equipment Name" required>
                <input type="text" name="type" placeholder="Type (e.g., Pump)">
                <input type="text" name="location" placeholder="Location">
            </div>
            <div class="form-row">
                <input type="number" name="total_hours" placeholder="Total Hours" step="0.1" required>
                <input type="number" name="uptime_hours" placeholder="Uptime Hours" step="0.1" required>
                <input type="number" name="failures" placeholder="Failures" min="0" required>
            </div>
            <button type="submit" class="btn btn-success">Add Equipment</button>
        </form>
    </div>"#
        .to_string()
}
