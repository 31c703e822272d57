//! Dashboard web UI: the rendered page, a JSON state snapshot for the
//! in-page refresh script, and the action endpoints.

use std::sync::Arc;

use axum::extract::{Form, Path, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::Router;

use crate::store::{FormDraft, Store};
use crate::view;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardContext {
    pub store: Arc<Store>,
}

/// Build the dashboard axum router
pub fn build_router(store: Arc<Store>) -> Router {
    let context = DashboardContext { store };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/state", get(state_handler))
        .route("/equipment", post(add_handler))
        .route("/equipment/{id}/delete", post(delete_handler))
        .route("/form/toggle", post(toggle_form_handler))
        .route("/health", get(health_handler))
        .with_state(context)
}

const STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; max-width: 1080px; margin: 0 auto; padding: 1rem; color: #212529; }
    .dashboard-header { border-bottom: 2px solid #dee2e6; padding-bottom: 0.5rem; margin-bottom: 1rem; }
    .dashboard-header p { color: #6c757d; margin: 0; }
    .loading-screen { text-align: center; padding: 4rem; color: #6c757d; }
    .message { padding: 0.75rem 1rem; border-radius: 0.25rem; margin-bottom: 1rem; }
    .message.success { color: #155724; background-color: #d4edda; }
    .message.error { color: #721c24; background-color: #f8d7da; }
    .metrics-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; margin-bottom: 1.5rem; }
    .metric-card { border: 1px solid #dee2e6; border-radius: 0.25rem; padding: 1rem; }
    .metric-label { font-size: 0.85em; color: #6c757d; }
    .metric-value { font-size: 1.6em; font-weight: 600; }
    .metric-subtitle { font-size: 0.8em; color: #6c757d; }
    .status-good { color: #155724; }
    .status-fair { color: #856404; }
    .status-poor { color: #721c24; }
    .actions-bar { margin-bottom: 1rem; }
    .add-form-container { border: 1px solid #dee2e6; border-radius: 0.25rem; padding: 1rem; margin-bottom: 1.5rem; }
    .form-row { display: flex; gap: 0.5rem; margin-bottom: 0.5rem; }
    .form-row input { flex: 1; padding: 0.4rem; border: 1px solid #ced4da; border-radius: 0.25rem; }
    table { width: 100%; border-collapse: collapse; }
    th, td { padding: 0.5rem; text-align: left; border-bottom: 1px solid #dee2e6; }
    thead tr { border-bottom: 2px solid #dee2e6; }
    .status-badge { display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; }
    .badge-good { color: #155724; background-color: #d4edda; }
    .badge-fair { color: #856404; background-color: #fff3cd; }
    .badge-poor { color: #721c24; background-color: #f8d7da; }
    .badge-nodata { color: #383d41; background-color: #e2e3e5; }
    .btn { padding: 0.4rem 0.8rem; border: none; border-radius: 0.25rem; cursor: pointer; background-color: #e9ecef; }
    .btn-primary { color: #fff; background-color: #0d6efd; }
    .btn-success { color: #fff; background-color: #198754; }
    .btn-danger { color: #fff; background-color: #dc3545; }
    .btn-sm { padding: 0.25rem 0.5rem; font-size: 0.85em; }
    .no-data { color: #6c757d; }
"#;

const SCRIPT: &str = r#"
    function deleteEquipment(id, name) {
        if (!confirm('Delete ' + name + '?')) return;
        fetch('/equipment/' + id + '/delete', { method: 'POST' })
            .then(() => location.reload());
    }

    function formatMtbf(mtbf) {
        if (mtbf === null || mtbf === undefined || mtbf >= 999999) return 'No failures';
        return mtbf.toFixed(1) + 'h';
    }

    function formatAvailability(availability) {
        if (availability === null || availability === undefined) return 'No data';
        return availability.toFixed(1) + '%';
    }

    function refreshData() {
        fetch('/api/state')
            .then(r => r.json())
            .then(data => {
                const banner = document.getElementById('message-slot');
                if (banner) {
                    banner.innerHTML = data.message
                        ? '<div class="message ' + data.message.kind + '">' + data.message.text + '</div>'
                        : '';
                }
                const tbody = document.getElementById('equipment-body');
                if (tbody) {
                    tbody.innerHTML = data.equipment.map(eq => {
                        const badges = { 'GOOD': 'badge-good', 'FAIR': 'badge-fair', 'POOR': 'badge-poor' };
                        const badge = badges[eq.status] || 'badge-nodata';
                        const type = eq.type || 'Unknown';
                        const location = eq.location || 'Not specified';
                        return '<tr>'
                            + '<td><strong>' + eq.name + '</strong></td>'
                            + '<td>' + type + '</td>'
                            + '<td>' + location + '</td>'
                            + '<td>' + formatAvailability(eq.availability) + '</td>'
                            + '<td>' + formatMtbf(eq.mtbf) + '</td>'
                            + '<td><span class="status-badge ' + badge + '">' + eq.status + '</span></td>'
                            + '<td>'
                            + '<button class="btn btn-sm" onclick="alert(\'Details for ' + eq.name + '\\nType: ' + type + '\\nLocation: ' + location + '\')">View</button> '
                            + '<button class="btn btn-sm btn-danger" onclick="deleteEquipment(' + eq.id + ', \'' + eq.name + '\')">Delete</button>'
                            + '</td>'
                            + '</tr>';
                    }).join('');
                }
                const grid = document.getElementById('metrics-grid');
                if (grid) {
                    const s = data.statistics;
                    const availabilityClass = s.fleet_availability >= 95 ? 'status-good'
                        : s.fleet_availability >= 90 ? 'status-fair' : 'status-poor';
                    const alertsClass = s.critical_alerts > 0 ? 'status-poor' : 'status-good';
                    const card = (label, value, cls, subtitle) =>
                        '<div class="metric-card">'
                        + '<div class="metric-label">' + label + '</div>'
                        + '<div class="metric-value ' + cls + '">' + value + '</div>'
                        + '<div class="metric-subtitle">' + subtitle + '</div>'
                        + '</div>';
                    grid.innerHTML = card('Fleet Availability', s.fleet_availability + '%', availabilityClass, 'Average across fleet')
                        + card('Total Equipment', s.total_equipment, '', 'Active units')
                        + card('Critical Alerts', s.critical_alerts, alertsClass, 'Below 90% availability')
                        + card('Average MTBF', s.avg_mtbf + 'h', '', 'Fleet average');
                }
            });
    }
    setInterval(refreshData, 30000);
"#;

async fn index_handler(State(context): State<DashboardContext>) -> impl IntoResponse {
    let state = context.store.state();
    let state = state.read().await;

    let body = if state.loading {
        r#"<div class="loading-screen">Loading dashboard...</div>
           <script>setTimeout(() => location.reload(), 2000)</script>"#
            .to_string()
    } else {
        let toggle_label = if state.form_open {
            "Cancel"
        } else {
            "+ Add Equipment"
        };
        let form = if state.form_open {
            view::add_form()
        } else {
            String::new()
        };

        format!(
            r#"<div id="message-slot">{message}</div>
            <div class="metrics-grid" id="metrics-grid">{metrics}</div>
            <div class="actions-bar">
                <form method="post" action="/form/toggle">
                    <button class="btn btn-primary">{toggle_label}</button>
                </form>
            </div>
            {form}
            <div class="equipment-table">
                <h2>Equipment Status</h2>
                {table}
            </div>"#,
            message = view::message_banner(state.message()),
            metrics = view::metrics_grid(&state.statistics),
            toggle_label = toggle_label,
            form = form,
            table = view::equipment_table(&state.equipment),
        )
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Reliability Dashboard</title>
    <style>{STYLE}</style>
    <script>{SCRIPT}</script>
</head>
<body>
    <header class="dashboard-header">
        <h1>Reliability Dashboard</h1>
        <p>Equipment reliability monitoring</p>
    </header>
    <main class="dashboard-main">
        {body}
    </main>
</body>
</html>"#
    );

    Html(html)
}

async fn state_handler(State(context): State<DashboardContext>) -> impl IntoResponse {
    let state = context.store.state();
    let state = state.read().await;

    axum::Json(serde_json::json!({
        "equipment": state.equipment,
        "statistics": state.statistics,
        "loading": state.loading,
        "form_open": state.form_open,
        "message": state.message().map(|m| {
            serde_json::json!({ "text": m.text, "kind": m.kind.as_str() })
        }),
    }))
}

async fn add_handler(
    State(context): State<DashboardContext>,
    Form(draft): Form<FormDraft>,
) -> impl IntoResponse {
    context.store.add(&draft).await;
    Redirect::to("/")
}

async fn delete_handler(
    State(context): State<DashboardContext>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    context.store.remove(id).await;
    Redirect::to("/")
}

async fn toggle_form_handler(State(context): State<DashboardContext>) -> impl IntoResponse {
    context.store.toggle_form().await;
    Redirect::to("/")
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
