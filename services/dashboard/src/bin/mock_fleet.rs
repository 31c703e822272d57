//! Mock equipment backend for development and integration testing
//!
//! Serves the REST contract fleetwatch polls, with an in-memory list
//! and the same derived-metric rules as the production backend.
//!
//! Usage:
//!   mock_fleet [--port PORT]
//!
//! The port can also be set via the MOCK_FLEET_PORT environment
//! variable. Command line argument takes precedence over environment
//! variable. Default port is 5000.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// MTBF sentinel for equipment that has never failed
const MTBF_NO_FAILURES: f64 = 999_999.0;

#[derive(Debug, Clone, Serialize)]
struct Equipment {
    id: u64,
    name: String,
    #[serde(rename = "type")]
    equipment_type: String,
    location: String,
    total_hours: f64,
    uptime_hours: f64,
    failures: u32,
    availability: f64,
    mtbf: f64,
    status: &'static str,
}

fn derive_metrics(total_hours: f64, uptime_hours: f64, failures: u32) -> (f64, f64, &'static str) {
    let availability = if total_hours > 0.0 {
        uptime_hours / total_hours * 100.0
    } else {
        0.0
    };
    let mtbf = if failures > 0 {
        uptime_hours / failures as f64
    } else {
        MTBF_NO_FAILURES
    };
    let status = if availability >= 95.0 {
        "GOOD"
    } else if availability >= 90.0 {
        "FAIR"
    } else {
        "POOR"
    };
    (availability, mtbf, status)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug)]
struct Fleet {
    equipment: Vec<Equipment>,
    next_id: u64,
}

impl Fleet {
    fn seeded() -> Self {
        let mut fleet = Self {
            equipment: Vec::new(),
            next_id: 1,
        };
        fleet.insert("Pump-101", "Pump", "Building A", 720.0, 695.5, 3);
        fleet.insert("Compressor-A", "Compressor", "Building B", 720.0, 635.0, 5);
        fleet
    }

    fn insert(
        &mut self,
        name: &str,
        equipment_type: &str,
        location: &str,
        total_hours: f64,
        uptime_hours: f64,
        failures: u32,
    ) -> &Equipment {
        let (availability, mtbf, status) = derive_metrics(total_hours, uptime_hours, failures);
        let id = self.next_id;
        self.next_id += 1;
        self.equipment.push(Equipment {
            id,
            name: name.to_string(),
            equipment_type: equipment_type.to_string(),
            location: location.to_string(),
            total_hours,
            uptime_hours,
            failures,
            availability: round2(availability),
            mtbf: round2(mtbf),
            status,
        });
        self.equipment.last().expect("just pushed")
    }

    fn statistics(&self) -> serde_json::Value {
        let count = self.equipment.len();
        let (fleet_availability, avg_mtbf, critical_alerts) = if count > 0 {
            let avg_availability =
                self.equipment.iter().map(|e| e.availability).sum::<f64>() / count as f64;

            let total_mtbf: f64 = self
                .equipment
                .iter()
                .filter(|e| e.mtbf < MTBF_NO_FAILURES)
                .map(|e| e.mtbf)
                .sum();
            let with_failures = self.equipment.iter().filter(|e| e.failures > 0).count();
            let avg_mtbf = if with_failures > 0 {
                total_mtbf / with_failures as f64
            } else {
                0.0
            };

            let critical = self.equipment.iter().filter(|e| e.status == "POOR").count();
            (avg_availability, avg_mtbf, critical)
        } else {
            (0.0, 0.0, 0)
        };

        serde_json::json!({
            "fleet_availability": round2(fleet_availability),
            "total_equipment": count,
            "critical_alerts": critical_alerts,
            "avg_mtbf": round2(avg_mtbf),
        })
    }
}

type SharedFleet = Arc<RwLock<Fleet>>;

#[derive(Debug, Deserialize)]
struct AddRequest {
    name: Option<String>,
    #[serde(rename = "type", default)]
    equipment_type: Option<String>,
    #[serde(default)]
    location: Option<String>,
    total_hours: Option<f64>,
    uptime_hours: Option<f64>,
    failures: Option<i64>,
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn list_handler(State(fleet): State<SharedFleet>) -> impl IntoResponse {
    let fleet = fleet.read().await;
    Json(serde_json::json!({
        "equipment": fleet.equipment,
        "statistics": fleet.statistics(),
    }))
}

async fn add_handler(
    State(fleet): State<SharedFleet>,
    Json(request): Json<AddRequest>,
) -> axum::response::Response {
    let Some(name) = request.name else {
        return error_response(StatusCode::BAD_REQUEST, "Missing required field: name");
    };
    let Some(total_hours) = request.total_hours else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required field: total_hours",
        );
    };
    let Some(uptime_hours) = request.uptime_hours else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required field: uptime_hours",
        );
    };
    let Some(failures) = request.failures else {
        return error_response(StatusCode::BAD_REQUEST, "Missing required field: failures");
    };

    let name = name.trim().to_string();
    if name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Equipment name cannot be empty");
    }
    if uptime_hours > total_hours {
        return error_response(StatusCode::BAD_REQUEST, "Uptime cannot exceed total hours");
    }
    if failures < 0 {
        return error_response(StatusCode::BAD_REQUEST, "Failures cannot be negative");
    }

    let mut fleet = fleet.write().await;
    let record = fleet.insert(
        &name,
        request.equipment_type.as_deref().unwrap_or(""),
        request.location.as_deref().unwrap_or(""),
        total_hours,
        uptime_hours,
        failures as u32,
    );

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": format!("Equipment {} added successfully", name),
            "equipment": record,
        })),
    )
        .into_response()
}

async fn delete_handler(
    State(fleet): State<SharedFleet>,
    Path(id): Path<u64>,
) -> axum::response::Response {
    let mut fleet = fleet.write().await;
    let Some(index) = fleet.equipment.iter().position(|e| e.id == id) else {
        return error_response(StatusCode::NOT_FOUND, "Equipment not found");
    };
    let removed = fleet.equipment.remove(index);

    Json(serde_json::json!({
        "message": format!("Equipment {} deleted successfully", removed.name),
    }))
    .into_response()
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

fn build_router(fleet: SharedFleet) -> Router {
    Router::new()
        .route("/api/equipment", get(list_handler))
        .route("/api/equipment/add", post(add_handler))
        .route("/api/equipment/{id}", delete(delete_handler))
        .route("/api/health", get(health_handler))
        .with_state(fleet)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    // Port priority: command line arg > environment variable > default (5000)
    let args: Vec<String> = std::env::args().collect();
    let mut port: u16 = std::env::var("MOCK_FLEET_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5000);
    if let Some(position) = args.iter().position(|a| a == "--port") {
        if let Some(value) = args.get(position + 1).and_then(|s| s.parse().ok()) {
            port = value;
        }
    }

    let fleet: SharedFleet = Arc::new(RwLock::new(Fleet::seeded()));
    let router = build_router(fleet);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind mock fleet backend to port {}: {}", port, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Mock fleet backend listening on http://{}", addr);
    axum::serve(listener, router).await.ok();
}
