//! Typed client for the equipment backend API
//!
//! The backend owns the persisted records and all derived metrics
//! (availability, MTBF, status, fleet statistics); this client only
//! decodes what it returns.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::io::HttpClient;

/// Reliability classification assigned by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentStatus {
    #[serde(rename = "GOOD")]
    Good,
    #[serde(rename = "FAIR")]
    Fair,
    #[serde(rename = "POOR")]
    Poor,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipmentStatus::Good => write!(f, "GOOD"),
            EquipmentStatus::Fair => write!(f, "FAIR"),
            EquipmentStatus::Poor => write!(f, "POOR"),
            EquipmentStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A single equipment record as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub total_hours: f64,
    pub uptime_hours: f64,
    pub failures: u32,
    #[serde(default)]
    pub availability: Option<f64>,
    #[serde(default)]
    pub mtbf: Option<f64>,
    #[serde(default)]
    pub status: EquipmentStatus,
}

/// Fleet-wide aggregates, recomputed server-side on every read
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetStatistics {
    pub fleet_availability: f64,
    pub total_equipment: u64,
    pub critical_alerts: u64,
    pub avg_mtbf: f64,
}

/// Payload of `GET /api/equipment`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub equipment: Vec<EquipmentRecord>,
    pub statistics: FleetStatistics,
}

/// JSON body for `POST /api/equipment/add`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEquipment {
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub location: String,
    pub total_hours: f64,
    pub uptime_hours: f64,
    pub failures: u32,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the equipment REST backend
pub struct EquipmentApi {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for EquipmentApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EquipmentApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl EquipmentApi {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created EquipmentApi for {}", base_url);
        Self { base_url, http }
    }

    /// Fetch the full equipment collection plus fleet statistics
    pub async fn fetch_fleet(&self) -> crate::Result<FleetSnapshot> {
        let url = format!("{}/api/equipment", self.base_url);
        let response = self.http.get(&url).await?;
        if !response.is_success() {
            return Err(crate::FleetwatchError::Backend(error_text(&response)));
        }
        let snapshot = serde_json::from_str(&response.body)?;
        Ok(snapshot)
    }

    /// Submit a new record. Returns the server's confirmation message.
    pub async fn add_equipment(&self, equipment: &NewEquipment) -> crate::Result<String> {
        let url = format!("{}/api/equipment/add", self.base_url);
        let body = serde_json::to_value(equipment)?;
        let response = self.http.post_json(&url, &body).await?;
        if !response.is_success() {
            return Err(crate::FleetwatchError::Backend(error_text(&response)));
        }
        Ok(message_text(&response))
    }

    /// Delete a record by id. Returns the server's confirmation message.
    pub async fn delete_equipment(&self, id: u64) -> crate::Result<String> {
        let url = format!("{}/api/equipment/{}", self.base_url, id);
        let response = self.http.delete(&url).await?;
        if !response.is_success() {
            return Err(crate::FleetwatchError::Backend(error_text(&response)));
        }
        Ok(message_text(&response))
    }
}

fn message_text(response: &crate::io::HttpResponse) -> String {
    serde_json::from_str::<MessageBody>(&response.body)
        .map(|b| b.message)
        .unwrap_or_else(|_| "Operation completed".to_string())
}

fn error_text(response: &crate::io::HttpResponse) -> String {
    serde_json::from_str::<ErrorBody>(&response.body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("Backend returned status {}", response.status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{HttpResponse, MockHttpClient};

    fn fleet_body() -> String {
        r#"{
            "equipment": [
                {
                    "id": 1,
                    "name": "Pump-101",
                    "type": "Pump",
                    "location": "Building A",
                    "total_hours": 720.0,
                    "uptime_hours": 695.5,
                    "failures": 3,
                    "availability": 96.6,
                    "mtbf": 231.83,
                    "status": "GOOD"
                }
            ],
            "statistics": {
                "fleet_availability": 96.6,
                "total_equipment": 1,
                "critical_alerts": 0,
                "avg_mtbf": 231.83
            }
        }"#
        .to_string()
    }

    #[tokio::test]
    async fn fetch_fleet_parses_snapshot() {
        let mut mock = MockHttpClient::new();
        mock.expect_get()
            .withf(|url| url == "http://localhost:5000/api/equipment")
            .returning(|_| {
                Box::pin(async {
                    Ok(HttpResponse {
                        status: 200,
                        body: fleet_body(),
                    })
                })
            });

        let api = EquipmentApi::new("http://localhost:5000", Arc::new(mock));
        let snapshot = api.fetch_fleet().await.unwrap();

        assert_eq!(snapshot.equipment.len(), 1);
        assert_eq!(snapshot.equipment[0].name, "Pump-101");
        assert_eq!(snapshot.equipment[0].status, EquipmentStatus::Good);
        assert_eq!(snapshot.statistics.total_equipment, 1);
    }

    #[tokio::test]
    async fn fetch_fleet_trims_trailing_slash() {
        let mut mock = MockHttpClient::new();
        mock.expect_get()
            .withf(|url| url == "http://localhost:5000/api/equipment")
            .returning(|_| {
                Box::pin(async {
                    Ok(HttpResponse {
                        status: 200,
                        body: fleet_body(),
                    })
                })
            });

        let api = EquipmentApi::new("http://localhost:5000/", Arc::new(mock));
        api.fetch_fleet().await.unwrap();
    }

    #[tokio::test]
    async fn fetch_fleet_decodes_error_payload() {
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(|_| {
            Box::pin(async {
                Ok(HttpResponse {
                    status: 500,
                    body: r#"{"error": "Internal server error"}"#.to_string(),
                })
            })
        });

        let api = EquipmentApi::new("http://localhost:5000", Arc::new(mock));
        let err = api.fetch_fleet().await.unwrap_err();

        match err {
            crate::FleetwatchError::Backend(msg) => assert_eq!(msg, "Internal server error"),
            other => panic!("expected Backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_fleet_falls_back_on_unparseable_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(|_| {
            Box::pin(async {
                Ok(HttpResponse {
                    status: 502,
                    body: "Bad Gateway".to_string(),
                })
            })
        });

        let api = EquipmentApi::new("http://localhost:5000", Arc::new(mock));
        let err = api.fetch_fleet().await.unwrap_err();

        assert!(err.to_string().contains("Backend returned status 502"));
    }

    #[tokio::test]
    async fn unknown_status_deserializes_as_unknown() {
        let body = r#"{
            "equipment": [
                {
                    "id": 2,
                    "name": "Valve-7",
                    "total_hours": 100.0,
                    "uptime_hours": 80.0,
                    "failures": 1,
                    "status": "WEIRD"
                }
            ],
            "statistics": {
                "fleet_availability": 80.0,
                "total_equipment": 1,
                "critical_alerts": 1,
                "avg_mtbf": 80.0
            }
        }"#;
        let snapshot: FleetSnapshot = serde_json::from_str(body).unwrap();

        assert_eq!(snapshot.equipment[0].status, EquipmentStatus::Unknown);
        assert_eq!(snapshot.equipment[0].equipment_type, None);
        assert_eq!(snapshot.equipment[0].availability, None);
        assert_eq!(snapshot.equipment[0].mtbf, None);
    }

    #[tokio::test]
    async fn add_equipment_posts_exact_body() {
        let mut mock = MockHttpClient::new();
        mock.expect_post_json()
            .withf(|url, body| {
                url == "http://localhost:5000/api/equipment/add"
                    && body["name"] == "Pump-102"
                    && body["type"] == "Pump"
                    && body["location"] == "Building B"
                    && body["total_hours"] == 100.0
                    && body["uptime_hours"] == 95.0
                    && body["failures"] == 2
            })
            .returning(|_, _| {
                Box::pin(async {
                    Ok(HttpResponse {
                        status: 201,
                        body: r#"{"message": "Equipment Pump-102 added successfully"}"#.to_string(),
                    })
                })
            });

        let api = EquipmentApi::new("http://localhost:5000", Arc::new(mock));
        let message = api
            .add_equipment(&NewEquipment {
                name: "Pump-102".to_string(),
                equipment_type: "Pump".to_string(),
                location: "Building B".to_string(),
                total_hours: 100.0,
                uptime_hours: 95.0,
                failures: 2,
            })
            .await
            .unwrap();

        assert_eq!(message, "Equipment Pump-102 added successfully");
    }

    #[tokio::test]
    async fn add_equipment_surfaces_server_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_post_json().returning(|_, _| {
            Box::pin(async {
                Ok(HttpResponse {
                    status: 400,
                    body: r#"{"error": "Uptime cannot exceed total hours"}"#.to_string(),
                })
            })
        });

        let api = EquipmentApi::new("http://localhost:5000", Arc::new(mock));
        let err = api
            .add_equipment(&NewEquipment {
                name: "Pump-102".to_string(),
                equipment_type: String::new(),
                location: String::new(),
                total_hours: 100.0,
                uptime_hours: 120.0,
                failures: 0,
            })
            .await
            .unwrap_err();

        match err {
            crate::FleetwatchError::Backend(msg) => {
                assert_eq!(msg, "Uptime cannot exceed total hours")
            }
            other => panic!("expected Backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_equipment_targets_record_url() {
        let mut mock = MockHttpClient::new();
        mock.expect_delete()
            .withf(|url| url == "http://localhost:5000/api/equipment/7")
            .returning(|_| {
                Box::pin(async {
                    Ok(HttpResponse {
                        status: 200,
                        body: r#"{"message": "Equipment deleted"}"#.to_string(),
                    })
                })
            });

        let api = EquipmentApi::new("http://localhost:5000", Arc::new(mock));
        let message = api.delete_equipment(7).await.unwrap();
        assert_eq!(message, "Equipment deleted");
    }

    #[tokio::test]
    async fn delete_equipment_surfaces_not_found() {
        let mut mock = MockHttpClient::new();
        mock.expect_delete().returning(|_| {
            Box::pin(async {
                Ok(HttpResponse {
                    status: 404,
                    body: r#"{"error": "Equipment not found"}"#.to_string(),
                })
            })
        });

        let api = EquipmentApi::new("http://localhost:5000", Arc::new(mock));
        let err = api.delete_equipment(99).await.unwrap_err();
        assert!(err.to_string().contains("Equipment not found"));
    }
}
