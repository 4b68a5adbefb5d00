//! UTM client for aircraft registration, telemetry, and mission submission.

use anyhow::Result;
use serde::Serialize;

use utm_core::{
    AircraftProfile, AircraftState, Conflict, DeliveryRequest, GeofenceZone, Mission, Position,
    SystemStatus, Telemetry,
};

/// HTTP client for a single aircraft (or operator tool) talking to a UTM
/// server. Holds no server-side session state: registration and telemetry
/// are idempotent, so a client can be recreated freely.
pub struct UtmClient {
    base_url: String,
    aircraft_id: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct RegisterAircraftRequest {
    aircraft_id: String,
    lat: f64,
    lon: f64,
    altitude_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<AircraftProfile>,
}

async fn parse_json_or_error<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        anyhow::bail!("UTM request failed ({}): {}", status, body);
    }
    Ok(serde_json::from_str(&body)?)
}

impl UtmClient {
    /// Create a new client against a UTM server base URL (e.g.
    /// `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            aircraft_id: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn aircraft_id(&self) -> Option<&str> {
        self.aircraft_id.as_deref()
    }

    /// Register an aircraft at a starting position. §6: `register_aircraft(id,
    /// position) → ok | duplicate`.
    pub async fn register_aircraft(
        &mut self,
        aircraft_id: &str,
        start: Position,
        profile: Option<AircraftProfile>,
    ) -> Result<()> {
        let url = format!("{}/v1/aircraft/register", self.base_url);
        let request = RegisterAircraftRequest {
            aircraft_id: aircraft_id.to_string(),
            lat: start.lat,
            lon: start.lon,
            altitude_m: start.altitude_m,
            profile,
        };
        let response = self.client.post(&url).json(&request).send().await?;
        if response.status() == reqwest::StatusCode::CONFLICT {
            anyhow::bail!("aircraft {} already registered", aircraft_id);
        }
        if !response.status().is_success() {
            anyhow::bail!("registration failed ({}): {}", response.status(), response.text().await?);
        }
        self.aircraft_id = Some(aircraft_id.to_string());
        Ok(())
    }

    /// Send a telemetry update. Idempotent: the server overwrites the
    /// aircraft's last-known state (§6).
    pub async fn send_telemetry(&self, telemetry: &Telemetry) -> Result<()> {
        let url = format!("{}/v1/telemetry", self.base_url);
        let response = self.client.post(&url).json(telemetry).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("telemetry update failed ({}): {}", response.status(), response.text().await?);
        }
        Ok(())
    }

    /// Submit a pickup→delivery request. Returns the created (or queued)
    /// mission.
    pub async fn submit_mission(&self, request: &DeliveryRequest) -> Result<Mission> {
        let url = format!("{}/v1/missions", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;
        parse_json_or_error(response).await
    }

    pub async fn get_mission(&self, mission_id: &str) -> Result<Mission> {
        let url = format!("{}/v1/missions/{}", self.base_url, mission_id);
        let response = self.client.get(&url).send().await?;
        parse_json_or_error(response).await
    }

    pub async fn list_missions(&self) -> Result<Vec<Mission>> {
        let url = format!("{}/v1/missions", self.base_url);
        let response = self.client.get(&url).send().await?;
        parse_json_or_error(response).await
    }

    pub async fn abort_mission(&self, mission_id: &str) -> Result<()> {
        let url = format!("{}/v1/missions/{}/abort", self.base_url, mission_id);
        let response = self.client.post(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("abort failed ({}): {}", response.status(), response.text().await?);
        }
        Ok(())
    }

    pub async fn get_aircraft(&self, aircraft_id: &str) -> Result<AircraftState> {
        let url = format!("{}/v1/aircraft/{}", self.base_url, aircraft_id);
        let response = self.client.get(&url).send().await?;
        parse_json_or_error(response).await
    }

    pub async fn list_aircraft(&self) -> Result<Vec<AircraftState>> {
        let url = format!("{}/v1/aircraft", self.base_url);
        let response = self.client.get(&url).send().await?;
        parse_json_or_error(response).await
    }

    pub async fn list_conflicts(&self) -> Result<Vec<Conflict>> {
        let url = format!("{}/v1/conflicts", self.base_url);
        let response = self.client.get(&url).send().await?;
        parse_json_or_error(response).await
    }

    pub async fn system_status(&self) -> Result<SystemStatus> {
        let url = format!("{}/v1/status", self.base_url);
        let response = self.client.get(&url).send().await?;
        parse_json_or_error(response).await
    }

    /// §6 `geofence_snapshot()`: no-fly zones and sensitive areas for
    /// external visualization.
    pub async fn geofence_snapshot(&self) -> Result<GeofenceSnapshot> {
        let url = format!("{}/v1/geofences", self.base_url);
        let response = self.client.get(&url).send().await?;
        parse_json_or_error(response).await
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct GeofenceSnapshot {
    pub no_fly_zones: Vec<GeofenceZone>,
    pub sensitive_areas: Vec<GeofenceZone>,
}
