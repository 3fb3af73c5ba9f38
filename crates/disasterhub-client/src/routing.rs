use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use disasterhub_types::geo::{Coordinates, ReliefCenter};

use crate::error::ClientError;

/// Ambulance services shown on the map.
pub fn default_relief_centers() -> Vec<ReliefCenter> {
    vec![
        ReliefCenter {
            id: 1,
            name: "EMSPLUS AMBULANCE SERVICES".into(),
            position: Coordinates { lat: 26.918292, lng: 75.808222 },
            kind: "hospital".into(),
        },
        ReliefCenter {
            id: 2,
            name: "Chauhan ambulance service (Tb hospital)".into(),
            position: Coordinates { lat: 26.921222, lng: 75.812333 },
            kind: "hospital".into(),
        },
        ReliefCenter {
            id: 3,
            name: "Chauhan Ambulance service (Shastri Nagar Rd)".into(),
            position: Coordinates { lat: 26.921222, lng: 75.812333 },
            kind: "hospital".into(),
        },
    ]
}

/// OSRM driving routes.
pub struct RoutingClient {
    client: Client,
    base_url: String,
}

impl RoutingClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Path from `origin` through every waypoint, as the first route's geometry.
    pub async fn route(
        &self,
        origin: Coordinates,
        waypoints: &[ReliefCenter],
    ) -> Result<Vec<Coordinates>, ClientError> {
        let url = route_url(&self.base_url, origin, waypoints);
        debug!("Routing request: {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let body: Value = resp.json().await.map_err(ClientError::from_reqwest)?;
        parse_route(&body)
    }
}

fn route_url(base_url: &str, origin: Coordinates, waypoints: &[ReliefCenter]) -> String {
    let mut stops = vec![format!("{},{}", origin.lng, origin.lat)];
    stops.extend(
        waypoints
            .iter()
            .map(|c| format!("{},{}", c.position.lng, c.position.lat)),
    );
    format!(
        "{}/route/v1/driving/{}?geometries=geojson",
        base_url,
        stops.join(";")
    )
}

/// Converts `routes[0].geometry.coordinates` (`[lng, lat]` pairs).
fn parse_route(body: &Value) -> Result<Vec<Coordinates>, ClientError> {
    let coords = body
        .get("routes")
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("geometry"))
        .and_then(|g| g.get("coordinates"))
        .and_then(Value::as_array)
        .ok_or_else(|| ClientError::Decode("no route in routing response".into()))?;

    Ok(coords
        .iter()
        .filter_map(|pair| {
            let lng = pair.get(0)?.as_f64()?;
            let lat = pair.get(1)?.as_f64()?;
            Some(Coordinates { lat, lng })
        })
        .collect())
}
