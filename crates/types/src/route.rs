//! Geographic points and delivery routes between warehouses.

use serde::{Deserialize, Serialize};

use crate::warehouse::WarehouseId;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed average truck speed used for ETA estimates.
pub const AVERAGE_SPEED_KMH: f64 = 60.0;

/// Smallest ETA a route may report.
pub const MIN_ETA_HOURS: f64 = 0.1;

// =============================================================================
// GeoPoint
// =============================================================================

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in kilometres (haversine).
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

// =============================================================================
// Traffic / RouteStatus
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Traffic {
    Low,
    Medium,
    High,
}

impl Traffic {
    /// ETA multiplier for this traffic level.
    pub fn eta_factor(self) -> f64 {
        match self {
            Traffic::Low => 1.0,
            Traffic::Medium => 1.3,
            Traffic::High => 1.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Active,
    Delayed,
    Completed,
}

// =============================================================================
// Route
// =============================================================================

/// A delivery route between two warehouses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// `route-{from}-{to}`.
    pub id: String,
    pub from: WarehouseId,
    pub to: WarehouseId,
    pub distance_km: f64,
    pub eta_hours: f64,
    pub traffic: Traffic,
    pub status: RouteStatus,
}

impl Route {
    pub fn route_id(from: &str, to: &str) -> String {
        format!("route-{from}-{to}")
    }

    /// Baseline ETA for a distance under the given traffic.
    pub fn estimate_eta(distance_km: f64, traffic: Traffic) -> f64 {
        distance_km / AVERAGE_SPEED_KMH * traffic.eta_factor()
    }
}

/// Aggregate view over all routes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub active_routes: usize,
    pub delayed_routes: usize,
    /// Mean ETA in hours (0 when there are no routes).
    pub average_eta_hours: f64,
}

impl RouteSummary {
    pub fn from_routes(routes: &[Route]) -> Self {
        let active_routes = routes
            .iter()
            .filter(|r| r.status == RouteStatus::Active)
            .count();
        let delayed_routes = routes
            .iter()
            .filter(|r| r.status == RouteStatus::Delayed)
            .count();
        let average_eta_hours = if routes.is_empty() {
            0.0
        } else {
            routes.iter().map(|r| r.eta_hours).sum::<f64>() / routes.len() as f64
        };
        Self {
            active_routes,
            delayed_routes,
            average_eta_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_mumbai_delhi() {
        let mumbai = GeoPoint::new(19.0760, 72.8777);
        let delhi = GeoPoint::new(28.6139, 77.2090);
        let d = mumbai.distance_km(&delhi);
        // ~1150 km as the crow flies
        assert!((1140.0..1160.0).contains(&d), "distance = {d}");
        assert!((d - delhi.distance_km(&mumbai)).abs() < 1e-9);
        assert_eq!(mumbai.distance_km(&mumbai), 0.0);
    }

    #[test]
    fn test_eta_factor() {
        assert!((Route::estimate_eta(120.0, Traffic::Low) - 2.0).abs() < 1e-12);
        assert!((Route::estimate_eta(120.0, Traffic::High) - 3.6).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary() {
        let s = RouteSummary::from_routes(&[]);
        assert_eq!(s.average_eta_hours, 0.0);
        assert_eq!(s.delayed_routes, 0);
    }
}
