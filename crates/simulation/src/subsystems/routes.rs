//! Delivery route network.
//!
//! One route per unordered warehouse pair, built at load. While running, the
//! route updater perturbs ETA, status and traffic on its own cadence.

use types::{Route, RouteStatus, Traffic, Warehouse, route::MIN_ETA_HOURS};

use crate::RandomSource;

/// Build routes for every warehouse pair `(i, j)` with `i < j`.
pub fn build_routes(warehouses: &[Warehouse], rng: &mut dyn RandomSource) -> Vec<Route> {
    let mut routes = Vec::new();
    for (i, from) in warehouses.iter().enumerate() {
        for to in &warehouses[i + 1..] {
            let distance_km = from.coordinates.distance_km(&to.coordinates);
            let traffic = initial_traffic(rng);
            let status = initial_status(rng);
            routes.push(Route {
                id: Route::route_id(&from.id, &to.id),
                from: from.id.clone(),
                to: to.id.clone(),
                distance_km,
                eta_hours: Route::estimate_eta(distance_km, traffic).max(MIN_ETA_HOURS),
                traffic,
                status,
            });
        }
    }
    routes
}

fn initial_traffic(rng: &mut dyn RandomSource) -> Traffic {
    if rng.next_f64() > 0.7 {
        Traffic::High
    } else if rng.next_f64() > 0.3 {
        Traffic::Medium
    } else {
        Traffic::Low
    }
}

fn initial_status(rng: &mut dyn RandomSource) -> RouteStatus {
    if rng.next_f64() > 0.7 {
        RouteStatus::Delayed
    } else if rng.next_f64() > 0.3 {
        RouteStatus::Active
    } else {
        RouteStatus::Completed
    }
}

/// Perturb one route.
///
/// ETA drifts by up to ±10% and never drops below [`MIN_ETA_HOURS`].
/// Status and traffic only change when their draw crosses a threshold.
pub fn step_route(route: &mut Route, rng: &mut dyn RandomSource) {
    route.eta_hours = (route.eta_hours * (1.0 + rng.uniform(-0.1, 0.1))).max(MIN_ETA_HOURS);

    let r = rng.next_f64();
    if r > 0.95 {
        route.status = RouteStatus::Delayed;
    } else if r > 0.7 {
        route.status = RouteStatus::Active;
    } else if route.eta_hours < 0.5 {
        route.status = RouteStatus::Completed;
    }

    let t = rng.next_f64();
    if t > 0.9 {
        route.traffic = Traffic::High;
    } else if t > 0.6 {
        route.traffic = Traffic::Medium;
    } else if t > 0.3 {
        route.traffic = Traffic::Low;
    }
}

pub fn step_routes(routes: &mut [Route], rng: &mut dyn RandomSource) {
    for route in routes {
        step_route(route, rng);
    }
}
