use crate::models::{GeocodedLocation, Route};

pub const MAPS_DIR_BASE_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// Builds a route from resolved locations in itinerary order. Zero locations
/// means no route; a single location is a degenerate route whose origin and
/// destination coincide. No reordering is performed.
pub fn build_route(locations: &[GeocodedLocation]) -> Option<Route> {
    let origin = locations.first()?.clone();
    let destination = locations.last()?.clone();
    let waypoints = if locations.len() > 2 {
        locations[1..locations.len() - 1].to_vec()
    } else {
        Vec::new()
    };

    Some(Route {
        origin,
        waypoints,
        destination,
    })
}

/// Renders the map-provider deep link. The waypoints segment is omitted
/// entirely when the route has fewer than three points.
pub fn route_map_url(route: &Route) -> String {
    let mut url = format!(
        "{MAPS_DIR_BASE_URL}&origin={},{}",
        route.origin.latitude, route.origin.longitude
    );

    if !route.waypoints.is_empty() {
        let waypoints = route
            .waypoints
            .iter()
            .map(|point| format!("{},{}", point.latitude, point.longitude))
            .collect::<Vec<_>>()
            .join("|");
        url.push_str(&format!("&waypoints={waypoints}"));
    }

    url.push_str(&format!(
        "&destination={},{}",
        route.destination.latitude, route.destination.longitude
    ));
    url
}
