const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two coordinates given in degrees.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` past 1 for near-antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Callers treat a non-positive radius as "no constraint"; this function does not.
pub fn within_radius(
    origin_lat: f64,
    origin_lon: f64,
    target_lat: f64,
    target_lon: f64,
    radius_km: f64,
) -> bool {
    distance(origin_lat, origin_lon, target_lat, target_lon) <= radius_km
}

/// Maps a distance onto (0, 1], closer is higher.
pub fn proximity_score(distance_km: f64) -> f64 {
    1.0 / (1.0 + distance_km)
}
