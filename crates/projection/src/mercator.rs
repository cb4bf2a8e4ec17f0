//! Mercator vertical-axis conversions on the unit sphere.

/// Latitude limit of the Mercator map, `atan(sinh(π))` (≈ 85.051°). Above
/// this the projected y runs off the square map.
pub const MAX_LAT: f64 = 1.4844222297453322;

/// Convert latitude (radians) to the Mercator y value.
pub fn lat_to_mercator_y(lat: f64) -> f64 {
    lat.clamp(-MAX_LAT, MAX_LAT).tan().asinh()
}

/// Convert a Mercator y value back to latitude (radians).
pub fn mercator_y_to_lat(y: f64) -> f64 {
    y.sinh().atan()
}
