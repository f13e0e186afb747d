//! Great-circle distance between coordinate pairs.

/// IUGG mean Earth radius, meters.
const EARTH_RADIUS_M: f64 = 6_371_000.8;

/// Haversine surface distance in meters between two `(latitude,
/// longitude)` pairs in decimal degrees.
///
/// Coordinates that differ only in rounding precision (`60.3302` vs
/// `60.330181`) resolve to single-digit meters, well under any tolerance
/// the rules apply.
pub fn distance_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());

    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlon = (lon2 - lon1) / 2.0;

    let h = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
