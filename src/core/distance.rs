use crate::models::Coordinates;

/// Statute miles per nautical mile, as the spherical-law conversion uses it
const MILES_PER_NAUTICAL_MILE: f64 = 1.1515;

/// Kilometers per statute mile
const KM_PER_MILE: f64 = 1.609344;

/// How far below 1 the cosine may round and still count as zero arc
const COINCIDENT_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// Great-circle distance between two points in meters
///
/// Uses the spherical law of cosines. One degree of arc is 60 nautical miles,
/// converted to statute miles, kilometers and finally meters.
///
/// # Arguments
/// * `a` - First point in degrees
/// * `b` - Second point in degrees
///
/// # Returns
/// Distance in meters, exactly 0 for identical points and never NaN for
/// valid coordinates. A NaN coordinate yields NaN.
#[inline]
pub fn great_circle_distance(a: Coordinates, b: Coordinates) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lon = (a.longitude - b.longitude).to_radians();

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lon.cos();
    // Rounding leaves cos_angle a few ULP off 1 for coincident points, and
    // acos turns that into ~9 cm
    let cos_angle = if 1.0 - cos_angle <= COINCIDENT_TOLERANCE {
        1.0
    } else {
        cos_angle.clamp(-1.0, 1.0)
    };
    let angle = cos_angle.acos();

    angle.to_degrees() * 60.0 * MILES_PER_NAUTICAL_MILE * KM_PER_MILE * 1000.0
}
