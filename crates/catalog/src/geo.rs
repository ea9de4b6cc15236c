//! Distances on the WGS-84 ellipsoid.

use directory_models::DirectoryError;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const WGS84_B: f64 = (1.0 - WGS84_F) * WGS84_A;
const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DirectoryError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DirectoryError::invalid(format!(
                "latitude must be within [-90, 90], got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DirectoryError::invalid(format!(
                "longitude must be within [-180, 180], got {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Geodesic distance in metres between two points (Vincenty's inverse
/// formula). Falls back to the great-circle distance when the iteration
/// does not converge, which only happens for nearly antipodal points.
pub fn geodesic_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    vincenty_inverse(a, b).unwrap_or_else(|| great_circle_distance_m(a, b))
}

fn vincenty_inverse(p1: GeoPoint, p2: GeoPoint) -> Option<f64> {
    let mut l = (p2.longitude - p1.longitude).to_radians();
    if l > std::f64::consts::PI {
        l -= std::f64::consts::TAU;
    } else if l < -std::f64::consts::PI {
        l += std::f64::consts::TAU;
    }
    let u1 = ((1.0 - WGS84_F) * p1.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * p2.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // coincident
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial lines have cos²α = 0.
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if lambda.abs() > std::f64::consts::PI {
            return None;
        }
        if (lambda - previous).abs() < CONVERGENCE {
            let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
            return Some(WGS84_B * big_a * (sigma - delta_sigma));
        }
    }
    None
}

/// Haversine distance on a sphere with the mean Earth radius.
pub fn great_circle_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn same_point_is_zero() {
        let p = point(55.755826, 37.6173);
        assert_eq!(geodesic_distance_m(p, p), 0.0);
    }

    #[test]
    fn matches_published_vincenty_example() {
        // Flinders Peak -> Buninyong
        let flinders = point(-37.951_033_42, 144.424_867_89);
        let buninyong = point(-37.652_821_14, 143.926_495_54);
        let d = geodesic_distance_m(flinders, buninyong);
        assert!((d - 54_972.271).abs() < 0.01, "got {d}");
    }

    #[test]
    fn one_degree_along_equator() {
        let d = geodesic_distance_m(point(0.0, 0.0), point(0.0, 1.0));
        assert!((d - 111_319.491).abs() < 0.01, "got {d}");
    }

    #[test]
    fn symmetric() {
        let a = point(55.755826, 37.6173);
        let b = point(55.752565, 37.621258);
        assert!((geodesic_distance_m(a, b) - geodesic_distance_m(b, a)).abs() < 1e-6);
    }

    #[test]
    fn seeded_buildings_are_about_440m_apart() {
        let a = point(55.755826, 37.6173);
        let b = point(55.752565, 37.621258);
        let d = geodesic_distance_m(a, b);
        assert!(d > 400.0 && d < 480.0, "got {d}");
    }

    #[test]
    fn antipodal_points_fall_back_to_great_circle() {
        let d = geodesic_distance_m(point(0.0, 0.0), point(0.5, 179.7));
        assert!(d.is_finite());
        assert!(d > 19_900_000.0 && d < 20_100_000.0, "got {d}");
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(90.5, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.1).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }
}
