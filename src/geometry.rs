//! Geographic primitives injected into the query-rectangle planner.
//!
//! The harness treats great-circle distance as an external capability (§1 non-goals):
//! production deployments might swap in an S2- or geodesic-accurate implementation, so the
//! planner depends on the [`GeoMath`] trait rather than calling a free function directly.
//! [`HaversineGeoMath`] is the implementation this crate ships, grounded in the same
//! formula as a typical flight-tracking service's straight-line distance helper.

use serde::Serialize;

/// Mean Earth circumference in meters (2π × 6,371,000 m, rounded to the meter), used only
/// as a test cross-check against the haversine-derived diagonal for small rectangles.
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_075_017.0;

/// A point on the WGS84 ellipsoid, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An axis-aligned lat/lng bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLngRect {
    pub lo: LatLng,
    pub hi: LatLng,
}

impl LatLngRect {
    pub fn new(lo: LatLng, hi: LatLng) -> Self {
        Self { lo, hi }
    }

    /// `true` when the rectangle has zero extent in both dimensions.
    pub fn is_point(&self) -> bool {
        self.lo.lat == self.hi.lat && self.lo.lng == self.hi.lng
    }

    /// Diagonal length in meters, using the injected [`GeoMath`].
    pub fn diagonal_m(&self, geo_math: &dyn GeoMath) -> f64 {
        geo_math.great_circle_distance_m(self.lo, self.hi)
    }

    /// Diagonal length in kilometers.
    pub fn diagonal_km(&self, geo_math: &dyn GeoMath) -> f64 {
        self.diagonal_m(geo_math) / 1000.0
    }

    /// Format as the `lat_lo,lng_lo,lat_hi,lng_hi` query string the observation API expects.
    pub fn to_view_param(self) -> String {
        format!(
            "{},{},{},{}",
            self.lo.lat, self.lo.lng, self.hi.lat, self.hi.lng
        )
    }
}

/// Great-circle distance, injected so the planner never hard-codes one formula.
pub trait GeoMath: Send + Sync {
    fn great_circle_distance_m(&self, a: LatLng, b: LatLng) -> f64;
}

/// Haversine-formula implementation; matches the straight-line distance helper used
/// elsewhere in this codebase's ancestry for short-range aircraft position comparisons.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineGeoMath;

impl GeoMath for HaversineGeoMath {
    fn great_circle_distance_m(&self, a: LatLng, b: LatLng) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let lat1_rad = a.lat.to_radians();
        let lat2_rad = b.lat.to_radians();
        let delta_lat = (b.lat - a.lat).to_radians();
        let delta_lng = (b.lng - a.lng).to_radians();

        let h = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

        EARTH_RADIUS_M * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let geo = HaversineGeoMath;
        let p = LatLng::new(45.0, 10.0);
        assert_eq!(geo.great_circle_distance_m(p, p), 0.0);
    }

    #[test]
    fn one_degree_longitude_at_equator_is_about_111km() {
        let geo = HaversineGeoMath;
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 1.0);
        let d = geo.great_circle_distance_m(a, b);
        assert!((d - 111_195.0).abs() < 500.0, "distance was {d}");
    }

    #[test]
    fn rect_diagonal_uses_injected_geo_math() {
        let geo = HaversineGeoMath;
        let rect = LatLngRect::new(LatLng::new(45.0, 10.0), LatLng::new(45.0, 10.0));
        assert!(rect.is_point());
        assert_eq!(rect.diagonal_m(&geo), 0.0);
    }

    #[test]
    fn view_param_formats_four_values() {
        let rect = LatLngRect::new(LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0));
        assert_eq!(rect.to_view_param(), "1,2,3,4");
    }

    /// Cross-checks the haversine-derived one-degree-of-longitude distance at the equator
    /// against the degrees-of-circumference formula the historical implementation used.
    #[test]
    fn haversine_distance_agrees_with_circumference_formula_at_the_equator() {
        let geo = HaversineGeoMath;
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 1.0);
        let haversine_m = geo.great_circle_distance_m(a, b);
        let circumference_m = EARTH_CIRCUMFERENCE_M / 360.0;
        assert!((haversine_m - circumference_m).abs() < 500.0);
    }
}
