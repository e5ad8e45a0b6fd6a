use crate::geo::{self, BoundingBox};
use crate::models::{Level, SchoolRecord};

/// Read-only lookup over high-school coordinates, built once per
/// classification run.
#[derive(Debug, Default)]
pub struct ProximityIndex {
    points: Vec<(f64, f64)>,
}

impl ProximityIndex {
    pub fn new(points: Vec<(f64, f64)>) -> ProximityIndex {
        ProximityIndex { points }
    }

    pub fn from_high_schools(schools: &[&SchoolRecord]) -> ProximityIndex {
        let points = schools
            .iter()
            .filter(|school| school.level == Level::High)
            .map(|school| (school.latitude, school.longitude))
            .collect();
        ProximityIndex { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if any indexed point lies within `radius_km` of the query
    /// point, boundary inclusive. Bounding-box pre-filter first, exact
    /// haversine only for candidates inside the box, stopping at the
    /// first hit. Linear scan over the index; fine for the hundreds of
    /// high schools in the Punjab dataset.
    pub fn any_within_radius(&self, lat: f64, lon: f64, radius_km: f64) -> bool {
        let bbox = BoundingBox::around(lat, lon, radius_km);

        self.points.iter().any(|&(point_lat, point_lon)| {
            bbox.contains(point_lat, point_lon)
                && geo::haversine_km(lat, lon, point_lat, point_lon) <= radius_km
        })
    }
}
