/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers spanned by one degree of latitude.
const KM_PER_DEGREE: f64 = 111.2;

// 111.2 km/deg marginally undershoots the spherical value, so an unpadded
// box can reject a point sitting exactly at the radius. The pad keeps the
// box a superset of the radius disk.
const BOX_PAD: f64 = 1.01;

/// Great-circle distance between two points in decimal degrees, in km.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box around a point guaranteed to cover every location within
    /// `radius_km`. The longitude delta divides by `cos(lat)`, which
    /// degenerates toward the poles; fine for sub-polar latitudes like
    /// the Punjab region (~31°N).
    pub fn around(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
        let delta_lat = radius_km / KM_PER_DEGREE * BOX_PAD;
        let delta_lon = radius_km / (KM_PER_DEGREE * lat.to_radians().cos()) * BOX_PAD;

        BoundingBox {
            min_lat: lat - delta_lat,
            min_lon: lon - delta_lon,
            max_lat: lat + delta_lat,
            max_lon: lon + delta_lon,
        }
    }

    /// Inclusive containment check.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.min_lat <= lat && lat <= self.max_lat && self.min_lon <= lon && lon <= self.max_lon
    }
}
