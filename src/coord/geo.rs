//! Geographic point types and Web Mercator conversion.
//!
//! The host map engine places all world geometry in Web Mercator map
//! units (x/y in [0, 1] across the projected world, z scaled so that
//! meters stay meters at the local latitude). Layers convert their
//! geographic input once at setup and never re-project per frame.

use geo_types::Coord;

/// Mean earth radius in meters (WGS84 authalic radius, matching the
/// host engine's Mercator math).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A geographic position: longitude/latitude in degrees plus an
/// optional altitude override in meters.
///
/// Immutable once created. Points without an explicit altitude use a
/// caller-supplied default when extruded into 3D geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    coord: Coord<f64>,
    altitude: Option<f64>,
}

impl GeoPoint {
    /// Creates a point at the given longitude/latitude (degrees).
    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            coord: Coord { x: lng, y: lat },
            altitude: None,
        }
    }

    /// Creates a point carrying a per-point altitude in meters.
    pub fn with_altitude(lng: f64, lat: f64, altitude: f64) -> Self {
        Self {
            coord: Coord { x: lng, y: lat },
            altitude: Some(altitude),
        }
    }

    pub fn lng(&self) -> f64 {
        self.coord.x
    }

    pub fn lat(&self) -> f64 {
        self.coord.y
    }

    /// The per-point altitude override, if one was supplied.
    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }
}

/// An ordered ring of geographic points; the last point is implicitly
/// connected back to the first.
///
/// Degenerate chains are rejected when solid geometry is built from
/// them, before any GPU allocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonChain {
    points: Vec<GeoPoint>,
}

impl PolygonChain {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// The first point of the ring, used as the reference for
    /// meter-to-Mercator scaling.
    pub fn first(&self) -> Option<&GeoPoint> {
        self.points.first()
    }
}

impl From<Vec<(f64, f64)>> for PolygonChain {
    fn from(pairs: Vec<(f64, f64)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(lng, lat)| GeoPoint::new(lng, lat))
                .collect(),
        )
    }
}

/// A position in Web Mercator world space.
///
/// x and y span [0, 1] across the projected world; z is altitude
/// converted to the same unit at the point's latitude.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MercatorPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MercatorPoint {
    /// Projects a longitude/latitude (degrees) and altitude (meters)
    /// into Mercator world space.
    pub fn from_lng_lat(lng: f64, lat: f64, altitude: f64) -> Self {
        Self {
            x: (180.0 + lng) / 360.0,
            y: (180.0 - (180.0 / std::f64::consts::PI)
                * ((std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan()).ln())
                / 360.0,
            z: altitude * meter_in_mercator_units(lat),
        }
    }

    /// Projects a geographic point, falling back to `default_altitude`
    /// when the point carries no altitude of its own.
    pub fn from_geo(point: &GeoPoint, default_altitude: f64) -> Self {
        Self::from_lng_lat(
            point.lng(),
            point.lat(),
            point.altitude().unwrap_or(default_altitude),
        )
    }
}

/// How many Mercator world units one meter spans at the given latitude.
///
/// Mercator stretches with latitude, so meter-denominated offsets
/// (deck thickness, pier height) must be scaled at the structure's own
/// latitude before being added to world coordinates.
pub fn meter_in_mercator_units(lat_deg: f64) -> f64 {
    let circumference = 2.0 * std::f64::consts::PI * EARTH_RADIUS_M * lat_deg.to_radians().cos();
    1.0 / circumference
}
