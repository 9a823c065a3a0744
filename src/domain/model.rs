use crate::utils::error::DirectionsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 point, longitude first.
///
/// Only built through [`Coordinate::new`], so every value in circulation is
/// finite and within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lon: f64,
    lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Result<Self, DirectionsError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(DirectionsError::invalid_request(format!(
                "coordinate ({}, {}) is not finite",
                lon, lat
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(DirectionsError::invalid_request(format!(
                "longitude {} outside [-180, 180]",
                lon
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(DirectionsError::invalid_request(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        Ok(Self { lon, lat })
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Walking,
    Driving,
    Cycling,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Walking => "walking",
            Profile::Driving => "driving",
            Profile::Cycling => "cycling",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    origin: Coordinate,
    destination: Coordinate,
    profile: Profile,
}

impl DirectionsRequest {
    pub fn new(origin: Coordinate, destination: Coordinate, profile: Profile) -> Self {
        Self {
            origin,
            destination,
            profile,
        }
    }

    /// 從原始經緯度建立請求，任何一點超出範圍都回傳 InvalidRequest
    pub fn from_lon_lat(
        origin: (f64, f64),
        destination: (f64, f64),
        profile: Profile,
    ) -> Result<Self, DirectionsError> {
        Ok(Self::new(
            Coordinate::new(origin.0, origin.1)?,
            Coordinate::new(destination.0, destination.1)?,
            profile,
        ))
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Path parameter in the `{originLon},{originLat};{destLon},{destLat}` form.
    pub fn coordinates_path(&self) -> String {
        format!("{};{}", self.origin, self.destination)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    NoRoute,
    InvalidInput,
    ServerError,
}

impl ResponseStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "Ok" => ResponseStatus::Ok,
            "NoRoute" | "NoSegment" => ResponseStatus::NoRoute,
            "InvalidInput" | "ProfileNotFound" | "NoMatch" => ResponseStatus::InvalidInput,
            _ => ResponseStatus::ServerError,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub duration: f64,
    pub distance: f64,
    pub weight_name: String,
    pub weight: f64,
    pub geometry: Option<String>,
    pub voice_locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsResponse {
    pub status: ResponseStatus,
    pub message: Option<String>,
    pub routes: Vec<Route>,
}

impl DirectionsResponse {
    /// 第一條路線是服務推薦的路線
    pub fn best_route(&self) -> Option<&Route> {
        self.routes.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn around(point: Coordinate) -> Self {
        Self {
            min_lon: point.lon(),
            min_lat: point.lat(),
            max_lon: point.lon(),
            max_lat: point.lat(),
        }
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.min_lon = self.min_lon.min(point.lon());
        self.min_lat = self.min_lat.min(point.lat());
        self.max_lon = self.max_lon.max(point.lon());
        self.max_lat = self.max_lat.max(point.lat());
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    pub fn is_point(&self) -> bool {
        self.min_lon == self.max_lon && self.min_lat == self.max_lat
    }
}

/// What the map renderer needs to draw a route and fit the camera on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPath {
    pub points: Vec<Coordinate>,
    pub bounds: BoundingBox,
    pub distance_m: f64,
    pub duration_s: f64,
}
