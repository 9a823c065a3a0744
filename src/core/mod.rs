pub mod controller;
pub mod normalizer;
pub mod pipeline;
pub mod polyline;
pub mod presenter;
pub mod retry;

pub use crate::domain::model::{
    BoundingBox, Coordinate, DirectionsRequest, DirectionsResponse, DisplayPath, Profile,
    ResponseStatus, Route,
};
pub use crate::domain::ports::{ConfigProvider, DirectionsRepository};
pub use crate::utils::error::{DecodeError, DirectionsError, Result};
