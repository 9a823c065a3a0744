pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{MapboxDirections, ScriptedDirections};
pub use config::TomlConfig;
pub use crate::core::{
    controller::{RouteController, RouteUpdate},
    pipeline::RoutePipeline,
    polyline::Precision,
    retry::RetryPolicy,
};
pub use domain::model::{Coordinate, DirectionsRequest, DisplayPath, Profile};
pub use utils::error::{AppError, DecodeError, DirectionsError, Result};
