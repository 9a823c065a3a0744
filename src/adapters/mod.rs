// Adapters layer: concrete directions sources behind the DirectionsRepository port.

pub mod mapbox;
pub mod scripted;

pub use mapbox::MapboxDirections;
pub use scripted::ScriptedDirections;
