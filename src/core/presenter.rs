use crate::core::polyline::{self, Precision};
use crate::domain::model::{BoundingBox, DirectionsResponse, DisplayPath, Route};
use crate::utils::error::DirectionsError;

/// Turns a route into points plus the camera bounds that contain them.
pub fn present(route: &Route, precision: Precision) -> Result<DisplayPath, DirectionsError> {
    let geometry = route.geometry.as_deref().ok_or(DirectionsError::EmptyRoute)?;

    let mut points = Vec::new();
    let mut bounds: Option<BoundingBox> = None;
    for point in polyline::points(geometry, precision) {
        let point = point?;
        match bounds.as_mut() {
            Some(b) => b.extend(point),
            None => bounds = Some(BoundingBox::around(point)),
        }
        points.push(point);
    }

    let bounds = bounds.ok_or(DirectionsError::EmptyRoute)?;
    if points.len() < 2 {
        tracing::debug!("Route geometry has a single point, bounds collapse to it");
    }

    Ok(DisplayPath {
        points,
        bounds,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}

pub fn present_best(
    response: &DirectionsResponse,
    precision: Precision,
) -> Result<DisplayPath, DirectionsError> {
    let route = response.best_route().ok_or_else(|| {
        tracing::info!(
            "Directions response {:?} carried no route{}",
            response.status,
            response
                .message
                .as_deref()
                .map(|m| format!(": {}", m))
                .unwrap_or_default()
        );
        DirectionsError::EmptyRoute
    })?;
    present(route, precision)
}
