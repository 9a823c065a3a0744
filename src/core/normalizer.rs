use crate::domain::model::{Coordinate, DirectionsRequest, Profile};
use crate::utils::error::DirectionsError;

/// Parses `"lon,lat"` as typed into a start/end field.
///
/// Place names are not geocoded; anything that is not two comma-separated
/// numbers is an invalid request.
pub fn parse_coordinate(text: &str) -> Result<Coordinate, DirectionsError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DirectionsError::invalid_request("location is empty"));
    }

    let mut parts = trimmed.split(',');
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DirectionsError::invalid_request(format!(
            "'{}' is not in \"lon,lat\" form",
            trimmed
        )));
    };

    let lon = parse_number(lon, "longitude")?;
    let lat = parse_number(lat, "latitude")?;
    Coordinate::new(lon, lat)
}

fn parse_number(part: &str, name: &str) -> Result<f64, DirectionsError> {
    part.trim().parse::<f64>().map_err(|e| {
        DirectionsError::invalid_request(format!("{} '{}': {}", name, part.trim(), e))
    })
}

pub fn normalize(start: &str, end: &str, profile: Profile) -> Result<DirectionsRequest, DirectionsError> {
    let origin = parse_coordinate(start)?;
    let destination = parse_coordinate(end)?;
    Ok(DirectionsRequest::new(origin, destination, profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let c = parse_coordinate(" 2.3522 , 48.8566 ").unwrap();
        assert_eq!(c.lon(), 2.3522);
        assert_eq!(c.lat(), 48.8566);

        let c = parse_coordinate("-0.1278,51.5074").unwrap();
        assert_eq!(c.lon(), -0.1278);
    }

    #[test]
    fn test_parse_coordinate_rejects_bad_text() {
        for text in ["", "   ", "Paris", "2.35", "2.35,48.85,10", "abc,48.85", "2.35,"] {
            assert!(
                matches!(parse_coordinate(text), Err(DirectionsError::InvalidRequest { .. })),
                "{:?} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_parse_coordinate_rejects_out_of_range() {
        // lat,lon 順序寫反時緯度會超出範圍
        assert!(parse_coordinate("48.85,120.0").is_err());
    }

    #[test]
    fn test_normalize_builds_request() {
        let req = normalize("2.3522,48.8566", "2.2945,48.8584", Profile::Walking).unwrap();
        assert_eq!(req.origin().lon(), 2.3522);
        assert_eq!(req.destination().lat(), 48.8584);
        assert_eq!(req.profile(), Profile::Walking);
    }
}
