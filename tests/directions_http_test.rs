use cartographie::core::polyline::{self, Precision};
use cartographie::domain::model::ResponseStatus;
use cartographie::domain::ports::DirectionsRepository;
use cartographie::{
    Coordinate, DirectionsError, DirectionsRequest, MapboxDirections, Profile, RetryPolicy,
    RoutePipeline,
};
use httpmock::prelude::*;
use std::time::Duration;

const COORDS_PATH: &str = "/walking/2.3522,48.8566;2.2945,48.8584";

fn request() -> DirectionsRequest {
    DirectionsRequest::from_lon_lat((2.3522, 48.8566), (2.2945, 48.8584), Profile::Walking)
        .unwrap()
}

fn client(base_url: &str) -> MapboxDirections {
    MapboxDirections::new(base_url, "pk.test-token", Duration::from_secs(2), Precision::FIVE)
        .unwrap()
}

fn walking_geometry() -> String {
    polyline::encode(
        &[
            Coordinate::new(2.3522, 48.8566).unwrap(),
            Coordinate::new(2.3400, 48.8610).unwrap(),
            Coordinate::new(2.3200, 48.8630).unwrap(),
            Coordinate::new(2.2945, 48.8584).unwrap(),
        ],
        Precision::FIVE,
    )
}

#[tokio::test]
async fn test_fetch_sends_expected_request_and_parses_routes() {
    let server = MockServer::start();
    let mock_body = serde_json::json!({
        "code": "Ok",
        "routes": [{
            "duration": 3452.1,
            "distance": 4321.0,
            "weight_name": "pedestrian",
            "weight": 3452.1,
            "geometry": walking_geometry(),
            "legs": [],
            "voiceLocale": "fr-FR"
        }],
        "waypoints": []
    });

    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path(COORDS_PATH)
            .query_param("geometries", "polyline")
            .query_param("overview", "full")
            .query_param("access_token", "pk.test-token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(mock_body);
    });

    let response = client(&server.base_url()).fetch(&request()).await.unwrap();

    api_mock.assert();
    assert_eq!(response.status, ResponseStatus::Ok);
    assert_eq!(response.routes.len(), 1);
    assert_eq!(response.routes[0].distance, 4321.0);
    assert_eq!(response.routes[0].voice_locale.as_deref(), Some("fr-FR"));
}

#[tokio::test]
async fn test_end_to_end_pipeline_with_real_http() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(COORDS_PATH);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "code": "Ok",
                "routes": [{
                    "duration": 3452.1,
                    "distance": 4321.0,
                    "weight_name": "pedestrian",
                    "weight": 3452.1,
                    "geometry": walking_geometry()
                }]
            }));
    });

    let pipeline = RoutePipeline::new(client(&server.base_url()));
    let path = pipeline
        .plan("2.3522,48.8566", "2.2945,48.8584", Profile::Walking)
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(path.points.len(), 4);
    assert!((path.bounds.min_lon - 2.2945).abs() < 1e-5);
    assert!((path.bounds.max_lon - 2.3522).abs() < 1e-5);
    assert!((path.bounds.min_lat - 48.8566).abs() < 1e-5);
    assert!((path.bounds.max_lat - 48.8630).abs() < 1e-5);

    let json = serde_json::to_value(&path).unwrap();
    assert_eq!(json["points"].as_array().unwrap().len(), 4);
    assert!(json["bounds"]["min_lon"].is_number());
}

#[tokio::test]
async fn test_server_error_is_not_malformed_response() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(COORDS_PATH);
        then.status(500).body("<html>Internal Server Error</html>");
    });

    let err = client(&server.base_url()).fetch(&request()).await.unwrap_err();

    api_mock.assert();
    assert_eq!(err, DirectionsError::ServerError(500));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_client_error_status() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(COORDS_PATH);
        then.status(401)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"message": "Not Authorized - Invalid Token"}));
    });

    let err = client(&server.base_url()).fetch(&request()).await.unwrap_err();

    api_mock.assert();
    assert_eq!(err, DirectionsError::ClientError(401));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(COORDS_PATH);
        then.status(200)
            .header("Content-Type", "application/json")
            .body("{\"code\": \"Ok\", \"routes\": [");
    });

    let err = client(&server.base_url()).fetch(&request()).await.unwrap_err();

    api_mock.assert();
    assert!(matches!(err, DirectionsError::MalformedResponse { .. }));
    assert_eq!(err.user_friendly_message(), "Route unavailable.");
}

#[tokio::test]
async fn test_empty_routes_never_produce_a_path() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(COORDS_PATH);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"code": "NoRoute", "routes": []}));
    });

    let pipeline = RoutePipeline::new(client(&server.base_url()));
    let err = pipeline.run(&request()).await.unwrap_err();

    api_mock.assert();
    assert_eq!(err, DirectionsError::EmptyRoute);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // 沒有服務監聽的埠
    let err = client("http://127.0.0.1:1").fetch(&request()).await.unwrap_err();
    assert!(matches!(err, DirectionsError::TransportError { .. }));
    assert!(!err.to_string().contains("pk.test-token"));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start();
    let _api_mock = server.mock(|when, then| {
        when.method(GET).path(COORDS_PATH);
        then.status(200)
            .delay(Duration::from_secs(2))
            .json_body(serde_json::json!({"code": "Ok", "routes": []}));
    });

    let slow_client = MapboxDirections::new(
        &server.base_url(),
        "pk.test-token",
        Duration::from_millis(200),
        Precision::FIVE,
    )
    .unwrap();
    let err = slow_client.fetch(&request()).await.unwrap_err();

    assert_eq!(
        err,
        DirectionsError::TransportError {
            message: "request timed out".to_string()
        }
    );
}

#[tokio::test]
async fn test_retry_exhaustion_hits_server_each_attempt() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path(COORDS_PATH);
        then.status(503);
    });

    let pipeline = RoutePipeline::with_retry(
        client(&server.base_url()),
        RetryPolicy::new(2, Duration::from_millis(10)),
    );
    let err = pipeline.run(&request()).await.unwrap_err();

    api_mock.assert_hits(3);
    assert_eq!(err, DirectionsError::ServerError(503));
}

#[tokio::test]
async fn test_polyline6_geometry() {
    let server = MockServer::start();
    let geometry = polyline::encode(
        &[
            Coordinate::new(2.352222, 48.856613).unwrap(),
            Coordinate::new(2.294481, 48.858370).unwrap(),
        ],
        Precision::SIX,
    );
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path(COORDS_PATH)
            .query_param("geometries", "polyline6");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "code": "Ok",
                "routes": [{"duration": 1.0, "distance": 2.0, "geometry": geometry}]
            }));
    });

    let client = MapboxDirections::new(
        &server.base_url(),
        "pk.test-token",
        Duration::from_secs(2),
        Precision::SIX,
    )
    .unwrap();
    let path = RoutePipeline::new(client).run(&request()).await.unwrap();

    api_mock.assert();
    assert_eq!(path.points.len(), 2);
    assert!((path.points[0].lon() - 2.352222).abs() < 1e-6);
    assert!((path.points[1].lat() - 48.858370).abs() < 1e-6);
}
