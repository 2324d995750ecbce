//! Integration tests for `AmbeeClient` against a local `wiremock` server.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use volcwatch_sources::{volcano_events, AmbeeClient, EruptionStatus, HttpSettings, SourceError};

fn test_client(server: &MockServer) -> AmbeeClient {
    AmbeeClient::with_base_url(&HttpSettings::default(), "test-key", &server.uri())
        .expect("failed to build test AmbeeClient")
}

#[tokio::test]
async fn sends_api_key_and_country_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/disasters/latest/by-country-code"))
        .and(query_param("countryCode", "IDN"))
        .and(query_param("limit", "50"))
        .and(query_param("page", "1"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "success",
            "result": [
                {"event_type": "VO", "event_name": "Eruption of Lewotobi", "date": "2025-11-08 12:00:00", "lat": -8.54, "lng": 122.78},
                {"event_type": "VO", "event_name": "Volcanic activity at Dukono", "date": "2025-11-07 09:00:00", "lat": 1.69, "lng": 127.89},
                {"event_type": "EQ", "event_name": "Earthquake off Sulawesi", "date": "2025-11-07 02:00:00", "lat": -1.2, "lng": 120.1}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let events = test_client(&server)
        .get_latest_by_country("idn", 50)
        .await
        .unwrap();
    assert_eq!(events.len(), 3);

    let erupting = volcano_events(events.clone(), false);
    assert_eq!(erupting.len(), 1);
    assert_eq!(erupting[0].name, "Eruption of Lewotobi");

    let all = volcano_events(events, true);
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].status, EruptionStatus::Active);
}

#[tokio::test]
async fn string_coordinates_are_read_and_bad_ones_left_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/disasters/latest/by-country-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"event_type": "VO", "event_name": "Eruption of Semeru", "lat": "not-a-number", "lng": 112.9},
                {"event_type": "VO", "event_name": "Eruption of Ibu", "lat": "1.49", "lng": "127.63"},
                "garbage"
            ]
        })))
        .mount(&server)
        .await;

    let events = test_client(&server)
        .get_latest_by_country("IDN", 50)
        .await
        .unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].lat, None);

    let volcanoes = volcano_events(events, true);
    assert_eq!(volcanoes.len(), 1);
    assert_eq!(volcanoes[0].name, "Eruption of Ibu");
    assert!((volcanoes[0].latitude - 1.49).abs() < f64::EPSILON);
}

#[tokio::test]
async fn null_result_is_an_empty_event_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/disasters/latest/by-country-code"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "success", "result": null})),
        )
        .mount(&server)
        .await;

    let events = test_client(&server)
        .get_latest_by_country("IDN", 50)
        .await
        .unwrap();

    assert!(events.is_empty());
}

#[tokio::test]
async fn missing_result_is_an_empty_event_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/disasters/latest/by-country-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "success"})))
        .mount(&server)
        .await;

    let events = test_client(&server)
        .get_latest_by_country("IDN", 50)
        .await
        .unwrap();

    assert!(events.is_empty());
}

#[tokio::test]
async fn unauthorized_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/disasters/latest/by-country-code"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .get_latest_by_country("IDN", 50)
        .await
        .unwrap_err();

    assert!(
        matches!(err, SourceError::UnexpectedStatus { status: 401, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn rate_limit_reports_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/disasters/latest/by-country-code"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .get_latest_by_country("IDN", 50)
        .await
        .unwrap_err();

    assert!(
        matches!(err, SourceError::RateLimited { retry_after_secs: 30, .. }),
        "got: {err:?}"
    );
}
