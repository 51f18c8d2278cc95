//! Integration tests for GeoCountryResolver using wiremock.
//!
//! One mock server plays both the geocoding provider and the country-data
//! service; the paths don't collide.

use skydeck_weather::{
    CountryClient, Coordinates, GeoCountryResolver, LocationQuery, LookupError, OpenWeatherClient,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver_for(server: &MockServer) -> GeoCountryResolver {
    let provider =
        OpenWeatherClient::with_base_url(&server.uri(), Some("test-key".to_string())).unwrap();
    let countries = CountryClient::with_base_url(&server.uri()).unwrap();
    GeoCountryResolver::new(provider, countries)
}

fn geo_hit(name: &str, lat: f64, lon: f64, country: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "lat": lat,
        "lon": lon,
        "country": country
    })
}

fn country_body(code: &str, name: &str) -> serde_json::Value {
    serde_json::json!([{
        "cca2": code,
        "name": {"common": name, "official": name},
        "population": 1000000,
        "region": "Europe",
        "area": 1000.0
    }])
}

#[tokio::test]
async fn test_coordinates_use_reverse_path_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([geo_hit("London", 51.5, -0.12, "GB")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3.1/alpha/GB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(country_body("GB", "United Kingdom")))
        .mount(&mock_server)
        .await;

    // The forward endpoint must stay cold
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let resolver = resolver_for(&mock_server);
    let resolved = resolver
        .resolve_country(&LocationQuery::Coords(Coordinates::new(51.5, -0.12)))
        .await
        .unwrap();

    assert_eq!(resolved.record.code, "GB");
    assert_eq!(resolved.record.name, "United Kingdom");
    // The caller already has coordinates; nothing extra to surface
    assert!(resolved.map_center.is_none());
}

#[tokio::test]
async fn test_name_path_surfaces_map_center() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Lisbon"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([geo_hit("Lisbon", 38.7223, -9.1393, "PT")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3.1/alpha/PT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(country_body("PT", "Portugal")))
        .mount(&mock_server)
        .await;

    let resolver = resolver_for(&mock_server);
    let resolved = resolver
        .resolve_country(&LocationQuery::Name("Lisbon".to_string()))
        .await
        .unwrap();

    assert_eq!(resolved.record.name, "Portugal");
    let center = resolved.map_center.unwrap();
    assert_eq!(center.latitude, 38.7223);
    assert_eq!(center.longitude, -9.1393);
}

#[tokio::test]
async fn test_only_first_hit_is_used() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            geo_hit("Springfield", 39.8, -89.6, "US"),
            geo_hit("Springfield", 42.1, -72.5, "CA"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3.1/alpha/US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(country_body("US", "United States")))
        .mount(&mock_server)
        .await;

    let resolver = resolver_for(&mock_server);
    let resolved = resolver
        .resolve_country(&LocationQuery::Name("Springfield".to_string()))
        .await
        .unwrap();

    assert_eq!(resolved.record.code, "US");
}

#[tokio::test]
async fn test_empty_geocode_result_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let resolver = resolver_for(&mock_server);
    let err = resolver
        .resolve_country(&LocationQuery::Name("Atlantis".to_string()))
        .await
        .unwrap_err();

    assert_eq!(err, LookupError::NotFound);
}

#[tokio::test]
async fn test_upstream_failure_is_reported_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = resolver_for(&mock_server);
    let err = resolver
        .resolve_country(&LocationQuery::Coords(Coordinates::new(1.0, 2.0)))
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Upstream(_)));
}

#[tokio::test]
async fn test_country_service_404_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([geo_hit("Nowhere", 0.0, 0.0, "XX")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3.1/alpha/XX"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let resolver = resolver_for(&mock_server);
    let err = resolver
        .resolve_country(&LocationQuery::Coords(Coordinates::new(0.0, 0.0)))
        .await
        .unwrap_err();

    assert_eq!(err, LookupError::NotFound);
}

#[tokio::test]
async fn test_missing_api_key_skips_network() {
    let mock_server = MockServer::start().await;

    // Any request would violate this expectation
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherClient::with_base_url(&mock_server.uri(), None).unwrap();
    let countries = CountryClient::with_base_url(&mock_server.uri()).unwrap();
    let resolver = GeoCountryResolver::new(provider, countries);

    let err = resolver
        .resolve_country(&LocationQuery::Name("London".to_string()))
        .await
        .unwrap_err();

    assert_eq!(err, LookupError::MissingApiKey);
}

#[tokio::test]
async fn test_utc_offset_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Mumbai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Mumbai",
            "timezone": 19800
        })))
        .mount(&mock_server)
        .await;

    let provider =
        OpenWeatherClient::with_base_url(&mock_server.uri(), Some("test-key".to_string())).unwrap();
    let offset = provider
        .utc_offset(&LocationQuery::Name("Mumbai".to_string()))
        .await
        .unwrap();

    assert_eq!(offset, 19800);
}

#[tokio::test]
async fn test_utc_offset_prefers_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "59.33"))
        .and(query_param("lon", "18.07"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timezone": 3600
        })))
        .mount(&mock_server)
        .await;

    let provider =
        OpenWeatherClient::with_base_url(&mock_server.uri(), Some("test-key".to_string())).unwrap();
    let query = LocationQuery::new(Some((59.33, 18.07)), "Stockholm");
    let offset = provider.utc_offset(&query).await.unwrap();

    assert_eq!(offset, 3600);
}
