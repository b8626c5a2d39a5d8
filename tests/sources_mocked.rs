/// Integration tests with mocked external sources.
/// Tests the fetch contracts without hitting real external services.
use country_gdp_api::config::Config;
use country_gdp_api::errors::AppError;
use country_gdp_api::sources::SourceClient;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create a test config pointing at a mock server
fn create_test_config(base_url: &str, timeout_ms: u64) -> Config {
    Config {
        database_url: "postgresql://test".to_string(),
        port: 3000,
        country_api_url: format!("{}/countries", base_url),
        exchange_api_url: format!("{}/rates", base_url),
        fetch_timeout_ms: timeout_ms,
        summary_image_path: "./cache/summary.png".to_string(),
    }
}

#[tokio::test]
async fn fetch_countries_parses_list_with_sparse_entries() {
    let mock_server = MockServer::start().await;

    let mock_response = serde_json::json!([
        {
            "name": "Testland",
            "capital": "Test City",
            "region": "Test Region",
            "population": 1000000,
            "flag": "https://flags.example/testland.svg",
            "currencies": [{ "code": "TST", "name": "Test Dollar", "symbol": "$" }]
        },
        {
            // Only the name is guaranteed; everything else defaults
            "name": "Sparse Island"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&mock_response))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2000);
    let client = SourceClient::new(&config).unwrap();

    let countries = client.fetch_countries().await.unwrap();
    assert_eq!(countries.len(), 2);
    assert_eq!(countries[0].name, "Testland");
    assert_eq!(countries[0].population, 1_000_000);
    assert_eq!(
        countries[0].currencies.as_ref().unwrap()[0].code.as_deref(),
        Some("TST")
    );
    assert_eq!(countries[1].population, 0);
    assert!(countries[1].capital.is_none());
    assert!(countries[1].currencies.is_none());
}

#[tokio::test]
async fn non_list_country_payload_is_source_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "message": "unexpected shape" })),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2000);
    let client = SourceClient::new(&config).unwrap();

    let result = client.fetch_countries().await;
    assert!(matches!(result, Err(AppError::SourceUnavailable(_))));
}

#[tokio::test]
async fn server_error_is_source_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2000);
    let client = SourceClient::new(&config).unwrap();

    let result = client.fetch_countries().await;
    assert!(matches!(result, Err(AppError::SourceUnavailable(_))));
}

#[tokio::test]
async fn fetch_rates_parses_rate_table() {
    let mock_server = MockServer::start().await;

    let mock_response = serde_json::json!({
        "result": "success",
        "base_code": "USD",
        "rates": { "USD": 1.0, "EUR": 0.92, "JPY": 147.5 }
    });

    Mock::given(method("GET"))
        .and(path("/rates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&mock_response))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2000);
    let client = SourceClient::new(&config).unwrap();

    let rates = client.fetch_rates().await.unwrap();
    assert_eq!(rates.len(), 3);
    assert_eq!(rates.get("EUR"), Some(&0.92));
}

#[tokio::test]
async fn rate_payload_without_rates_member_degrades_to_empty_table() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": "success"
        })))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2000);
    let client = SourceClient::new(&config).unwrap();

    let rates = client.fetch_rates().await.unwrap();
    assert!(rates.is_empty());
}

#[tokio::test]
async fn slow_source_times_out_as_source_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rates"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "rates": {} }))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 200);
    let client = SourceClient::new(&config).unwrap();

    let result = client.fetch_rates().await;
    assert!(matches!(result, Err(AppError::SourceUnavailable(_))));
}
