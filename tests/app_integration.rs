use rust_decimal_macros::dec;
use std::fs;
use tempfile::TempDir;
use tracing::info;
use tripledger::core::config::AppConfig;
use tripledger::core::exchange::RatesOrigin;
use tripledger::core::trip::StatusFilter;
use tripledger::{AppCommand, build_rate_service, run_command};

mod test_utils {
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const RATES_RESPONSE: &str = r#"{
        "provider": "https://www.exchangerate-api.com",
        "base": "USD",
        "date": "2026-06-01",
        "rates": {"USD": 1, "EUR": 0.5, "JPY": 150, "GBP": 0.8}
    }"#;

    pub async fn create_rates_server(template: ResponseTemplate, calls: u64) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(template)
            .expect(calls)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn ok_response() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(RATES_RESPONSE)
    }

    pub fn slow_response() -> ResponseTemplate {
        ok_response().set_delay(Duration::from_secs(3))
    }
}

fn write_config(dir: &TempDir, base_url: &str, timeout_secs: u64) -> String {
    let config_content = format!(
        r#"
currency: "USD"
data_path: "{}"
providers:
  exchange_rate:
    base_url: "{base_url}"
    timeout_secs: {timeout_secs}
cache:
  persist: false
trips:
  - title: "Summer in Europe"
    start_date: 2026-07-01
    end_date: 2026-07-14
    currency: "EUR"
    stops:
      - city_name: "Paris"
        country: "France"
        start_date: 2026-07-01
        end_date: 2026-07-05
        activities:
          - name: "Louvre"
            category: culture
            cost: 22
    budget:
      transport: 450
      lodging: 1400
      meals: 600
      limit: 2000
"#,
        dir.path().display()
    );
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path.to_string_lossy().to_string()
}

#[test_log::test(tokio::test)]
async fn test_budget_flow_with_mock() {
    let mock_server = test_utils::create_rates_server(test_utils::ok_response(), 1).await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &mock_server.uri(), 5);

    let result = run_command(
        AppCommand::Budget {
            trip: "summer in europe".to_string(),
            from: Some("USD".to_string()),
        },
        Some(&config_path),
    )
    .await;

    info!(?result, "Budget command finished");
    assert!(result.is_ok(), "Budget flow failed: {result:?}");
}

#[test_log::test(tokio::test)]
async fn test_budget_without_conversion_stays_offline() {
    let mock_server = test_utils::create_rates_server(test_utils::ok_response(), 0).await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &mock_server.uri(), 5);

    let result = run_command(
        AppCommand::Budget {
            trip: "1".to_string(),
            from: None,
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Budget flow failed: {result:?}");
}

#[test_log::test(tokio::test)]
async fn test_trips_flow_with_mock() {
    let mock_server = test_utils::create_rates_server(test_utils::ok_response(), 1).await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &mock_server.uri(), 5);

    let result = run_command(
        AppCommand::Trips {
            status: StatusFilter::All,
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Trips flow failed: {result:?}");
}

#[test_log::test(tokio::test)]
async fn test_convert_and_rates_flow_with_mock() {
    let mock_server = test_utils::create_rates_server(test_utils::ok_response(), 2).await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &mock_server.uri(), 5);

    let convert = run_command(
        AppCommand::Convert {
            amount: "100".to_string(),
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        Some(&config_path),
    )
    .await;
    assert!(convert.is_ok(), "Convert flow failed: {convert:?}");

    let rates = run_command(AppCommand::Rates { refresh: true }, Some(&config_path)).await;
    assert!(rates.is_ok(), "Rates flow failed: {rates:?}");
}

#[test_log::test(tokio::test)]
async fn test_convert_rejects_invalid_amount() {
    let mock_server = test_utils::create_rates_server(test_utils::ok_response(), 0).await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &mock_server.uri(), 5);

    let result = run_command(
        AppCommand::Convert {
            amount: "lots".to_string(),
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        Some(&config_path),
    )
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Invalid amount: \"lots\" is not a number");
}

#[test_log::test(tokio::test)]
async fn test_unknown_trip_is_an_error() {
    let mock_server = test_utils::create_rates_server(test_utils::ok_response(), 0).await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &mock_server.uri(), 5);

    let result = run_command(
        AppCommand::Itinerary {
            trip: "Mars".to_string(),
        },
        Some(&config_path),
    )
    .await;
    assert_eq!(result.unwrap_err().to_string(), "No trip named 'Mars'");
}

#[test_log::test(tokio::test)]
async fn test_service_caches_live_rates() {
    let mock_server = test_utils::create_rates_server(test_utils::ok_response(), 1).await;
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from_path(write_config(&dir, &mock_server.uri(), 5)).unwrap();
    let service = build_rate_service(&config).unwrap();

    let (_, origin) = service.get_rates_with_origin().await;
    assert_eq!(origin, RatesOrigin::Live);

    assert_eq!(service.convert(dec!(100), "USD", "EUR").await.unwrap(), dec!(50.00));
    assert_eq!(service.convert(dec!(150), "JPY", "GBP").await.unwrap(), dec!(0.80));
}

#[test_log::test(tokio::test)]
async fn test_slow_provider_falls_back() {
    let mock_server = test_utils::create_rates_server(test_utils::slow_response(), 2).await;
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from_path(write_config(&dir, &mock_server.uri(), 1)).unwrap();
    let service = build_rate_service(&config).unwrap();

    let (rates, origin) = service.get_rates_with_origin().await;
    assert_eq!(origin, RatesOrigin::Fallback);
    assert_eq!(rates.rate("EUR"), Some(dec!(0.92)));

    // The fallback table is not cached, so the next lookup tries the source again.
    assert_eq!(service.convert(dec!(92), "EUR", "USD").await.unwrap(), dec!(100.00));
}
