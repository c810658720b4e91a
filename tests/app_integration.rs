use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use xpense::core::ledger::DEFAULT_KEY;
use xpense::core::storage::KeyValueStore;
use xpense::core::{Expense, ExpenseStore};
use xpense::{AppCommand, ExpenseFields};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(currency: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v4/latest/{currency}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_failing_server(status: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

const USD_RATES: &str = r#"{
    "base": "USD",
    "date": "2026-10-16",
    "rates": { "USD": 1, "EUR": 0.5, "BRL": 5.25 }
}"#;

fn write_config(dir: &Path, base_url: &str) -> String {
    let config_path = dir.join("config.yaml");
    let config_content = format!(
        r#"
        currency: "USD"
        providers:
          exchangerate:
            base_url: {}
        data_path: "{}"
    "#,
        base_url,
        dir.join("data").display()
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path.to_string_lossy().into_owned()
}

fn stored_expenses(dir: &Path) -> Vec<Expense> {
    let backend = xpense::store::disk::DiskStore::open(&dir.join("data").join("store"))
        .expect("Failed to open store");
    ExpenseStore::new(Arc::new(backend))
        .load_all()
        .expect("Failed to load expenses")
}

fn raw_expenses(dir: &Path) -> Option<String> {
    let backend = xpense::store::disk::DiskStore::open(&dir.join("data").join("store"))
        .expect("Failed to open store");
    backend.get(DEFAULT_KEY).expect("Failed to read store")
}

fn add(description: &str, quantity: &str, amount: &str, to: &str) -> AppCommand {
    AppCommand::Add(ExpenseFields {
        description: Some(description.to_string()),
        quantity: Some(quantity.to_string()),
        amount: Some(amount.to_string()),
        currency_from: None,
        currency_to: Some(to.to_string()),
    })
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server("USD", USD_RATES).await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &mock_server.uri());

    for command in [
        add("Coffee", "2", "3.5", "USD"),
        add("Hotel", "1.5", "100", "EUR"),
        add("Taxi", "1", "20", "BRL"),
    ] {
        let result = xpense::run_command(command, Some(&config_path)).await;
        assert!(result.is_ok(), "Add failed with: {:?}", result.err());
    }

    let expenses = stored_expenses(temp_dir.path());
    info!(?expenses, "Stored after adds");
    let converted: Vec<f64> = expenses.iter().map(|e| e.converted_amount).collect();
    assert_eq!(converted, vec![7.0, 75.0, 105.0]);
    assert!(expenses.iter().all(|e| e.currency_from == "USD"));

    // Edit keeps the position and the fields that were not given
    let result = xpense::run_command(
        AppCommand::Edit {
            index: 1,
            fields: ExpenseFields {
                quantity: Some("3".to_string()),
                ..ExpenseFields::default()
            },
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Edit failed with: {:?}", result.err());

    let expenses = stored_expenses(temp_dir.path());
    assert_eq!(expenses.len(), 3);
    assert_eq!(expenses[1].description, "Hotel");
    assert_eq!(expenses[1].quantity, 3.0);
    assert_eq!(expenses[1].converted_amount, 150.0);
    assert_eq!(expenses[0].description, "Coffee");
    assert_eq!(expenses[2].description, "Taxi");

    let result = xpense::run_command(AppCommand::Remove { index: 0 }, Some(&config_path)).await;
    assert!(result.is_ok(), "Remove failed with: {:?}", result.err());

    let names: Vec<String> = stored_expenses(temp_dir.path())
        .into_iter()
        .map(|e| e.description)
        .collect();
    assert_eq!(names, vec!["Hotel", "Taxi"]);

    let result = xpense::run_command(AppCommand::List, Some(&config_path)).await;
    assert!(result.is_ok(), "List failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_failed_rate_lookup_leaves_store_untouched() {
    let good_server = test_utils::create_mock_server("USD", USD_RATES).await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &good_server.uri());

    xpense::run_command(add("Coffee", "2", "3.5", "EUR"), Some(&config_path))
        .await
        .expect("Seed add failed");
    let before = raw_expenses(temp_dir.path());
    assert!(before.is_some());

    let bad_server = test_utils::create_failing_server(503).await;
    let config_path = write_config(temp_dir.path(), &bad_server.uri());

    let err = xpense::run_command(add("Dinner", "1", "40", "EUR"), Some(&config_path))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not get the exchange rate. Please try again later."
    );
    assert!(format!("{err:#}").contains("503"));
    assert_eq!(raw_expenses(temp_dir.path()), before);

    // Unknown target currency fails the same way
    let config_path = write_config(temp_dir.path(), &good_server.uri());
    let result = xpense::run_command(add("Dinner", "1", "40", "XYZ"), Some(&config_path)).await;
    assert!(result.is_err());
    assert_eq!(raw_expenses(temp_dir.path()), before);
}

#[test_log::test(tokio::test)]
async fn test_validation_error_makes_no_request() {
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::any())
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(USD_RATES))
        .expect(0)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &mock_server.uri());

    let err = xpense::run_command(add("", "1", "1", "USD"), Some(&config_path))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Please fill in all fields"));

    let err = xpense::run_command(add("Tea", "abc", "1", "USD"), Some(&config_path))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("quantity must be a number"));

    assert_eq!(raw_expenses(temp_dir.path()), None);
}

#[test_log::test(tokio::test)]
async fn test_out_of_range_index() {
    let mock_server = test_utils::create_mock_server("USD", USD_RATES).await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &mock_server.uri());

    xpense::run_command(add("Coffee", "1", "2", "USD"), Some(&config_path))
        .await
        .expect("Seed add failed");
    let before = raw_expenses(temp_dir.path());

    let err = xpense::run_command(AppCommand::Remove { index: 5 }, Some(&config_path))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "There is no expense #5.");

    let err = xpense::run_command(
        AppCommand::Edit {
            index: 1,
            fields: ExpenseFields::default(),
        },
        Some(&config_path),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "There is no expense #1.");

    assert_eq!(raw_expenses(temp_dir.path()), before);
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.yaml");

    let result = xpense::run_command(AppCommand::List, Some(missing.to_str().unwrap())).await;
    assert!(result.is_err());
}
