use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use autobiz_cli::commands::{catalog, config, doctor, profile, recommend};
use serde_json::Value;
use tempfile::TempDir;

const STORE_MESSAGES: [&str; 2] = [
    "We run a small online store and want to automate order handling to increase sales.",
    "Right now everything is manual.",
];

#[test]
fn profile_extracts_industry_and_goals() {
    with_env(&[], || {
        let result = profile::run(&messages(&STORE_MESSAGES));
        assert_eq!(result.exit_code, 0, "expected successful profile extraction");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "profile");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["industry"], "E-commerce");
        assert_eq!(payload["data"]["size"], "small");

        let goals = payload["data"]["goals"].as_array().cloned().unwrap_or_default();
        assert!(goals.contains(&Value::from("process automation")));
        assert!(goals.contains(&Value::from("increase sales")));
    });
}

#[test]
fn profile_rejects_blank_messages() {
    with_env(&[], || {
        let result = profile::run(&messages(&["   "]));
        assert_eq!(result.exit_code, 4, "expected invalid argument exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_argument");
    });
}

#[test]
fn recommend_ranks_builtin_catalog() {
    with_env(&[], || {
        let result = recommend::run(&messages(&STORE_MESSAGES), None);
        assert_eq!(result.exit_code, 0, "expected successful recommendation run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["data"]["profile"]["industry"], "E-commerce");

        let recommendations =
            payload["data"]["recommendations"].as_array().cloned().unwrap_or_default();
        assert!(!recommendations.is_empty(), "expected at least one recommendation");
        assert!(recommendations.len() <= 3, "at most three recommendations are returned");

        let ids: Vec<&str> = recommendations
            .iter()
            .filter_map(|recommendation| recommendation["template"]["id"].as_str())
            .collect();
        assert!(ids.contains(&"ecommerce-order-automation"), "got {ids:?}");

        let scores: Vec<u64> = recommendations
            .iter()
            .filter_map(|recommendation| recommendation["score"].as_u64())
            .collect();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]), "scores not ordered: {scores:?}");
        assert!(scores.iter().all(|score| (60..=100).contains(score)));
    });
}

#[test]
fn recommend_reports_missing_catalog_file() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("missing.json");

        let result = recommend::run(&messages(&STORE_MESSAGES), Some(missing));
        assert_eq!(result.exit_code, 3, "expected catalog load failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "catalog_load");
    });
}

#[test]
fn recommend_returns_config_failure_for_invalid_env() {
    with_env(&[("AUTOBIZ_LLM_PROVIDER", "openai")], || {
        let result = recommend::run(&messages(&STORE_MESSAGES), None);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn catalog_filters_by_category() {
    with_env(&[], || {
        let result = catalog::run(None, Some("crm".to_string()), None);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let rows = payload["data"].as_array().cloned().unwrap_or_default();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| row["category"] == "crm"));
    });
}

#[test]
fn catalog_rejects_unknown_category() {
    with_env(&[], || {
        let result = catalog::run(None, Some("astrology".to_string()), None);
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_argument");
    });
}

#[test]
fn catalog_reads_custom_file_from_env() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"[{
            "id": "custom-invoice-bot",
            "name": "Invoice Bot",
            "description": "Chases unpaid invoices",
            "category": "finance",
            "industry": ["any"],
            "businessSize": "small",
            "complexity": "basic",
            "estimatedROI": 220,
            "implementationTime": "1 week",
            "price": 500,
            "tags": ["invoices"]
        }]"#,
    )
    .expect("write catalog");
    let path_value = path.display().to_string();

    with_env(&[("AUTOBIZ_CATALOG_PATH", path_value.as_str())], || {
        let result = catalog::run(Some("invoice".to_string()), None, None);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["message"], "1 of 1 templates matched");
        assert_eq!(payload["data"][0]["id"], "custom-invoice-bot");
    });
}

#[test]
fn config_redacts_api_key_and_reports_sources() {
    with_env(
        &[
            ("AUTOBIZ_LLM_PROVIDER", "openai"),
            ("AUTOBIZ_LLM_API_KEY", "sk-live-very-secret"),
            ("AUTOBIZ_LOG_LEVEL", "debug"),
        ],
        || {
            let output = config::run();
            assert!(!output.contains("sk-live-very-secret"), "api key must be redacted");
            assert!(output.contains("- llm.api_key = <redacted> (source: env (AUTOBIZ_LLM_API_KEY))"));
            assert!(output.contains("- llm.provider = openai (source: env (AUTOBIZ_LLM_PROVIDER))"));
            assert!(output.contains("- logging.level = debug (source: env (AUTOBIZ_LOG_LEVEL))"));
            assert!(output.contains("- server.port = 8080 (source: default)"));
        },
    );
}

#[test]
fn config_reports_validation_failure() {
    with_env(&[("AUTOBIZ_LLM_PROVIDER", "anthropic")], || {
        let output = config::run();
        assert!(output.starts_with("config validation failed:"), "got {output}");
    });
}

#[test]
fn doctor_passes_offline_with_builtin_catalog() {
    with_env(&[], || {
        let output = doctor::run(true);
        let payload = parse_payload(&output);

        assert_eq!(payload["overall_status"], "pass");
        let checks = payload["checks"].as_array().cloned().unwrap_or_default();
        let status_of = |name: &str| {
            checks
                .iter()
                .find(|check| check["name"] == name)
                .map(|check| check["status"].clone())
                .unwrap_or(Value::Null)
        };
        assert_eq!(status_of("config_validation"), "pass");
        assert_eq!(status_of("catalog_load"), "pass");
        assert_eq!(status_of("llm_readiness"), "skipped");
    });
}

#[test]
fn doctor_fails_and_skips_when_config_is_invalid() {
    with_env(&[("AUTOBIZ_SERVER_PORT", "not-a-port")], || {
        let output = doctor::run(false);

        assert_eq!(output.lines().next(), Some("doctor: one or more readiness checks failed"));
        assert!(output.contains("- [fail] config_validation:"));
        assert!(last_line(&output).starts_with("- [skip] llm_readiness:"));
    });
}

fn messages(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn last_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "AUTOBIZ_LLM_PROVIDER",
        "AUTOBIZ_LLM_API_KEY",
        "AUTOBIZ_LLM_BASE_URL",
        "AUTOBIZ_LLM_MODEL",
        "AUTOBIZ_LLM_TIMEOUT_SECS",
        "AUTOBIZ_LLM_MAX_RETRIES",
        "AUTOBIZ_LLM_TEMPERATURE",
        "AUTOBIZ_CATALOG_PATH",
        "AUTOBIZ_SERVER_BIND_ADDRESS",
        "AUTOBIZ_SERVER_PORT",
        "AUTOBIZ_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "AUTOBIZ_CHECKOUT_CONFIRMATION_DELAY_MS",
        "AUTOBIZ_LOGGING_LEVEL",
        "AUTOBIZ_LOGGING_FORMAT",
        "AUTOBIZ_LOG_LEVEL",
        "AUTOBIZ_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
