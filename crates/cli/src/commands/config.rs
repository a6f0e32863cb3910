use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use autobiz_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let sources = SourceLookup {
        doc: load_config_file_doc(config_file_path.as_deref()),
        path: config_file_path,
    };

    let llm_api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<builtin>".to_string());
    let base_url = config.llm_base_url().unwrap_or_else(|| "<unset>".to_string());
    let log_format = format!("{:?}", config.logging.format).to_ascii_lowercase();

    let lines = vec![
        "effective config (source precedence: env > file > default):".to_string(),
        sources.line("llm.provider", config.llm.provider.as_str(), &["AUTOBIZ_LLM_PROVIDER"]),
        sources.line("llm.model", &config.llm.model, &["AUTOBIZ_LLM_MODEL"]),
        sources.line("llm.base_url", &base_url, &["AUTOBIZ_LLM_BASE_URL"]),
        sources.line("llm.api_key", llm_api_key, &["AUTOBIZ_LLM_API_KEY"]),
        sources.line(
            "llm.timeout_secs",
            &config.llm.timeout_secs.to_string(),
            &["AUTOBIZ_LLM_TIMEOUT_SECS"],
        ),
        sources.line(
            "llm.max_retries",
            &config.llm.max_retries.to_string(),
            &["AUTOBIZ_LLM_MAX_RETRIES"],
        ),
        sources.line(
            "llm.temperature",
            &config.llm.temperature.to_string(),
            &["AUTOBIZ_LLM_TEMPERATURE"],
        ),
        sources.line("catalog.path", &catalog_path, &["AUTOBIZ_CATALOG_PATH"]),
        sources.line(
            "server.bind_address",
            &config.server.bind_address,
            &["AUTOBIZ_SERVER_BIND_ADDRESS"],
        ),
        sources.line("server.port", &config.server.port.to_string(), &["AUTOBIZ_SERVER_PORT"]),
        sources.line(
            "server.graceful_shutdown_secs",
            &config.server.graceful_shutdown_secs.to_string(),
            &["AUTOBIZ_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        sources.line(
            "checkout.confirmation_delay_ms",
            &config.checkout.confirmation_delay_ms.to_string(),
            &["AUTOBIZ_CHECKOUT_CONFIRMATION_DELAY_MS"],
        ),
        sources.line(
            "logging.level",
            &config.logging.level,
            &["AUTOBIZ_LOGGING_LEVEL", "AUTOBIZ_LOG_LEVEL"],
        ),
        sources.line(
            "logging.format",
            &log_format,
            &["AUTOBIZ_LOGGING_FORMAT", "AUTOBIZ_LOG_FORMAT"],
        ),
    ];

    lines.join("\n")
}

struct SourceLookup {
    doc: Option<Value>,
    path: Option<PathBuf>,
}

impl SourceLookup {
    fn line(&self, key_path: &str, value: &str, env_keys: &[&str]) -> String {
        let source = field_source(key_path, env_keys, self.doc.as_ref(), self.path.as_deref());
        render_line(key_path, value, source)
    }
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from(DEFAULT_CONFIG_FILE), Path::new("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let from_env = env_keys
        .iter()
        .find(|env_key| env::var(env_key).map(|value| !value.trim().is_empty()).unwrap_or(false));
    if let Some(env_key) = from_env {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
