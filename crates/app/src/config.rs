use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base: Url,
    pub request_timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid integer for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("failed to read .env: {0}")]
    Dotenv(#[from] std::io::Error),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source; blank values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_base_raw = read("OPINIONS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(&api_base_raw)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .ok_or_else(|| ConfigError::InvalidValue("OPINIONS_API_BASE", api_base_raw.clone()))?;

        let timeout_secs = match read("OPINIONS_REQUEST_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidNumber("OPINIONS_REQUEST_TIMEOUT_SECS", raw)),
            },
        };

        let user_agent = read("OPINIONS_USER_AGENT")
            .unwrap_or_else(|| format!("opinions/{}", env!("CARGO_PKG_VERSION")));

        Ok(Self {
            api_base,
            request_timeout: Duration::from_secs(timeout_secs),
            user_agent,
        })
    }
}

/// Seeds the process environment from `./.env`. Variables that are already
/// set are left alone.
pub fn load_dotenv() -> Result<(), ConfigError> {
    let path = Path::new(".env");
    if !path.exists() {
        return Ok(());
    }
    let contents = std::fs::read_to_string(path)?;
    for (key, value) in contents.lines().filter_map(dotenv_entry) {
        if std::env::var_os(&key).is_none() {
            // Safety: called from main before the runtime starts any threads.
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
    Ok(())
}

/// One `KEY=value` line. Comments, blanks and lines without a key are
/// skipped; an `export ` prefix is accepted.
fn dotenv_entry(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, raw) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), dotenv_value(raw.trim())))
}

fn dotenv_value(raw: &str) -> String {
    if let Some(inner) = raw.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
        return inner.to_string();
    }
    let Some(inner) = raw.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) else {
        // Unquoted values may carry a trailing comment.
        return match raw.find(" #") {
            Some(index) => raw[..index].trim_end().to_string(),
            None => raw.to_string(),
        };
    };
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some(escaped @ ('\\' | '"')) => value.push(escaped),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}
