use std::time::Duration;

use crate::error::{Error, Result};

// ─── Defaults ────────────────────────────────────────────────────

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_WRITE_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;

// ─── Config ──────────────────────────────────────────────────────

/// Everything the process needs, resolved once at boot and immutable
/// afterwards. A malformed environment is a fatal startup error, never a
/// degraded start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ordered store endpoints; every one must be reachable at boot.
    pub store_urls: Vec<String>,
    /// Global bound on how long a write waits for its first acknowledgment.
    pub write_timeout: Duration,
    /// Per-store budget a read query gets before that store is skipped.
    pub read_timeout: Duration,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = get("STORE_URLS").ok_or_else(|| {
            Error::Config(
                "STORE_URLS must be set (comma-separated redis:// URLs)"
                    .into(),
            )
        })?;
        let store_urls: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if store_urls.is_empty() {
            return Err(Error::Config(
                "STORE_URLS contains no endpoints".into(),
            ));
        }

        Ok(Self {
            store_urls,
            write_timeout: millis_var(
                &get,
                "WRITE_TIMEOUT_MS",
                DEFAULT_WRITE_TIMEOUT_MS,
            )?,
            read_timeout: millis_var(
                &get,
                "READ_TIMEOUT_MS",
                DEFAULT_READ_TIMEOUT_MS,
            )?,
            port: match get("PORT") {
                Some(raw) => raw.parse().map_err(|_| {
                    Error::Config(format!("PORT is not a port number: {raw}"))
                })?,
                None => DEFAULT_PORT,
            },
        })
    }
}

fn millis_var(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default_ms: u64,
) -> Result<Duration> {
    let ms = match get(key) {
        Some(raw) => raw.parse().map_err(|_| {
            Error::Config(format!("{key} is not a millisecond count: {raw}"))
        })?,
        None => default_ms,
    };
    if ms == 0 {
        return Err(Error::Config(format!("{key} must be positive")));
    }
    Ok(Duration::from_millis(ms))
}

// ─── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn urls_are_split_and_trimmed() {
        let config = Config::from_lookup(env(&[(
            "STORE_URLS",
            "redis://a:6379/, redis://b:6379/ ,redis://c:6379/",
        )]))
        .unwrap();
        assert_eq!(config.store_urls.len(), 3);
        assert_eq!(config.store_urls[1], "redis://b:6379/");
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config =
            Config::from_lookup(env(&[("STORE_URLS", "redis://a:6379/")]))
                .unwrap();
        assert_eq!(config.write_timeout, Duration::from_secs(10));
        assert_eq!(config.read_timeout, Duration::from_secs(10));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn overrides_are_honored() {
        let config = Config::from_lookup(env(&[
            ("STORE_URLS", "redis://a:6379/"),
            ("WRITE_TIMEOUT_MS", "1500"),
            ("READ_TIMEOUT_MS", "2500"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.write_timeout, Duration::from_millis(1500));
        assert_eq!(config.read_timeout, Duration::from_millis(2500));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn missing_or_empty_store_list_is_fatal() {
        assert!(Config::from_lookup(env(&[])).is_err());
        assert!(Config::from_lookup(env(&[("STORE_URLS", " , ,")])).is_err());
    }

    #[test]
    fn malformed_numbers_are_fatal() {
        let base = [("STORE_URLS", "redis://a:6379/")];
        assert!(Config::from_lookup(env(
            &[base[0], ("WRITE_TIMEOUT_MS", "soon")]
        ))
        .is_err());
        assert!(
            Config::from_lookup(env(&[base[0], ("WRITE_TIMEOUT_MS", "0")]))
                .is_err()
        );
        assert!(Config::from_lookup(env(&[base[0], ("PORT", "http")])).is_err());
    }
}
