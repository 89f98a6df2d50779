use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::highlights::{DEFAULT_SNIPPET_WORDS, MAX_HIGHLIGHTS};
use crate::report::AnalysisOptions;

/// Runtime settings, read from the environment (and `.env`) at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub fetch_timeout: Duration,
    pub review_limit: usize,
    pub snippet_words: usize,
    pub use_sample_reviews: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: "0.0.0.0:5000".to_string(),
            fetch_timeout: Duration::from_secs(8),
            review_limit: 50,
            snippet_words: DEFAULT_SNIPPET_WORDS,
            use_sample_reviews: true,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using default", key, value);
            default
        }),
    }
}

fn parse_bool(key: &str, raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(|v| v.trim().to_lowercase()) {
        None => default,
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                warn!("Ignoring invalid {}={:?}, using default", key, v);
                default
            }
        },
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset or invalid
    /// values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        AppConfig {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            fetch_timeout: Duration::from_secs(parse_or(
                "FETCH_TIMEOUT_SECS",
                lookup("FETCH_TIMEOUT_SECS"),
                defaults.fetch_timeout.as_secs(),
            )),
            review_limit: parse_or("REVIEW_LIMIT", lookup("REVIEW_LIMIT"), defaults.review_limit),
            snippet_words: parse_or("SNIPPET_WORDS", lookup("SNIPPET_WORDS"), defaults.snippet_words),
            use_sample_reviews: parse_bool(
                "USE_SAMPLE_REVIEWS",
                lookup("USE_SAMPLE_REVIEWS"),
                defaults.use_sample_reviews,
            ),
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            snippet_words: self.snippet_words,
            max_highlights: MAX_HIGHLIGHTS,
        }
    }
}
