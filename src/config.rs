use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::sources::arxiv::{ClientOptions, DEFAULT_ARXIV_API_URL};
use crate::topics::emerging::EmergenceThresholds;
use crate::topics::frequency::GrowthParams;

/// Central configuration loaded from environment variables.
///
/// Everything has a default, so an empty environment is a valid setup. The
/// .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// arXiv API endpoint (defaults to https://export.arxiv.org/api/query)
    pub arxiv_url: String,
    /// Where corpus files are written
    pub data_dir: PathBuf,
    /// Directory holding the embedding model files
    pub model_dir: PathBuf,
    pub default_years: u32,
    pub max_per_month: usize,
    pub page_size: usize,
    pub client: ClientOptions,
    pub growth: GrowthParams,
    pub emergence: EmergenceThresholds,
    /// Number of topic clusters when the CLI doesn't say otherwise
    pub clusters: usize,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Malformed numbers are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let client_defaults = ClientOptions::default();
        let growth_defaults = GrowthParams::default();
        let emergence_defaults = EmergenceThresholds::default();

        let model_dir = lookup("TRENDLENS_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(crate::topics::download::default_model_dir);

        let request_interval = match parsed::<u64>(&lookup, "TRENDLENS_REQUEST_INTERVAL_MS")? {
            Some(ms) => Duration::from_millis(ms),
            None => client_defaults.request_interval,
        };
        let probe_timeout = match parsed::<u64>(&lookup, "TRENDLENS_PROBE_TIMEOUT_SECS")? {
            Some(secs) => Duration::from_secs(secs),
            None => client_defaults.probe_timeout,
        };
        let fetch_timeout = match parsed::<u64>(&lookup, "TRENDLENS_FETCH_TIMEOUT_SECS")? {
            Some(secs) => Duration::from_secs(secs),
            None => client_defaults.fetch_timeout,
        };

        Ok(Self {
            arxiv_url: lookup("TRENDLENS_ARXIV_URL")
                .unwrap_or_else(|| DEFAULT_ARXIV_API_URL.to_string()),
            data_dir: lookup("TRENDLENS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            model_dir,
            default_years: parsed(&lookup, "TRENDLENS_DEFAULT_YEARS")?.unwrap_or(5),
            max_per_month: parsed(&lookup, "TRENDLENS_MAX_PER_MONTH")?.unwrap_or(200),
            page_size: parsed(&lookup, "TRENDLENS_PAGE_SIZE")?.unwrap_or(200),
            client: ClientOptions {
                request_interval,
                probe_timeout,
                fetch_timeout,
                max_retries: parsed(&lookup, "TRENDLENS_MAX_RETRIES")?
                    .unwrap_or(client_defaults.max_retries),
            },
            growth: GrowthParams {
                min_new_frequency: parsed(&lookup, "TRENDLENS_GROWTH_MIN_FREQ")?
                    .unwrap_or(growth_defaults.min_new_frequency),
            },
            emergence: EmergenceThresholds {
                growth_ratio: parsed(&lookup, "TRENDLENS_EMERGING_RATIO")?
                    .unwrap_or(emergence_defaults.growth_ratio),
                min_size: parsed(&lookup, "TRENDLENS_EMERGING_MIN_SIZE")?
                    .unwrap_or(emergence_defaults.min_size),
            },
            clusters: parsed(&lookup, "TRENDLENS_CLUSTERS")?.unwrap_or(4),
        })
    }
}

/// Parse an optional variable. Unset or blank is `None`; garbage is an error.
fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.arxiv_url, DEFAULT_ARXIV_API_URL);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.default_years, 5);
        assert_eq!(config.max_per_month, 200);
        assert_eq!(config.page_size, 200);
        assert_eq!(config.client.request_interval, Duration::from_secs(3));
        assert_eq!(config.client.max_retries, 0);
        assert_eq!(config.growth, GrowthParams::default());
        assert_eq!(config.emergence, EmergenceThresholds::default());
        assert_eq!(config.clusters, 4);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("TRENDLENS_DATA_DIR", "/tmp/corpora"),
            ("TRENDLENS_MAX_PER_MONTH", "50"),
            ("TRENDLENS_REQUEST_INTERVAL_MS", "250"),
            ("TRENDLENS_EMERGING_RATIO", "2.0"),
            ("TRENDLENS_GROWTH_MIN_FREQ", " 1 "),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/corpora"));
        assert_eq!(config.max_per_month, 50);
        assert_eq!(config.client.request_interval, Duration::from_millis(250));
        assert!((config.emergence.growth_ratio - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.growth.min_new_frequency, 1);
    }

    #[test]
    fn test_blank_value_falls_back_to_default() {
        let config = Config::from_lookup(lookup_from(&[("TRENDLENS_CLUSTERS", "  ")])).unwrap();
        assert_eq!(config.clusters, 4);
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("TRENDLENS_DEFAULT_YEARS", "five")]))
            .unwrap_err();
        assert!(err.to_string().contains("TRENDLENS_DEFAULT_YEARS"), "got: {err}");
    }
}
