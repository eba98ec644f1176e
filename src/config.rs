use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "SickScan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that overrides the artifact directory.
pub const DATA_DIR_ENV: &str = "SICKSCAN_DATA_DIR";

/// Artifact file names inside the data directory.
pub const SYMPTOMS_FILE: &str = "symptoms.json";
pub const CONDITIONS_FILE: &str = "conditions.json";
pub const MODEL_FILE: &str = "model.json";

/// Matching and ranking defaults.
pub mod defaults {
    /// Minimum token-set similarity (0-100) for a symptom mention to count.
    pub const CONFIDENCE_THRESHOLD: u8 = 85;

    /// Tokens scanned backwards from a mention when looking for a negator.
    pub const NEGATION_WINDOW: usize = 5;

    /// First-pass ranking depth (CLI and HTTP `predict`).
    pub const TOP_N: usize = 5;

    /// Ranking depth after the user confirmed extra symptoms.
    pub const TOP_N_REFINED: usize = 3;

    /// Laplace smoothing used when fitting the naive Bayes model.
    pub const SMOOTHING_ALPHA: f64 = 1.0;

    /// Default bind address for `sickscan serve`.
    pub const SERVE_ADDR: &str = "127.0.0.1:5000";
}

/// Get the application data directory
/// ~/SickScan/ on all platforms
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// Resolve the directory holding the knowledge base and model artifacts.
///
/// Priority:
/// 1. explicit path (CLI `--data-dir`)
/// 2. `SICKSCAN_DATA_DIR` env var
/// 3. `~/SickScan/data/`
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    app_data_dir().join("data")
}

/// True for debug builds.
pub fn is_dev() -> bool {
    cfg!(debug_assertions)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if is_dev() {
        "sickscan=debug,sickscan_lib=debug,tower_http=info"
    } else {
        "sickscan=info,sickscan_lib=info,tower_http=warn"
    }
}
