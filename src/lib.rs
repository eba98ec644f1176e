pub mod api; // HTTP surface
pub mod cli; // Interactive terminal loop
pub mod config;
pub mod inference; // Presence vectors, classifier, ranking
pub mod knowledge; // Symptom synonyms + condition profiles
pub mod nlp; // Segmentation, negation, fuzzy matching
pub mod session;
pub mod training;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Logs go to stderr so the interactive loop owns stdout.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}
