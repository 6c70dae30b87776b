// DANS : src/monitoring/logging.rs
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Filtre utilisé quand RUST_LOG est absent : nos phases en `info`, le bruit
/// RPC du client Solana limité aux avertissements.
pub const DEFAULT_FILTER: &str = "info,solana_client=warn,solana_rpc_client=warn";

/// Installe le subscriber JSON. Un second appel est ignoré.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(false)
        .with_target(true)
        .try_init();
}
