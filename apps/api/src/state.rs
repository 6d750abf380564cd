use crate::config::Config;
use crate::generation::generator::DocumentGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; cloning only bumps the provider's `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Generation client. Holds `ProviderHandle::Unconfigured` when no API key was set.
    pub generator: DocumentGenerator,
    pub config: Config,
}
