//! LLM provider implementations for the concierge.
//!
//! All providers implement the `concierge_core::Provider` trait. Without an
//! API key no provider is built and the concierge runs in demo mode.

pub mod gemini;

pub use gemini::GeminiProvider;

use concierge_core::Provider;
use std::sync::Arc;

/// Build the configured provider, or `None` when no API key is available.
pub fn build_from_config(config: &concierge_config::AppConfig) -> Option<Arc<dyn Provider>> {
    let api_key = config.api_key.as_deref().filter(|k| !k.trim().is_empty())?;

    let mut provider = GeminiProvider::new(api_key);
    if let Some(url) = &config.api_url {
        provider = provider.with_base_url(url);
    }

    tracing::debug!(model = %config.model, "Gemini provider configured");
    Some(Arc::new(provider))
}
