use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::loader::{Buckets, LoadOutcome, ObjectLoader};
use crate::site::SiteIdentity;

/// Key shown to clients when the code config fails to load
const CODE_CONFIG_NAME: &str = "/helix-config.json";

/// Decoded `helix-config.json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeConfig {
    /// Content bus namespace of the site
    pub content_bus_id: String,
}

impl CodeConfig {
    /// Decode a code config document
    ///
    /// Accepts the published layout `{"content": {"/": {"contentBusId": ..}}}`
    /// as well as the flattened `{"/": {"contentBusId": ..}}`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Parse`] if `body` is not JSON
    /// - [`PipelineError::Validation`] if no non-empty `contentBusId` is present
    pub fn from_json(body: &[u8]) -> PipelineResult<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| PipelineError::Parse {
            key: CODE_CONFIG_NAME.to_string(),
            cause: e.to_string(),
        })?;

        let root_entry = value
            .get("content")
            .and_then(|content| content.get("/"))
            .or_else(|| value.get("/"));

        match root_entry
            .and_then(|entry| entry.get("contentBusId"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
        {
            Some(id) => Ok(Self {
                content_bus_id: id.to_string(),
            }),
            None => Err(PipelineError::Validation("contentBusId missing".to_string())),
        }
    }
}

/// Load and decode the code config of `site`
///
/// # Errors
///
/// - [`PipelineError::NotFound`] if the store has no such object
/// - [`PipelineError::Internal`] with the store's message if the store fails
/// - any error of [`CodeConfig::from_json`]
pub fn load_code_config(
    loader: &dyn ObjectLoader,
    buckets: &Buckets,
    site: &SiteIdentity,
) -> PipelineResult<CodeConfig> {
    let key = site.code_config_key();
    debug!(bucket = %buckets.code, key = %key, "Loading code config");

    match loader.load(&buckets.code, &key) {
        LoadOutcome::Found(body) => {
            let config = CodeConfig::from_json(&body);
            if let Err(e) = &config {
                warn!(key = %key, error = %e, "Invalid code config");
            }
            config
        }
        LoadOutcome::NotFound => {
            warn!(bucket = %buckets.code, key = %key, "Code config not found");
            Err(PipelineError::NotFound {
                key: CODE_CONFIG_NAME.to_string(),
            })
        }
        LoadOutcome::Failed(cause) => {
            error!(bucket = %buckets.code, key = %key, error = %cause, "Code config load failed");
            Err(PipelineError::Internal(cause))
        }
    }
}
