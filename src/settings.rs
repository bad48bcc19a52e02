//! # Service Settings
//!
//! YAML configuration for the `serve` and `resolve` commands.
//!
//! ```yaml
//! server:
//!   bind: 0.0.0.0:8080
//! store:
//!   kind: http            # memory | fs | http
//!   base_url: https://objects.example.com/
//!   timeout_ms: 2000
//!   code_bucket: helix-code-bus
//!   content_bucket: helix-content-bus
//! site:                   # optional default site
//!   owner: acme
//!   repo: website
//!   ref: main
//!   partition: live
//! ```
//!
//! A `memory` store takes its objects inline, which is handy for trying out a
//! header rule set without a bucket:
//!
//! ```yaml
//! store:
//!   kind: memory
//!   objects:
//!     - bucket: helix-code-bus
//!       key: acme/website/main/helix-config.json
//!       body: { content: { "/": { contentBusId: bus } } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::loader::{
    Buckets, FsLoader, HttpLoader, LoadOutcome, MemoryLoader, ObjectLoader, CODE_BUS, CONTENT_BUS,
};
use crate::site::SiteIdentity;

/// Default listen address
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
/// Default HTTP store timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    /// Site answered for hosts that do not name one
    #[serde(default)]
    pub site: Option<SiteIdentity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(flatten)]
    pub backend: StoreBackend,
    #[serde(default = "default_code_bucket")]
    pub code_bucket: String,
    #[serde(default = "default_content_bucket")]
    pub content_bucket: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory {
                objects: Vec::new(),
            },
            code_bucket: default_code_bucket(),
            content_bucket: default_content_bucket(),
        }
    }
}

/// Where configuration objects are read from
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreBackend {
    Memory {
        #[serde(default)]
        objects: Vec<SeedObject>,
    },
    Fs {
        root: PathBuf,
    },
    Http {
        base_url: String,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

/// One object of a `memory` store
///
/// A string `body` is stored as-is; any other value is stored as its JSON
/// encoding.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedObject {
    pub bucket: String,
    pub key: String,
    pub body: Value,
}

impl SeedObject {
    fn bytes(&self) -> Vec<u8> {
        match &self.body {
            Value::String(s) => s.clone().into_bytes(),
            other => other.to_string().into_bytes(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_code_bucket() -> String {
    CODE_BUS.to_string()
}

fn default_content_bucket() -> String {
    CONTENT_BUS.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Settings {
    /// Read and parse a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn buckets(&self) -> Buckets {
        Buckets {
            code: self.store.code_bucket.clone(),
            content: self.store.content_bucket.clone(),
        }
    }

    /// Instantiate the configured store
    pub fn build_loader(&self) -> Result<Arc<dyn ObjectLoader>> {
        let loader: Arc<dyn ObjectLoader> = match &self.store.backend {
            StoreBackend::Memory { objects } => {
                let mut loader = MemoryLoader::new();
                for object in objects {
                    loader.insert(&object.bucket, &object.key, LoadOutcome::found(object.bytes()));
                }
                info!(objects = loader.len(), "Using in-memory store");
                Arc::new(loader)
            }
            StoreBackend::Fs { root } => {
                info!(root = %root.display(), "Using filesystem store");
                Arc::new(FsLoader::new(root.clone()))
            }
            StoreBackend::Http {
                base_url,
                timeout_ms,
            } => {
                let loader = HttpLoader::new(base_url)
                    .with_context(|| format!("Invalid store base_url {}", base_url))?
                    .timeout_ms(*timeout_ms);
                info!(base_url = %base_url, timeout_ms, "Using HTTP store");
                Arc::new(loader)
            }
        };
        Ok(loader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings = Settings::from_yaml("{}").unwrap();
        assert_eq!(settings.server.bind, "0.0.0.0:8080");
        assert_eq!(settings.buckets(), Buckets::default());
        assert!(settings.site.is_none());
        assert!(matches!(settings.store.backend, StoreBackend::Memory { .. }));
    }

    #[test]
    fn test_http_store() {
        let settings = Settings::from_yaml(
            "store:\n  kind: http\n  base_url: http://127.0.0.1:9000/\n  content_bucket: content\n",
        )
        .unwrap();
        match &settings.store.backend {
            StoreBackend::Http {
                base_url,
                timeout_ms,
            } => {
                assert_eq!(base_url, "http://127.0.0.1:9000/");
                assert_eq!(*timeout_ms, 5000);
            }
            other => panic!("expected http store, got {:?}", other),
        }
        assert_eq!(settings.buckets().code, "helix-code-bus");
        assert_eq!(settings.buckets().content, "content");
        assert!(settings.build_loader().is_ok());
    }

    #[test]
    fn test_invalid_base_url_fails_to_build() {
        let settings = Settings::from_yaml("store:\n  kind: http\n  base_url: not a url\n").unwrap();
        assert!(settings.build_loader().is_err());
    }

    #[test]
    fn test_memory_objects_and_site() {
        let settings = Settings::from_yaml(
            r#"
store:
  kind: memory
  objects:
    - bucket: helix-code-bus
      key: acme/web/main/helix-config.json
      body: { content: { "/": { contentBusId: bus } } }
    - bucket: helix-content-bus
      key: bus/live/metadata.json
      body: '{"data":[]}'
site:
  owner: acme
  repo: web
  ref: main
"#,
        )
        .unwrap();
        let loader = settings.build_loader().unwrap();
        assert_eq!(
            loader.load("helix-content-bus", "bus/live/metadata.json"),
            LoadOutcome::found(r#"{"data":[]}"#)
        );
        match loader.load("helix-code-bus", "acme/web/main/helix-config.json") {
            LoadOutcome::Found(body) => {
                let v: Value = serde_json::from_slice(&body).unwrap();
                assert_eq!(v["content"]["/"]["contentBusId"], "bus");
            }
            other => panic!("expected object, got {:?}", other),
        }
        assert_eq!(
            settings.site,
            Some(SiteIdentity::new("acme", "web", "main", "live"))
        );
    }

    #[test]
    fn test_unknown_store_kind() {
        assert!(Settings::from_yaml("store:\n  kind: s3\n").is_err());
    }
}
