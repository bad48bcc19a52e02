use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::loader::{Buckets, LoadOutcome, ObjectLoader};
use crate::rules::{HeaderRule, RuleSet};

/// Site config tiers, in lookup order: (key suffix, name shown to clients)
const SITE_CONFIG_TIERS: [(&str, &str); 2] = [
    (".helix/config-all.json", "/.helix/config-all.json"),
    ("metadata.json", "/metadata.json"),
];

/// Decoded site configuration ("config-all")
///
/// `Default` is the empty configuration used when no tier exists: no header
/// rules and no challenge key material.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteConfig {
    /// Header rules in declaration order
    pub header_rules: Vec<RuleSet>,
    /// `domainkey`, normalised to a list
    pub domainkey: Vec<String>,
    /// `slack`, normalised to a list
    pub slack: Vec<String>,
    /// `cdn.prod.host`
    pub prod_host: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProjectSection {
    #[serde(default)]
    domainkey: Option<OneOrMany>,
    #[serde(default)]
    slack: Option<OneOrMany>,
    #[serde(default)]
    cdn: Option<CdnSection>,
}

#[derive(Debug, Default, Deserialize)]
struct CdnSection {
    #[serde(default)]
    prod: Option<ProdSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ProdSection {
    #[serde(default)]
    host: Option<String>,
}

impl SiteConfig {
    /// Decode a site config document
    ///
    /// `name` is the tier name used in the error message.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Parse`] if `body` is not JSON. Valid JSON of an
    /// unexpected shape decodes to whatever parts are recognisable.
    pub fn from_json(body: &[u8], name: &str) -> PipelineResult<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| PipelineError::Parse {
            key: name.to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self::from_value(&value))
    }

    /// Decode an already parsed document
    ///
    /// Understands the sectioned layout (`headers.data`, `config.data`) and
    /// the flattened one (`data`, `domainkey`, `slack`, `cdn` at the top).
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let header_rules = value
            .get("headers")
            .and_then(|h| h.get("data"))
            .filter(|d| d.is_object())
            .or_else(|| value.get("data").filter(|d| d.is_object()))
            .map(decode_header_rules)
            .unwrap_or_default();

        let project = value
            .get("config")
            .and_then(|c| c.get("data"))
            .filter(|d| d.is_object())
            .unwrap_or(value);
        let project: ProjectSection = if project.is_object() {
            serde_json::from_value(project.clone()).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring malformed project section");
                ProjectSection::default()
            })
        } else {
            ProjectSection::default()
        };

        Self {
            header_rules,
            domainkey: project.domainkey.map(OneOrMany::into_vec).unwrap_or_default(),
            slack: project.slack.map(OneOrMany::into_vec).unwrap_or_default(),
            prod_host: project.cdn.and_then(|c| c.prod).and_then(|p| p.host),
        }
    }
}

fn decode_header_rules(data: &Value) -> Vec<RuleSet> {
    let Some(map) = data.as_object() else {
        return Vec::new();
    };
    map.iter()
        .map(|(pattern, rules)| {
            let rules = rules
                .as_array()
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| {
                            let rule = serde_json::from_value::<HeaderRule>(entry.clone()).ok();
                            if rule.is_none() {
                                warn!(pattern = %pattern, entry = %entry, "Skipping malformed header rule");
                            }
                            rule
                        })
                        .collect()
                })
                .unwrap_or_default();
            RuleSet::new(pattern, rules)
        })
        .collect()
}

/// Load the site config from the content bus
///
/// Tries `.helix/config-all.json`, then the legacy `metadata.json`; the first
/// tier found wins. `Ok(None)` means neither exists, which is not an error.
///
/// # Errors
///
/// - [`PipelineError::Parse`] if the found tier is not JSON
/// - [`PipelineError::Upstream`] if the store fails; later tiers are not tried
pub fn load_site_config(
    loader: &dyn ObjectLoader,
    buckets: &Buckets,
    content_bus_id: &str,
    partition: &str,
) -> PipelineResult<Option<SiteConfig>> {
    for (suffix, name) in SITE_CONFIG_TIERS {
        let key = format!("{}/{}/{}", content_bus_id, partition, suffix);
        debug!(bucket = %buckets.content, key = %key, "Loading site config");

        match loader.load(&buckets.content, &key) {
            LoadOutcome::Found(body) => return SiteConfig::from_json(&body, name).map(Some),
            LoadOutcome::NotFound => continue,
            LoadOutcome::Failed(cause) => {
                error!(bucket = %buckets.content, key = %key, error = %cause, "Site config load failed");
                return Err(PipelineError::Upstream {
                    key: name.to_string(),
                    cause,
                });
            }
        }
    }
    debug!(content_bus_id, partition, "No site config, continuing without header rules");
    Ok(None)
}
