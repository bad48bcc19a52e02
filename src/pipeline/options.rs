use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, info_span, warn};

use super::{PreflightRequest, PreflightResponse};
use crate::challenge::{challenge_header_value, CHALLENGE_HEADER, CHALLENGE_PATH};
use crate::config::{load_code_config, load_site_config, SiteConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::loader::{Buckets, ObjectLoader};
use crate::rules::{match_rules, merge_headers};
use crate::site::SiteIdentity;

/// Seconds a browser may cache a preflight answer
pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// Answers CORS preflight requests for any site served by one store
///
/// Holds no per-request state; clone it freely (the loader is shared).
#[derive(Clone)]
pub struct OptionsPipe {
    loader: Arc<dyn ObjectLoader>,
    buckets: Buckets,
}

impl OptionsPipe {
    pub fn new(loader: Arc<dyn ObjectLoader>, buckets: Buckets) -> Self {
        Self { loader, buckets }
    }

    /// Produce the response for one request
    ///
    /// Never fails: every [`PipelineError`] becomes a response carrying
    /// `x-error`. Identical inputs against an unchanged store give identical
    /// responses.
    pub fn respond(&self, site: &SiteIdentity, req: &PreflightRequest) -> PreflightResponse {
        let span = info_span!(
            "preflight",
            request_id = %req.request_id,
            owner = %site.owner,
            repo = %site.repo,
            git_ref = %site.git_ref,
            partition = %site.partition,
            path = %req.path,
        );
        let _guard = span.enter();
        let start = Instant::now();

        let res = match self.resolve(site, req) {
            Ok(res) => res,
            Err(err) => {
                warn!(status = err.status(), error = %err, "Preflight failed");
                PreflightResponse::from_error(&err)
            }
        };
        info!(
            status = res.status,
            latency_us = start.elapsed().as_micros() as u64,
            "Preflight answered"
        );
        res
    }

    fn resolve(&self, site: &SiteIdentity, req: &PreflightRequest) -> PipelineResult<PreflightResponse> {
        if !req.is_preflight() {
            return Err(PipelineError::MethodNotAllowed);
        }

        let code = load_code_config(self.loader.as_ref(), &self.buckets, site)?;
        let config = load_site_config(
            self.loader.as_ref(),
            &self.buckets,
            &code.content_bus_id,
            &site.partition,
        )?
        .unwrap_or_default();

        let mut res = PreflightResponse::no_content();
        if let Some(requested) = req.get_header("access-control-request-headers") {
            res.set_header("access-control-allow-headers", requested.to_string());
        }
        res.set_header("access-control-max-age", PREFLIGHT_MAX_AGE.to_string());

        if req.path == CHALLENGE_PATH {
            apply_challenge(&mut res, &config, req.get_header("x-forwarded-host"));
        } else {
            let matched = match_rules(&config, &req.path);
            debug!(rules = matched.len(), "Matched header rules");
            for (name, value) in merge_headers(matched) {
                res.set_header(&name, value);
            }
        }
        Ok(res)
    }
}

fn apply_challenge(res: &mut PreflightResponse, config: &SiteConfig, forwarded_host: Option<&str>) {
    if let Some(value) = challenge_header_value(config, forwarded_host) {
        res.set_header(CHALLENGE_HEADER, value);
    }
}
