use std::io;

use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use tracing::{debug, warn};

use super::request::parse_request;
use super::response::{write_json, write_preflight_response};
use crate::error::PipelineError;
use crate::pipeline::{OptionsPipe, PreflightRequest, PreflightResponse};
use crate::site::{SiteIdentity, DEFAULT_PARTITION};

/// `may_minihttp` service answering preflight requests
///
/// Cloned per connection; all clones share the loader behind the pipe.
#[derive(Clone)]
pub struct PreflightService {
    pipe: OptionsPipe,
    default_site: Option<SiteIdentity>,
    partition: String,
}

impl PreflightService {
    pub fn new(pipe: OptionsPipe) -> Self {
        Self {
            pipe,
            default_site: None,
            partition: DEFAULT_PARTITION.to_string(),
        }
    }

    /// Site used when the host name does not identify one
    #[must_use]
    pub fn with_default_site(mut self, site: Option<SiteIdentity>) -> Self {
        if let Some(site) = &site {
            self.partition = site.partition.clone();
        }
        self.default_site = site;
        self
    }

    /// Resolve the site a request targets
    ///
    /// `x-forwarded-host` wins over `host`. Host names of the form
    /// `{ref}--{repo}--{owner}.{suffix}` name the site directly; anything
    /// else falls back to the default site.
    pub fn resolve_site(&self, req: &PreflightRequest) -> Option<SiteIdentity> {
        req.get_header("x-forwarded-host")
            .into_iter()
            .chain(req.get_header("host"))
            .find_map(|host| SiteIdentity::from_host(host, &self.partition))
            .or_else(|| self.default_site.clone())
    }

    /// Answer a parsed request (everything except `/health`)
    pub fn handle(&self, req: &PreflightRequest) -> PreflightResponse {
        match self.resolve_site(req) {
            Some(site) => self.pipe.respond(&site, req),
            None => {
                warn!(request_id = %req.request_id, path = %req.path, "Unable to determine site");
                PreflightResponse::from_error(&PipelineError::UnknownSite)
            }
        }
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    write_json(res, 200, &json!({ "status": "ok" }));
    Ok(())
}

impl HttpService for PreflightService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        if req.method() == "GET" && req.path() == "/health" {
            return health_endpoint(res);
        }

        let Some(parsed) = parse_request(&req) else {
            debug!(method = %req.method(), "Invalid method token");
            write_preflight_response(
                res,
                &PreflightResponse::from_error(&PipelineError::MethodNotAllowed),
            );
            return Ok(());
        };
        write_preflight_response(res, &self.handle(&parsed));
        Ok(())
    }
}
