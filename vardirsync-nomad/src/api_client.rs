//! HTTP client for the Nomad variables API.
//!
//! Covers the three calls the sync engine needs: prefix listing (with
//! pagination), single-variable reads and writes. Uses reqwest with JSON
//! serialization and sends the ACL token as `X-Nomad-Token`.

use crate::config::NomadConfig;
use crate::error::{NomadError, NomadResult};
use crate::store::VariableStore;
use crate::types::{Variable, VariableMetadata, WriteMode};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

const TOKEN_HEADER: &str = "X-Nomad-Token";
const NEXT_TOKEN_HEADER: &str = "X-Nomad-NextToken";

/// HTTP client for a Nomad agent.
pub struct NomadApiClient {
    client: Client,
    config: NomadConfig,
}

impl NomadApiClient {
    pub fn new(config: NomadConfig) -> NomadResult<Self> {
        if config.address.trim().is_empty() {
            return Err(NomadError::Config("empty Nomad address".to_string()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NomadError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &NomadConfig {
        &self.config
    }

    /// Builds the URL for a single variable, percent-encoding each segment.
    fn var_url(&self, path: &str) -> String {
        let encoded = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/v1/var/{encoded}", self.config.base_url())
    }

    /// Attaches the token and the namespace/region scoping to a request.
    fn scoped(&self, mut req: RequestBuilder) -> RequestBuilder {
        if let Some(ref token) = self.config.token {
            req = req.header(TOKEN_HEADER, token);
        }
        if let Some(ref namespace) = self.config.namespace {
            req = req.query(&[("namespace", namespace)]);
        }
        if let Some(ref region) = self.config.region {
            req = req.query(&[("region", region)]);
        }
        req
    }

    /// Maps non-success statuses shared by every endpoint.
    fn check_status(resp: Response, what: &str) -> NomadResult<Response> {
        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(NomadError::AuthFailed(
                format!("{what}: {}", resp.status()),
            )),
            _ => resp
                .error_for_status()
                .map_err(|e| NomadError::Api(format!("{what}: {e}"))),
        }
    }

    /// Reads the whole body, then decodes it. Transport failures stay
    /// `Http`; a body that is not the expected JSON is `Serialization`.
    async fn decode<T: DeserializeOwned>(resp: Response) -> NomadResult<T> {
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn list_variables(&self, prefix: &str) -> NomadResult<Vec<VariableMetadata>> {
        let url = format!("{}/v1/vars", self.config.base_url());
        let mut out = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut req = self.scoped(self.client.get(&url)).query(&[("prefix", prefix)]);
            if let Some(ref token) = next_token {
                req = req.query(&[("next_token", token)]);
            }

            let resp = Self::check_status(req.send().await?, &format!("list {prefix}"))?;
            next_token = resp
                .headers()
                .get(NEXT_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let page: Option<Vec<VariableMetadata>> = Self::decode(resp).await?;
            let page = page.unwrap_or_default();
            debug!("listed {} variables under {prefix}", page.len());
            out.extend(page);

            if next_token.is_none() {
                break;
            }
        }

        Ok(out)
    }

    pub async fn read_variable(&self, path: &str) -> NomadResult<Variable> {
        let resp = self
            .scoped(self.client.get(self.var_url(path)))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(NomadError::NotFound(path.to_string()));
        }

        let resp = Self::check_status(resp, &format!("read {path}"))?;
        Self::decode(resp).await
    }

    pub async fn put_variable(&self, variable: &Variable, mode: WriteMode) -> NomadResult<()> {
        let mut req = self.scoped(self.client.put(self.var_url(&variable.path)));
        if mode == WriteMode::Create {
            req = req.query(&[("cas", "0")]);
        }

        let resp = req.json(variable).send().await?;

        // 409 = check-and-set lost, something already lives at this path
        if resp.status() == StatusCode::CONFLICT {
            return Err(NomadError::Conflict(variable.path.clone()));
        }

        Self::check_status(resp, &format!("write {}", variable.path))?;
        debug!("wrote variable {} ({} items)", variable.path, variable.items.len());
        Ok(())
    }
}

#[async_trait]
impl VariableStore for NomadApiClient {
    async fn create(&self, variable: &Variable, mode: WriteMode) -> NomadResult<()> {
        self.put_variable(variable, mode).await
    }

    async fn list(&self, prefix: &str) -> NomadResult<Vec<VariableMetadata>> {
        self.list_variables(prefix).await
    }

    async fn read(&self, path: &str) -> NomadResult<Variable> {
        self.read_variable(path).await
    }
}
