//! HTTP registry client.
//!
//! JSON over REST framing:
//! - `GET    /v1/graphs/{graph}/variants/{variant}/subgraphs/{name}`
//! - `PUT    /v1/graphs/{graph}/variants/{variant}/subgraphs/{name}`
//! - `DELETE /v1/graphs/{graph}/variants/{variant}/subgraphs/{name}`
//! - `POST   /v1/graphs/{graph}/variants/{variant}/subgraphs/{name}/validate`
//! - `GET    /v1/graphs/{graph}/variants/{variant}/build`
//!
//! Status mapping: 401/403 become `Unauthorized`, 404 becomes `NotFound`
//! (or `Ok(None)` for reads), other 4xx become `Operation` with the body's
//! `{code, message}`, 5xx and transport failures become `Transport`.
//!
//! Every request carries a fresh `x-request-id` so failures can be
//! correlated with registry-side logs.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use weft_core::config::{validate_config, GraphRef, RegistryConfig};
use weft_core::model::{
    BuildStatus, SchemaError, SubgraphDescriptor, SubgraphRecord, SubgraphSpec, SubmitOutcome,
    ValidationOutcome,
};
use weft_core::{WeftError, WeftResult};

use crate::client::RegistryClient;
use crate::error::{RegistryError, RegistryResult};

/// Registry client speaking the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    http: reqwest::Client,
    base: Url,
}

impl HttpRegistryClient {
    /// Build a client from a validated configuration.
    pub fn new(config: &RegistryConfig) -> WeftResult<Self> {
        validate_config(config)?;

        let base = Url::parse(&config.endpoint)
            .map_err(|e| WeftError::invalid_argument(format!("invalid endpoint: {e}")))?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| WeftError::invalid_argument("api_key contains invalid characters"))?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| WeftError::invalid_argument(format!("failed to build http client: {e}")))?;

        Ok(Self { http, base })
    }

    fn url(&self, segments: &[&str]) -> RegistryResult<Url> {
        let mut u = self.base.clone();
        u.path_segments_mut()
            .map_err(|_| RegistryError::operation("BAD_ENDPOINT", "endpoint cannot be a base URL"))?
            .extend(segments);
        Ok(u)
    }

    fn subgraph_url(&self, d: &SubgraphDescriptor) -> RegistryResult<Url> {
        self.url(&[
            "v1",
            "graphs",
            d.graph.as_str(),
            "variants",
            d.variant.as_str(),
            "subgraphs",
            d.name.as_str(),
        ])
    }

    fn validate_url(&self, d: &SubgraphDescriptor) -> RegistryResult<Url> {
        let mut u = self.subgraph_url(d)?;
        u.path_segments_mut()
            .map_err(|_| RegistryError::operation("BAD_ENDPOINT", "endpoint cannot be a base URL"))?
            .push("validate");
        Ok(u)
    }

    fn build_url(&self, graph_ref: &GraphRef) -> RegistryResult<Url> {
        self.url(&[
            "v1",
            "graphs",
            graph_ref.graph.as_str(),
            "variants",
            graph_ref.variant.as_str(),
            "build",
        ])
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> RegistryResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        debug!(%request_id, "sending registry request");
        req.header("x-request-id", request_id.as_str())
            .send()
            .await
            .map_err(|e| RegistryError::transport(e.to_string()))
    }
}

/// Map a non-success response to a typed error, consuming the body.
async fn fail(resp: Response, subject: &str) -> RegistryError {
    let status = resp.status();
    let body = resp.json::<ErrorBody>().await.unwrap_or_default();
    let message = body
        .message
        .unwrap_or_else(|| format!("registry returned status {status}"));

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return RegistryError::unauthorized(message);
    }
    if status == StatusCode::NOT_FOUND {
        return RegistryError::not_found(subject);
    }
    if status.is_server_error() {
        return RegistryError::server(status.as_u16(), message);
    }
    RegistryError::operation(
        body.code.unwrap_or_else(|| "REGISTRY_ERROR".to_string()),
        message,
    )
}

fn malformed(e: reqwest::Error) -> RegistryError {
    RegistryError::operation("MALFORMED_RESPONSE", e.to_string())
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn read(
        &self,
        descriptor: &SubgraphDescriptor,
    ) -> RegistryResult<Option<SubgraphRecord>> {
        let url = self.subgraph_url(descriptor)?;
        let resp = self.send(self.http.get(url)).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(fail(resp, &descriptor.name).await);
        }

        let body: RecordBody = resp.json().await.map_err(malformed)?;
        Ok(Some(body.into_record(descriptor.clone())))
    }

    async fn submit(&self, spec: &SubgraphSpec) -> RegistryResult<SubmitOutcome> {
        let url = self.subgraph_url(&spec.descriptor)?;
        let req = self.http.put(url).json(&SubmitRequest {
            sdl: &spec.sdl,
            routing_url: spec.routing_url.as_deref(),
        });
        let resp = self.send(req).await?;

        if !resp.status().is_success() {
            return Err(fail(resp, &spec.descriptor.name).await);
        }

        let body: SubmitBody = resp.json().await.map_err(malformed)?;
        Ok(SubmitOutcome {
            was_created: body.was_created,
            composition_hash: body.composition_hash,
            errors: body.errors,
        })
    }

    async fn remove(&self, descriptor: &SubgraphDescriptor) -> RegistryResult<()> {
        let url = self.subgraph_url(descriptor)?;
        let resp = self.send(self.http.delete(url)).await?;

        if !resp.status().is_success() {
            return Err(fail(resp, &descriptor.name).await);
        }
        Ok(())
    }

    async fn validate(
        &self,
        descriptor: &SubgraphDescriptor,
        sdl: &str,
    ) -> RegistryResult<ValidationOutcome> {
        let url = self.validate_url(descriptor)?;
        let req = self.http.post(url).json(&ValidateRequest { sdl });
        let resp = self.send(req).await?;

        if !resp.status().is_success() {
            return Err(fail(resp, &descriptor.name).await);
        }

        let body: ValidateBody = resp.json().await.map_err(malformed)?;
        Ok(ValidationOutcome {
            valid: body.valid,
            errors: body.errors,
            changes: body.changes,
        })
    }

    async fn latest_build(&self, graph_ref: &GraphRef) -> RegistryResult<BuildStatus> {
        let url = self.build_url(graph_ref)?;
        let resp = self.send(self.http.get(url)).await?;

        if !resp.status().is_success() {
            return Err(fail(resp, &graph_ref.to_string()).await);
        }

        let body: BuildBody = resp.json().await.map_err(malformed)?;
        Ok(BuildStatus {
            healthy: body.healthy,
            errors: body.errors,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    sdl: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    routing_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    sdl: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordBody {
    sdl: String,
    #[serde(default)]
    routing_url: Option<String>,
    revision: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl RecordBody {
    fn into_record(self, descriptor: SubgraphDescriptor) -> SubgraphRecord {
        SubgraphRecord {
            descriptor,
            sdl: self.sdl,
            routing_url: self.routing_url,
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBody {
    was_created: bool,
    composition_hash: String,
    #[serde(default)]
    errors: Vec<SchemaError>,
}

#[derive(Debug, Deserialize)]
struct ValidateBody {
    valid: bool,
    #[serde(default)]
    errors: Vec<SchemaError>,
    #[serde(default)]
    changes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BuildBody {
    healthy: bool,
    #[serde(default)]
    errors: Vec<SchemaError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::config::GraphRef;

    fn client() -> HttpRegistryClient {
        let cfg = RegistryConfig::new(
            "https://registry.example.com",
            "service:key",
            GraphRef::parse("shop@production").unwrap(),
        );
        HttpRegistryClient::new(&cfg).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = RegistryConfig::new("", "key", GraphRef::parse("shop@production").unwrap());
        assert!(HttpRegistryClient::new(&cfg).is_err());
    }

    #[test]
    fn subgraph_url_shape() {
        let c = client();
        let d = SubgraphDescriptor::new("shop", "production", "inventory");
        let u = c.subgraph_url(&d).unwrap();
        assert_eq!(
            u.as_str(),
            "https://registry.example.com/v1/graphs/shop/variants/production/subgraphs/inventory"
        );
    }

    #[test]
    fn subgraph_url_escapes_segments() {
        let c = client();
        let d = SubgraphDescriptor::new("shop", "production", "a/b");
        let u = c.subgraph_url(&d).unwrap();
        // A slash inside a name must not introduce an extra path segment.
        assert!(u.path().ends_with("/subgraphs/a%2Fb"));
    }

    #[test]
    fn build_url_shape() {
        let c = client();
        let r = GraphRef::parse("shop@production").unwrap();
        let u = c.build_url(&r).unwrap();
        assert_eq!(
            u.as_str(),
            "https://registry.example.com/v1/graphs/shop/variants/production/build"
        );
    }
}
