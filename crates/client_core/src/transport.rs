use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    header::CONTENT_DISPOSITION,
    multipart::{Form, Part},
    Client, StatusCode,
};
use shared::{constants::file_name, error::ServiceErrorBody, protocol::part};
use tracing::{info, warn};

use crate::{error::TransportError, request::ProjectionRequest};

pub const PROJECTION_PATH: &str = "/api/v8/projection/hcsv";

/// Binary archive returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveResponse {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// No identity configured: requests go out unauthenticated.
pub struct MissingTokenProvider;

#[async_trait]
impl TokenProvider for MissingTokenProvider {
    async fn bearer_token(&self) -> Option<String> {
        None
    }
}

pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

#[async_trait]
pub trait ProjectionTransport: Send + Sync {
    async fn submit(
        &self,
        request: &ProjectionRequest,
        trial_run: bool,
    ) -> Result<ArchiveResponse, TransportError>;
}

pub struct HttpProjectionTransport {
    http: Client,
    service_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpProjectionTransport {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self::with_token_provider(service_url, Arc::new(MissingTokenProvider))
    }

    pub fn with_token_provider(
        service_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            http: Client::new(),
            service_url: service_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{PROJECTION_PATH}", self.service_url)
    }

    fn form(request: &ProjectionRequest) -> Result<Form, TransportError> {
        let parameters = request
            .parameters_json()
            .map_err(|err| TransportError::Configuration(err.to_string()))?;
        let parameters = Part::bytes(parameters)
            .mime_str("application/json")
            .map_err(|err| TransportError::Configuration(err.to_string()))?;
        let polygon = Part::bytes(request.polygon.file.clone())
            .file_name(request.polygon.name.clone())
            .mime_str(&request.polygon.mime_type)
            .map_err(|err| TransportError::Configuration(err.to_string()))?;
        let layer = Part::bytes(request.layer.file.clone())
            .file_name(request.layer.name.clone())
            .mime_str(&request.layer.mime_type)
            .map_err(|err| TransportError::Configuration(err.to_string()))?;
        Ok(Form::new()
            .part(part::PROJECTION_PARAMETERS, parameters)
            .part(part::HCSV_POLYGON, polygon)
            .part(part::HCSV_LAYERS, layer))
    }
}

fn classify_send_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::Configuration(err.to_string())
    } else {
        TransportError::NoResponse(err.to_string())
    }
}

/// File name carried by a `Content-Disposition` header, if any.
pub fn file_name_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|param| {
            let (key, raw) = param.split_once('=')?;
            if !key.trim().eq_ignore_ascii_case("filename") {
                return None;
            }
            archive_file_name(raw.trim().trim_matches('"'))
        })
}

/// Last path component of a service-supplied name, or `None` when nothing
/// usable remains. Directory parts and `..` never survive.
pub fn archive_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next()?.trim();
    match name {
        "" | "." | ".." => None,
        _ if name.contains(':') => None,
        _ => Some(name.to_string()),
    }
}

#[async_trait]
impl ProjectionTransport for HttpProjectionTransport {
    async fn submit(
        &self,
        request: &ProjectionRequest,
        trial_run: bool,
    ) -> Result<ArchiveResponse, TransportError> {
        let mut builder = self
            .http
            .post(self.endpoint())
            .query(&[(part::TRIAL_RUN, trial_run)])
            .multipart(Self::form(request)?);
        if let Some(token) = self.tokens.bearer_token().await {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(classify_send_error)?;
        let status = response.status();

        if status == StatusCode::OK || status == StatusCode::CREATED {
            let file_name = response
                .headers()
                .get(CONTENT_DISPOSITION)
                .and_then(|value| value.to_str().ok())
                .and_then(file_name_from_disposition)
                .unwrap_or_else(|| file_name::DEFAULT_ARCHIVE.to_string());
            let bytes = response
                .bytes()
                .await
                .map_err(|err| TransportError::Processing(err.to_string()))?;
            info!(status = status.as_u16(), bytes = bytes.len(), file = %file_name, "projection archive received");
            return Ok(ArchiveResponse {
                bytes: bytes.to_vec(),
                file_name,
            });
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "projection request failed");
        if status == StatusCode::BAD_REQUEST {
            return Err(TransportError::Rejected(ServiceErrorBody::from_body(&body)));
        }
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
