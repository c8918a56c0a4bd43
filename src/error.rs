use reqwest::header::InvalidHeaderValue;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use url::Url;

pub type Result<T, E = Form3Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Form3Error {
    #[error("invalid request: {0}")]
    Request(#[from] RequestConstructionError),

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: Url,
        #[source]
        source: TransportError,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("decode response body (HTTP status: {}): {source}", .status.as_u16())]
    ResponseDecode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation}: {source}")]
    Context {
        operation: &'static str,
        #[source]
        source: Box<Form3Error>,
    },
}

impl Form3Error {
    /// Innermost error, with every `Context` layer removed.
    pub fn root(&self) -> &Form3Error {
        let mut current = self;
        while let Form3Error::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// The API error carried by this error, if the server rejected the request.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self.root() {
            Form3Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<StatusCode> {
        self.api_error().map(ApiError::status)
    }
}

/// Attach the name of the failing operation to an error.
pub trait Context<T> {
    fn context(self, operation: &'static str) -> Result<T>;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: Into<Form3Error>,
{
    fn context(self, operation: &'static str) -> Result<T> {
        self.map_err(|err| Form3Error::Context {
            operation,
            source: Box::new(err.into()),
        })
    }
}

/// Failures detected while building a request, before anything is sent.
#[derive(Debug, Error)]
pub enum RequestConstructionError {
    #[error("path contains control characters: {0:?}")]
    InvalidPath(String),

    #[error("parse url: {0}")]
    Url(#[from] url::ParseError),

    #[error("encode body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
}

/// Opaque failure reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
#[error("{source}")]
pub struct TransportError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.source
            .downcast_ref::<reqwest::Error>()
            .is_some_and(reqwest::Error::is_timeout)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err)
    }
}

/// Structured error payload returned with 400, 403 and 409 responses.
///
/// The API populates a different subset of fields depending on the status,
/// so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub error_message: Option<String>,
    pub error_code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl ApiErrorBody {
    pub fn message(&self) -> String {
        let mut msg = self.error_message.clone().unwrap_or_default();
        if let Some(code) = &self.error_code {
            msg = format!("{msg}: code: {code}");
        }
        if let Some(error) = &self.error {
            msg = format!("{msg}: error: {error}");
        }
        if let Some(desc) = &self.error_description {
            msg = format!("{msg}: desc: {desc}");
        }
        if msg.is_empty() {
            return "unknown error".to_string();
        }
        msg
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// A response whose status falls outside the API's success range.
#[derive(Debug, Clone)]
pub struct ApiError {
    method: Method,
    url: Url,
    status: StatusCode,
    body: Option<ApiErrorBody>,
}

impl ApiError {
    pub(crate) fn new(
        method: Method,
        url: Url,
        status: StatusCode,
        body: Option<ApiErrorBody>,
    ) -> Self {
        Self {
            method,
            url,
            status,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Decoded error payload; only present for 400, 403 and 409.
    pub fn body(&self) -> Option<&ApiErrorBody> {
        self.body.as_ref()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} returned status {}",
            self.method,
            self.url,
            self.status.as_u16()
        )?;
        if let Some(body) = &self.body {
            write!(f, ": {body}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
