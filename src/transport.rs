//! The single capability the client needs from an HTTP stack: send one
//! request, get one fully buffered response back.

use crate::error::TransportError;
use async_trait::async_trait;
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Request, StatusCode};

/// Sends a prepared request.
///
/// Implemented for [`reqwest::Client`]; substitute another implementation to
/// run the client against a test double.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<HttpResponse, TransportError>;
}

/// A response with its body already read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn send(&self, request: Request) -> Result<HttpResponse, TransportError> {
        let response = self.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map(|b| b.to_vec())?;
        debug!("Read {} byte response body", body.len());
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
