use crate::error::{Context, Form3Error, RequestConstructionError, Result};
use crate::response::check_response;
use crate::transport::{HttpResponse, Transport};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::header::{
    ACCEPT, CONTENT_TYPE, DATE, HOST, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};
use reqwest::{Method, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const BASE_URL: &str = "https://api.form3.tech";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Media type used for both `Accept` and `Content-Type`.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

const USER_AGENT_VALUE: &str = concat!("form3api-rs/", env!("CARGO_PKG_VERSION"));

/// The three verbs resource clients are built on.
///
/// [`Client`] is the real implementation; resource clients are generic over
/// this trait so they can be exercised without a network.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// GET `path` and decode the response body into `T`.
    ///
    /// A 204 response yields `T::default()`.
    async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned + Default + Send;

    /// POST `body` as JSON to `path` and decode the response body into `T`.
    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Default + Send;

    /// DELETE `path`; the response body is ignored.
    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<()>;
}

/// Low level client for the Form3 HTTP API.
///
/// Builds requests with the headers the API requires, sends them through the
/// configured [`Transport`] and classifies the responses. Nothing is mutated
/// after construction, so a single instance can be shared between tasks.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    base_url: Url,
    host: HeaderValue,
    headers: HeaderMap,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client for the default base URL with the default transport.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a request for `path` relative to the base URL.
    ///
    /// Nothing is sent; every failure here happens before network I/O.
    pub fn new_request<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Request, RequestConstructionError>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_vec).transpose()?;
        self.build_request(method, path, query, body)
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<Request, RequestConstructionError> {
        // Url::join silently strips tabs and newlines, so reject them here.
        if path.chars().any(char::is_control) {
            return Err(RequestConstructionError::InvalidPath(path.to_string()));
        }
        let mut url = if path.starts_with('/') {
            self.base_url.join(path)?
        } else {
            self.base_url.join(&format!("/{path}"))?
        };
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut request = Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(HOST, self.host.clone());
        headers.insert(DATE, HeaderValue::from_str(&http_date(Utc::now()))?);
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
        }
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }

        *request.body_mut() = body.map(Into::into);
        Ok(request)
    }

    /// Send a request and check its status.
    ///
    /// Statuses outside 200..=204 come back as [`Form3Error::Api`].
    pub async fn execute(&self, request: Request) -> Result<HttpResponse> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!("{} request to {}", method, url);
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| Form3Error::Transport {
                method: method.clone(),
                url: url.clone(),
                source,
            })?;
        debug!("Received status {}", response.status);
        check_response(&method, &url, response)
    }

    /// Send a request and decode a successful response body into `T`.
    pub async fn execute_decoded<T: DeserializeOwned + Default>(&self, request: Request) -> Result<T> {
        self.execute(request).await?.decode()
    }
}

#[async_trait]
impl RestClient for Client {
    async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned + Default + Send,
    {
        let request = self
            .build_request(Method::GET, path, query, None)
            .context("create request")?;
        self.execute_decoded(request).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Default + Send,
    {
        let request = self
            .new_request(Method::POST, path, &[], Some(body))
            .context("create request")?;
        self.execute_decoded(request).await
    }

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
        let request = self
            .build_request(Method::DELETE, path, query, None)
            .context("create request")?;
        self.execute(request).await?;
        Ok(())
    }
}

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
fn http_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Configuration applied once when the [`Client`] is built.
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
    headers: Vec<(String, String)>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            transport: None,
            headers: Vec::new(),
        }
    }
}

impl ClientBuilder {
    /// Override the base URL (useful for tests or proxies).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request timeout for the default transport. Ignored when a custom
    /// transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send requests through `transport` instead of a fresh reqwest client.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Add a header to every request. Replaces any default header with the
    /// same name; a later call for the same name wins.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn build(self) -> Result<Client> {
        let base_url = Url::parse(&self.base_url)?;
        let host = match (base_url.host_str(), base_url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(Form3Error::Config(format!(
                    "base url {base_url} has no host"
                )));
            }
        };
        let host = HeaderValue::from_str(&host)
            .map_err(|e| Form3Error::Config(format!("invalid host {host}: {e}")))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Form3Error::Config(format!("invalid header name {name:?}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| Form3Error::Config(format!("invalid value for header {name}: {e}")))?;
            headers.insert(header_name, header_value);
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(reqwest::Client::builder().timeout(self.timeout).build()?),
        };

        info!("Initialized Form3 API client for {}", base_url);
        Ok(Client {
            transport,
            base_url,
            host,
            headers,
        })
    }
}
