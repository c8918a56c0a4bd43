use crate::error::{ApiError, ApiErrorBody, Form3Error, Result};
use crate::transport::HttpResponse;
use log::debug;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// The API only reports 200 through 204 as success; 205 and above are errors.
pub fn is_success(status: StatusCode) -> bool {
    (200..=204).contains(&status.as_u16())
}

/// Statuses documented to carry a JSON error body.
fn has_error_body(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::FORBIDDEN | StatusCode::CONFLICT
    )
}

/// Pass successful responses through, turn everything else into an [`ApiError`].
pub(crate) fn check_response(
    method: &Method,
    url: &Url,
    response: HttpResponse,
) -> Result<HttpResponse> {
    let status = response.status;
    if is_success(status) {
        return Ok(response);
    }

    let body = if has_error_body(status) {
        let body: ApiErrorBody =
            serde_json::from_slice(&response.body).map_err(|source| {
                Form3Error::ResponseDecode { status, source }
            })?;
        Some(body)
    } else {
        None
    };
    debug!("{} {} rejected with status {}", method, url, status);
    Err(ApiError::new(method.clone(), url.clone(), status, body).into())
}

impl HttpResponse {
    /// Decode the body into `T`.
    ///
    /// A 204 carries no body; its body is never read and `T::default()` is
    /// returned.
    pub fn decode<T: DeserializeOwned + Default>(&self) -> Result<T> {
        if self.status == StatusCode::NO_CONTENT {
            return Ok(T::default());
        }
        serde_json::from_slice(&self.body).map_err(|source| Form3Error::ResponseDecode {
            status: self.status,
            source,
        })
    }
}
