//! Rust client for the Form3 accounts REST API.
//! Builds requests with the headers the API expects, sends them through a
//! pluggable transport and turns error responses into typed errors callers
//! can branch on.

pub mod accounts;
pub mod client;
pub mod error;
pub mod form3;
pub mod models;
pub mod response;
pub mod transport;

pub use accounts::AccountsClient;
pub use client::{Client, ClientBuilder, MEDIA_TYPE, RestClient};
pub use error::{
    ApiError, ApiErrorBody, Context, Form3Error, RequestConstructionError, Result, TransportError,
};
pub use form3::Form3;
pub use models::{Account, AccountResponse, Attributes, Deleted, Envelope, Links};
pub use transport::{HttpResponse, Transport};
