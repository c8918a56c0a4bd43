//! Shared fixtures and mock server helpers for the integration tests.

use form3api::{Client, Form3};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts/";

pub const BAD_REQUEST_ERROR: &str = r#"{
  "error_message": "validation failure list:\nvalidation failure list:\norganisation_id in body must be of type uuid: \"invalid-org-id\"",
  "error_code": "d0a17902-63ed-4cb6-a8e8-fac5ca31b0b7"
}"#;

pub const FORBIDDEN_ERROR: &str = r#"{
  "error": "invalid_grant",
  "error_description": "Wrong email or password."
}"#;

pub const CONFLICT_ERROR: &str = r#"{
  "error_message": "invalid version",
  "error_code": "4bc0fa5d-231e-43f3-af79-8fc371d95a31"
}"#;

/// Start a mock server and a facade pointed at it.
pub async fn setup() -> (MockServer, Form3) {
    let server = MockServer::start().await;
    let client = Client::builder()
        .base_url(server.uri())
        .build()
        .expect("client should build");
    (server, Form3::from_client(client))
}

/// Account response with every field the API can return.
pub fn account_response_all_fields(id: &str, org_id: &str, country: &str, currency: &str) -> Value {
    json!({
        "data": {
            "type": "accounts",
            "id": id,
            "version": 0,
            "organisation_id": org_id,
            "attributes": {
                "country": country,
                "base_currency": currency,
                "bank_id": "20041",
                "bank_id_code": country,
                "account_number": "0500013M026",
                "customer_id": "999",
                "iban": format!("{country}1420041010050500013M02606"),
                "bic": "NWBKFR42",
                "account_classification": "Personal",
                "joint_account": false,
                "account_matching_opt_out": false,
                "switched": false,
                "status": "confirmed",
                "name": ["eur-fr-bank-acc"]
            }
        },
        "links": {
            "self": format!("{ACCOUNTS_PATH}{id}"),
            "first": "/v1/organisation/accounts?page[number]=first",
            "last": "/v1/organisation/accounts?page[number]=last",
            "next": "/v1/organisation/accounts?page[number]=next",
            "prev": "/v1/organisation/accounts?page[number]=prev"
        }
    })
}

/// Account response with only the fields the API always returns.
pub fn account_response_min_fields(id: &str, org_id: &str, country: &str, currency: &str) -> Value {
    json!({
        "data": {
            "type": "accounts",
            "id": id,
            "version": 0,
            "organisation_id": org_id,
            "attributes": {
                "country": country,
                "base_currency": currency,
                "account_classification": "Personal",
                "joint_account": false,
                "account_matching_opt_out": false,
                "switched": false,
                "status": "confirmed"
            }
        },
        "links": {
            "self": format!("{ACCOUNTS_PATH}{id}")
        }
    })
}
