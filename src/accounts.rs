use crate::client::RestClient;
use crate::error::{Context, Form3Error, Result};
use crate::models::{Account, AccountResponse, Deleted};
use log::{debug, info};
use serde::Serialize;
use url::Url;

const ACCOUNTS_PATH: &str = "/v1/organisation/accounts/";

#[derive(Debug, Serialize)]
struct CreateAccountRequest<'a> {
    data: &'a Account,
}

/// Client for `/v1/organisation/accounts`.
#[derive(Debug, Clone)]
pub struct AccountsClient<C> {
    client: C,
}

impl<C: RestClient> AccountsClient<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Create a bank account.
    pub async fn create(&self, account: &Account) -> Result<AccountResponse> {
        info!(
            "Creating account for organisation {}",
            account.organisation_id
        );
        let request = CreateAccountRequest { data: account };
        self.client
            .post(ACCOUNTS_PATH, &request)
            .await
            .context("create account")
    }

    /// Fetch a single account by id.
    pub async fn fetch(&self, id: &str) -> Result<AccountResponse> {
        let path = account_path(id).context("fetch account")?;
        debug!("Fetching account {}", id);
        self.client.get(&path, &[]).await.context("fetch account")
    }

    /// Delete the account if its current version equals `version`.
    ///
    /// A stale version is rejected by the server with 409 Conflict.
    pub async fn delete(&self, id: &str, version: i64) -> Result<Deleted> {
        let path = account_path(id).context("delete account")?;
        let version = version.to_string();
        info!("Deleting account {} at version {}", id, version);
        self.client
            .delete(&path, &[("version", version.as_str())])
            .await
            .context("delete account")?;
        Ok(Deleted)
    }
}

/// Path of a single account, with `id` percent-encoded as one path segment.
fn account_path(id: &str) -> Result<String> {
    if id.is_empty() {
        return Err(Form3Error::InvalidParameter("account id must not be empty"));
    }
    // Url drops "." and ".." segments on push.
    if id == "." || id == ".." {
        return Err(Form3Error::InvalidParameter("account id must not be a dot segment"));
    }
    // Only the path of this URL is used.
    let mut url = Url::parse("http://localhost")?.join(ACCOUNTS_PATH)?;
    url.path_segments_mut()
        .map_err(|()| Form3Error::InvalidParameter("account path cannot take segments"))?
        .pop_if_empty()
        .push(id);
    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::Attributes;
    use async_trait::async_trait;
    use reqwest::{Method, StatusCode};
    use serde::de::DeserializeOwned;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        verb: &'static str,
        path: String,
        query: Vec<(String, String)>,
        body: Option<Value>,
    }

    /// Records calls and answers every verb with the same canned outcome.
    struct FakeRestClient {
        reply: std::result::Result<Value, StatusCode>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeRestClient {
        fn ok(reply: Value) -> Self {
            Self {
                reply: Ok(reply),
                calls: Mutex::default(),
            }
        }

        fn status(status: StatusCode) -> Self {
            Self {
                reply: Err(status),
                calls: Mutex::default(),
            }
        }

        fn record(&self, verb: &'static str, path: &str, query: &[(&str, &str)], body: Option<Value>) {
            self.calls.lock().unwrap().push(Call {
                verb,
                path: path.to_string(),
                query: query
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body,
            });
        }

        fn respond<T: DeserializeOwned + Default>(&self, method: Method, path: &str) -> Result<T> {
            match &self.reply {
                Ok(value) => Ok(serde_json::from_value(value.clone()).unwrap()),
                Err(status) => {
                    let url = Url::parse("https://api.form3.tech").unwrap().join(path).unwrap();
                    Err(ApiError::new(method, url, *status, None).into())
                }
            }
        }
    }

    #[async_trait]
    impl RestClient for FakeRestClient {
        async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
        where
            T: DeserializeOwned + Default + Send,
        {
            self.record("GET", path, query, None);
            self.respond(Method::GET, path)
        }

        async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
        where
            B: Serialize + Sync + ?Sized,
            T: DeserializeOwned + Default + Send,
        {
            self.record("POST", path, &[], Some(serde_json::to_value(body).unwrap()));
            self.respond(Method::POST, path)
        }

        async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
            self.record("DELETE", path, query, None);
            self.respond::<Option<Value>>(Method::DELETE, path).map(|_| ())
        }
    }

    fn account_envelope() -> Value {
        json!({
            "data": {
                "type": "accounts",
                "id": "A1",
                "version": 0,
                "organisation_id": "O1",
                "attributes": { "country": "FR", "base_currency": "EUR" }
            },
            "links": { "self": "/v1/organisation/accounts/A1" }
        })
    }

    #[tokio::test]
    async fn create_posts_wrapped_account_to_collection() {
        let accounts = AccountsClient::new(FakeRestClient::ok(account_envelope()));
        let account = Account::new("O1", Attributes::new("EUR", "FR")).with_id("A1");

        let response = accounts.create(&account).await.unwrap();
        assert_eq!(response.data.id, "A1");
        assert_eq!(response.data.version, Some(0));

        let calls = accounts.client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].verb, "POST");
        assert_eq!(calls[0].path, "/v1/organisation/accounts/");
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["data"]["organisation_id"], "O1");
        assert_eq!(body["data"]["type"], "accounts");
    }

    #[tokio::test]
    async fn fetch_gets_account_path_without_query() {
        let accounts = AccountsClient::new(FakeRestClient::ok(account_envelope()));

        let response = accounts.fetch("A1").await.unwrap();
        assert_eq!(response.data.organisation_id, "O1");

        let calls = accounts.client.calls.lock().unwrap();
        assert_eq!(calls[0].verb, "GET");
        assert_eq!(calls[0].path, "/v1/organisation/accounts/A1");
        assert!(calls[0].query.is_empty());
    }

    #[tokio::test]
    async fn delete_sends_version_query() {
        let accounts = AccountsClient::new(FakeRestClient::ok(Value::Null));

        let deleted = accounts.delete("A1", 3).await.unwrap();
        assert_eq!(deleted, Deleted);

        let calls = accounts.client.calls.lock().unwrap();
        assert_eq!(calls[0].verb, "DELETE");
        assert_eq!(calls[0].path, "/v1/organisation/accounts/A1");
        assert_eq!(calls[0].query, vec![("version".to_string(), "3".to_string())]);
    }

    #[tokio::test]
    async fn version_conflict_is_a_plain_api_error() {
        let accounts = AccountsClient::new(FakeRestClient::status(StatusCode::CONFLICT));

        let err = accounts.delete("A1", 1).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert!(err.to_string().starts_with("delete account: DELETE"));
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let accounts = AccountsClient::new(FakeRestClient::status(StatusCode::NOT_FOUND));

        let err = accounts.fetch("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn empty_id_fails_before_any_call() {
        let accounts = AccountsClient::new(FakeRestClient::ok(account_envelope()));

        let err = accounts.fetch("").await.unwrap_err();
        assert!(matches!(err.root(), Form3Error::InvalidParameter(_)));
        let err = accounts.delete("", 0).await.unwrap_err();
        assert!(matches!(err.root(), Form3Error::InvalidParameter(_)));
        assert!(accounts.client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn id_is_encoded_as_a_single_path_segment() {
        let accounts = AccountsClient::new(FakeRestClient::ok(account_envelope()));

        accounts.fetch("A1?version=9").await.unwrap();
        accounts.fetch("../x").await.unwrap();
        accounts.delete("a b#c", 0).await.unwrap();

        let calls = accounts.client.calls.lock().unwrap();
        assert_eq!(calls[0].path, "/v1/organisation/accounts/A1%3Fversion=9");
        assert!(calls[0].query.is_empty());
        assert_eq!(calls[1].path, "/v1/organisation/accounts/..%2Fx");
        assert_eq!(calls[2].path, "/v1/organisation/accounts/a%20b%23c");
    }

    #[tokio::test]
    async fn dot_segment_ids_are_rejected() {
        let accounts = AccountsClient::new(FakeRestClient::ok(account_envelope()));

        for id in [".", ".."] {
            let err = accounts.fetch(id).await.unwrap_err();
            assert!(matches!(err.root(), Form3Error::InvalidParameter(_)));
        }
        assert!(accounts.client.calls.lock().unwrap().is_empty());
    }
}
