use crate::accounts::AccountsClient;
use crate::client::{Client, RestClient};
use crate::error::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Single entry point combining the low level [`Client`] with the resource
/// clients built on top of it.
#[derive(Debug, Clone)]
pub struct Form3 {
    client: Client,
    accounts: AccountsClient<Client>,
}

impl Form3 {
    /// Connect to the default base URL with the default transport.
    pub fn new() -> Result<Self> {
        Client::new().map(Self::from_client).context("create client")
    }

    /// Wrap a configured client, e.g. one built with a custom base URL or
    /// transport.
    pub fn from_client(client: Client) -> Self {
        Self {
            accounts: AccountsClient::new(client.clone()),
            client,
        }
    }

    pub fn accounts(&self) -> &AccountsClient<Client> {
        &self.accounts
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl RestClient for Form3 {
    async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned + Default + Send,
    {
        self.client.get(path, query).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Default + Send,
    {
        self.client.post(path, body).await
    }

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
        self.client.delete(path, query).await
    }
}
