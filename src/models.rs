use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resource type discriminator for accounts.
pub const ACCOUNTS_TYPE: &str = "accounts";

/// A bank account as exchanged with the accounts API.
///
/// Construct one with [`Account::new`] and fill in optional fields directly;
/// the server assigns `version` and echoes the rest on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub organisation_id: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Account {
    /// A new account owned by `organisation_id`. The server generates an id
    /// when none is set.
    pub fn new(organisation_id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: String::new(),
            organisation_id: organisation_id.into(),
            kind: ACCOUNTS_TYPE.to_string(),
            version: None,
            attributes: Some(attributes),
        }
    }

    /// Like [`Account::new`], with a random v4 UUID generated client side.
    pub fn with_generated_id(organisation_id: impl Into<String>, attributes: Attributes) -> Self {
        Self::new(organisation_id, attributes).with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Account attributes. Only `base_currency` and `country` are needed to
/// create an account; the server fills in computed defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_currency: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_matching_opt_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_id_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joint_account: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_identification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
}

impl Attributes {
    pub fn new(base_currency: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            base_currency: base_currency.into(),
            country: country.into(),
            ..Default::default()
        }
    }
}

/// `{ data, links }` wrapper used by single-resource responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

pub type AccountResponse = Envelope<Account>;

/// HATEOAS navigation links. Only `self` is sent for single resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// Acknowledgement of a successful delete (204 No Content).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deleted;
