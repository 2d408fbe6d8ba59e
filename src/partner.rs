//! Partner customer web service client
//!
//! This module owns the wire-level representation of the partner's customer
//! payload and the HTTP client that fetches it. The payload is schemaless
//! around the "misc" record groups: flat string-to-string field bags whose
//! keys vary by record type. Interpretation of those bags lives entirely in
//! the normalizer; this module only deserializes them.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Misc group and record tag for loyalty programs
pub const LOYALTY_TYPE: &str = "LOYALTY";
/// Misc group and record tag for rail passes
pub const RAIL_PASS_TYPE: &str = "PASS";

/// Errors that can occur when fetching a customer from the partner system.
///
/// None of these are retried; retries, if desired, belong to the caller.
#[derive(Debug, Error)]
pub enum PartnerError {
    /// Partner responded with an unexpected status
    #[error("unexpected response from partner (status {status}): {description}")]
    Upstream {
        /// HTTP status code returned by the partner
        status: u16,
        /// Response body, passed through verbatim
        description: String,
    },

    /// Network-level failure (connection reset, timeout, DNS, ...)
    #[error("partner request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Partner responded 2xx but the body was not the expected JSON
    #[error("failed to decode partner response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of raw customer representations.
///
/// `Ok(None)` means the partner does not know the customer. Object-safe so
/// the resolver can be exercised against test doubles.
#[async_trait]
pub trait CustomerSource: Send + Sync {
    /// Fetches the raw customer representation for `customer_id`.
    async fn fetch_customer(&self, customer_id: &str) -> Result<Option<RawCustomer>, PartnerError>;
}

/// HTTP client for the partner customer web service.
#[derive(Debug, Clone)]
pub struct PartnerClient {
    client: Client,
    base_url: String,
}

impl PartnerClient {
    /// Creates a new client for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Creates a new client with a custom reqwest client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn customer_url(&self, customer_id: &str) -> String {
        format!("{}/customers/{}", self.base_url.trim_end_matches('/'), customer_id)
    }
}

#[async_trait]
impl CustomerSource for PartnerClient {
    async fn fetch_customer(&self, customer_id: &str) -> Result<Option<RawCustomer>, PartnerError> {
        let url = self.customer_url(customer_id);
        debug!(customer_id, %url, "calling partner GET customer");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(customer_id, "partner reported no such customer");
            return Ok(None);
        }
        if !status.is_success() {
            let description = response.text().await.unwrap_or_default();
            return Err(PartnerError::Upstream {
                status: status.as_u16(),
                description,
            });
        }

        let text = response.text().await?;
        let raw: RawCustomer = serde_json::from_str(&text)?;
        debug!(customer_id, "partner returned customer payload");
        Ok(Some(raw))
    }
}

/// Raw customer representation as returned by the partner.
///
/// Unknown JSON keys are ignored throughout; every substructure is optional
/// except the id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCustomer {
    /// Partner-side customer identifier
    pub id: String,
    /// Identity block, when present
    #[serde(default)]
    pub personal_information: Option<RawPersonalInformation>,
    /// Contact block, when present
    #[serde(default)]
    pub personal_details: Option<RawPersonalDetails>,
    /// Schemaless record groups (loyalty programs, rail passes, ...)
    #[serde(default)]
    pub misc: Vec<RawMisc>,
}

/// Identity fields of the raw customer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPersonalInformation {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// ISO date string; may be absent or malformed
    #[serde(default)]
    pub birthdate: Option<String>,
}

/// Contact fields of the raw customer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPersonalDetails {
    #[serde(default)]
    pub email: Option<RawEmail>,
    #[serde(default)]
    pub cell: Option<RawCell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEmail {
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCell {
    #[serde(default)]
    pub number: Option<String>,
}

/// The partner wraps several scalar values one level deep.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NestedValue {
    #[serde(default)]
    pub value: String,
}

/// A typed group of schemaless records.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMisc {
    /// Group type tag ("LOYALTY", "PASS", or something we ignore)
    #[serde(default, rename = "type")]
    pub group_type: Option<NestedValue>,
    /// Number of records the partner claims to hold for this group
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

/// One schemaless record inside a misc group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    /// Record type tag; must match the group tag to be considered
    #[serde(default, rename = "type")]
    pub record_type: Option<NestedValue>,
    /// Flat key/value field bag
    #[serde(default)]
    pub fields: Vec<RawField>,
}

/// A single key/value pair in a record's field bag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawField {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl RawMisc {
    /// Returns the group type tag, if any.
    pub fn group_tag(&self) -> Option<&str> {
        self.group_type.as_ref().map(|t| t.value.as_str())
    }
}

impl RawRecord {
    /// Returns the record type tag, if any.
    pub fn type_tag(&self) -> Option<&str> {
        self.record_type.as_ref().map(|t| t.value.as_str())
    }

    /// Builds a usable map out of the field bag.
    ///
    /// Entries with a blank key or a blank value are dropped, so presence
    /// of a key in the returned map implies a non-blank value.
    pub fn field_map(&self) -> HashMap<&str, &str> {
        self.fields
            .iter()
            .filter(|f| !f.key.trim().is_empty() && !f.value.trim().is_empty())
            .map(|f| (f.key.as_str(), f.value.as_str()))
            .collect()
    }
}
