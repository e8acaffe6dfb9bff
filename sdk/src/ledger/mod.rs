//! The remote ledger, as seen by the SDK.
//!
//! Object reads, dynamic-field (table) enumeration, owned asset listing and
//! read-only simulated execution. Implementations own transport, retries
//! and timeouts; the SDK adds none of its own.

pub mod memory;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::transaction::TransactionPlan;
use crate::utils::{deserialize_number, serialize_number};

pub use memory::{LedgerSnapshot, MemoryLedger};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ledger transport error: {0}")]
    Transport(String),

    #[error("invalid ledger request: {0}")]
    InvalidRequest(String),
}

/// Key of a dynamic field (`{ "type": ..., "value": ... }`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicFieldName {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: Value,
}

impl DynamicFieldName {
    pub fn address(address: &str) -> Self {
        Self {
            type_tag: "address".to_string(),
            value: Value::String(address.to_string()),
        }
    }

    pub fn object_id(id: &str) -> Self {
        Self {
            type_tag: "0x2::object::ID".to_string(),
            value: Value::String(id.to_string()),
        }
    }

    pub fn type_name(type_tag: &str) -> Self {
        Self {
            type_tag: "0x1::type_name::TypeName".to_string(),
            value: serde_json::json!({ "name": type_tag }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldInfo {
    pub name: DynamicFieldName,
    pub object_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

/// An owned fungible asset record as listed by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedAsset {
    pub coin_type: String,
    pub coin_object_id: String,
    #[serde(
        deserialize_with = "deserialize_number",
        serialize_with = "serialize_number"
    )]
    pub balance: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub parsed_json: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

/// Effects of a simulated (never committed) execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub status: ExecutionStatus,
    pub events: Vec<LedgerEvent>,
}

/// Read access to the ledger.
///
/// Object reads return the object's content fields, `None` when the object
/// does not exist.
pub trait Ledger: Send + Sync + 'static {
    fn fetch_object(
        &self,
        object_id: &str,
    ) -> impl Future<Output = Result<Option<Value>, LedgerError>> + Send;

    fn fetch_dynamic_fields(
        &self,
        parent_id: &str,
        cursor: Option<String>,
    ) -> impl Future<Output = Result<Page<DynamicFieldInfo>, LedgerError>> + Send;

    fn fetch_dynamic_field_by_key(
        &self,
        parent_id: &str,
        key: &DynamicFieldName,
    ) -> impl Future<Output = Result<Option<Value>, LedgerError>> + Send;

    /// One slot per requested id, in request order.
    fn fetch_objects_batch(
        &self,
        object_ids: &[String],
    ) -> impl Future<Output = Result<Vec<Option<Value>>, LedgerError>> + Send;

    fn simulate_transaction(
        &self,
        plan: &TransactionPlan,
        sender: &str,
    ) -> impl Future<Output = Result<SimulationResult, LedgerError>> + Send;

    fn list_owned_assets(
        &self,
        owner: &str,
        asset_type: &str,
        cursor: Option<String>,
        limit: usize,
    ) -> impl Future<Output = Result<Page<OwnedAsset>, LedgerError>> + Send;
}
