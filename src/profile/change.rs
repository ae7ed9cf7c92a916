use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Item;

/// One entry of the change list echoed back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "changeType", rename_all = "camelCase")]
pub enum ProfileChange {
    #[serde(rename_all = "camelCase")]
    ItemAdded { item_id: String, item: Item },
    #[serde(rename_all = "camelCase")]
    ItemQuantityChanged { item_id: String, quantity: u64 },
    #[serde(rename_all = "camelCase")]
    ItemAttrChanged {
        item_id: String,
        attribute_name: String,
        attribute_value: Value,
    },
    StatModified { name: String, value: Value },
}

impl ProfileChange {
    pub fn stat(name: &str, value: impl Into<Value>) -> Self {
        ProfileChange::StatModified {
            name: name.to_string(),
            value: value.into(),
        }
    }
}
