use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// Converts items to and from their persisted JSON form
pub trait Transformer<T>: Send + Sync {
    fn serialize(&self, item: &T) -> Result<Value, StoreError>;
    fn deserialize(&self, data: Value) -> Result<T, StoreError>;
}

/// Serde-driven transformer; chrono timestamps become RFC 3339 strings
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTransformer;

impl<T: Serialize + DeserializeOwned> Transformer<T> for JsonTransformer {
    fn serialize(&self, item: &T) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(item)?)
    }

    fn deserialize(&self, data: Value) -> Result<T, StoreError> {
        Ok(serde_json::from_value(data)?)
    }
}
