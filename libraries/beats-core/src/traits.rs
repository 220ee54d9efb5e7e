/// Core traits for Beats
use crate::error::Result;

/// Durable local key-value storage
///
/// Values are opaque strings (callers store serialized JSON). A `set` must be
/// durable before it returns so that a reload immediately after a mutation
/// observes it.
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`
    ///
    /// Returns `Ok(None)` when nothing has been stored yet
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key` (no-op if absent)
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
