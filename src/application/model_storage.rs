// Storage port for the persisted model document

/// A durable key-value slot holding the serialized model.
pub trait ModelStorage: Send + Sync {
    /// Read the document stored under `key`, or `None` if the slot is empty.
    fn read(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Replace the document stored under `key`.
    fn write(&self, key: &str, document: &str) -> anyhow::Result<()>;
}
