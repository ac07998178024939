/// Key/value backends holding the serialized archive.
pub mod archive_store;
/// Persisted model definitions.
pub mod models;
/// Storage error types shared by every backend.
pub mod storage;
