pub mod clock;
pub mod http_client;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
