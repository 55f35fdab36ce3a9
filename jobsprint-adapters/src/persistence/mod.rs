pub mod in_memory_account_store;
pub mod in_memory_revocation_store;
pub mod postgres_account_store;
pub mod redis_revocation_store;

pub use in_memory_account_store::InMemoryAccountStore;
pub use in_memory_revocation_store::InMemoryRevocationStore;
pub use postgres_account_store::PostgresAccountStore;
pub use redis_revocation_store::RedisRevocationStore;
