pub mod in_memory_response_cache;
pub mod in_memory_transaction_repository;
pub mod postgres_transaction_repository;

pub use in_memory_response_cache::InMemoryResponseCache;
pub use in_memory_transaction_repository::InMemoryTransactionRepository;
pub use postgres_transaction_repository::PostgresTransactionRepository;
