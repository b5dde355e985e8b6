//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_directory_repository;
mod postgres_directory_repository;
mod tracing_event_sink;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_directory_repository::InMemoryDirectoryRepository;
pub use postgres_directory_repository::PostgresDirectoryRepository;
pub use tracing_event_sink::TracingEventSink;
