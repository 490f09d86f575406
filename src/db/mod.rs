//! Database module: schema, row models and the two stores.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and write payloads
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: pool construction and schema bootstrap
//! - `users.rs`: credential store
//! - `companies.rs`: per-user company record store

pub mod companies;
pub mod models;
pub mod schema;
pub mod sqlite;
pub mod users;

pub use companies::CompanyStore;
pub use models::{CompanyFields, CompanyRecord, User};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, connect, connect_in_memory, init_schema};
pub use users::UserStore;
