//! marketconnect - request validation service for the MarketConnect marketplace
//!
//! - `schema`: declarative schemas, the recursive validator, schema files and
//!   the registry of marketplace schemas
//! - `http_server`: axum server with body/query/path validation middleware
//! - `cli`: `serve`, `validate` and `schemas` commands

pub mod cli;
pub mod http_server;
pub mod schema;
