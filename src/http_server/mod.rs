//! # MarketConnect HTTP Server Module
//!
//! Axum server exposing the marketplace API with schema validation on every
//! route.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/vendors/*` - Vendor login, registration, profile, products, order status
//! - `/api/customers/*` - Customer login and registration
//! - `/api/products*` - Catalog listing and lookup
//! - `/api/cart*`, `/api/orders` - Cart and checkout

pub mod config;
pub mod errors;
pub mod marketplace_routes;
pub mod middleware;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ErrorResponse, HttpError, HttpResult};
pub use middleware::{
    validate_body, validate_params, validate_query, RequestSchema, ValidatedParams, ValidatedQuery,
};
pub use server::HttpServer;
