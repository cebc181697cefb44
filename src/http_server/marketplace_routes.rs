//! Marketplace HTTP Routes
//!
//! Vendor, customer, product, cart and order endpoints. Every route runs its
//! validation adapters before the handler; handlers receive sanitized data
//! only. Persistence and authentication live outside this service, so the
//! handlers acknowledge the validated request.

use axum::{
    extract::Json,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::Serialize;
use serde_json::Value;

use super::middleware::{
    validate_body, validate_params, validate_query, RequestSchema, ValidatedParams, ValidatedQuery,
};
use crate::schema::{
    Record, SchemaRegistry, SchemaResult, CART_ITEM, CART_UPDATE, CUSTOMER_LOGIN, CUSTOMER_REGISTER,
    ID_PARAM, ORDER_CREATE, ORDER_STATUS_UPDATE, PRODUCT_CREATE, PRODUCT_QUERY, PRODUCT_UPDATE,
    VENDOR_LOGIN, VENDOR_PROFILE_UPDATE, VENDOR_REGISTER,
};

/// Fields never echoed back to clients
const SECRET_FIELDS: [&str; 1] = ["password"];

/// Builds the marketplace router.
///
/// Fails if a route names a schema missing from the registry.
pub fn marketplace_routes(registry: &SchemaRegistry, body_limit: usize) -> SchemaResult<Router> {
    let schema = |name: &str| RequestSchema::from_registry(registry, name, body_limit);

    let router = Router::new()
        // Vendors
        .route(
            "/vendors/login",
            post(vendor_login).route_layer(from_fn_with_state(schema(VENDOR_LOGIN)?, validate_body)),
        )
        .route(
            "/vendors/register",
            post(vendor_register)
                .route_layer(from_fn_with_state(schema(VENDOR_REGISTER)?, validate_body)),
        )
        .route(
            "/vendors/profile",
            put(update_vendor_profile)
                .route_layer(from_fn_with_state(schema(VENDOR_PROFILE_UPDATE)?, validate_body)),
        )
        .route(
            "/vendors/products",
            post(create_product).route_layer(from_fn_with_state(schema(PRODUCT_CREATE)?, validate_body)),
        )
        .route(
            "/vendors/products/:id",
            put(update_product)
                .route_layer(from_fn_with_state(schema(PRODUCT_UPDATE)?, validate_body))
                .route_layer(from_fn_with_state(schema(ID_PARAM)?, validate_params))
                .merge(
                    delete(delete_product)
                        .route_layer(from_fn_with_state(schema(ID_PARAM)?, validate_params)),
                ),
        )
        .route(
            "/vendors/orders/:id/status",
            put(update_order_status)
                .route_layer(from_fn_with_state(schema(ORDER_STATUS_UPDATE)?, validate_body))
                .route_layer(from_fn_with_state(schema(ID_PARAM)?, validate_params)),
        )
        // Customers
        .route(
            "/customers/login",
            post(customer_login).route_layer(from_fn_with_state(schema(CUSTOMER_LOGIN)?, validate_body)),
        )
        .route(
            "/customers/register",
            post(customer_register)
                .route_layer(from_fn_with_state(schema(CUSTOMER_REGISTER)?, validate_body)),
        )
        // Catalog
        .route(
            "/products",
            get(list_products).route_layer(from_fn_with_state(schema(PRODUCT_QUERY)?, validate_query)),
        )
        .route(
            "/products/:id",
            get(get_product).route_layer(from_fn_with_state(schema(ID_PARAM)?, validate_params)),
        )
        // Cart and checkout
        .route(
            "/cart",
            post(add_cart_item).route_layer(from_fn_with_state(schema(CART_ITEM)?, validate_body)),
        )
        .route(
            "/cart/:id",
            put(update_cart_item)
                .route_layer(from_fn_with_state(schema(CART_UPDATE)?, validate_body))
                .route_layer(from_fn_with_state(schema(ID_PARAM)?, validate_params)),
        )
        .route(
            "/orders",
            post(create_order).route_layer(from_fn_with_state(schema(ORDER_CREATE)?, validate_body)),
        );

    Ok(router)
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct Accepted {
    pub success: bool,
    pub data: Value,
}

impl Accepted {
    fn new(data: Value) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

fn public(mut record: Record) -> Value {
    for field in SECRET_FIELDS {
        record.remove(field);
    }
    Value::Object(record)
}

/// Merges path parameters and body into one acknowledgement record.
fn with_params(params: Record, body: Record) -> Value {
    let mut merged = params;
    merged.extend(body);
    Value::Object(merged)
}

// ==================
// Handlers
// ==================

async fn vendor_login(Json(body): Json<Record>) -> Json<Accepted> {
    Accepted::new(public(body))
}

async fn vendor_register(Json(body): Json<Record>) -> (StatusCode, Json<Accepted>) {
    (StatusCode::CREATED, Accepted::new(public(body)))
}

async fn update_vendor_profile(Json(body): Json<Record>) -> Json<Accepted> {
    Accepted::new(Value::Object(body))
}

async fn create_product(Json(body): Json<Record>) -> (StatusCode, Json<Accepted>) {
    (StatusCode::CREATED, Accepted::new(Value::Object(body)))
}

async fn update_product(
    Extension(ValidatedParams(params)): Extension<ValidatedParams>,
    Json(body): Json<Record>,
) -> Json<Accepted> {
    Accepted::new(with_params(params, body))
}

async fn delete_product(Extension(ValidatedParams(params)): Extension<ValidatedParams>) -> Json<Accepted> {
    Accepted::new(Value::Object(params))
}

async fn update_order_status(
    Extension(ValidatedParams(params)): Extension<ValidatedParams>,
    Json(body): Json<Record>,
) -> Json<Accepted> {
    Accepted::new(with_params(params, body))
}

async fn customer_login(Json(body): Json<Record>) -> Json<Accepted> {
    Accepted::new(public(body))
}

async fn customer_register(Json(body): Json<Record>) -> (StatusCode, Json<Accepted>) {
    (StatusCode::CREATED, Accepted::new(public(body)))
}

async fn list_products(Extension(ValidatedQuery(query)): Extension<ValidatedQuery>) -> Json<Accepted> {
    Accepted::new(Value::Object(query))
}

async fn get_product(Extension(ValidatedParams(params)): Extension<ValidatedParams>) -> Json<Accepted> {
    Accepted::new(Value::Object(params))
}

async fn add_cart_item(Json(body): Json<Record>) -> (StatusCode, Json<Accepted>) {
    (StatusCode::CREATED, Accepted::new(Value::Object(body)))
}

async fn update_cart_item(
    Extension(ValidatedParams(params)): Extension<ValidatedParams>,
    Json(body): Json<Record>,
) -> Json<Accepted> {
    Accepted::new(with_params(params, body))
}

async fn create_order(Json(body): Json<Record>) -> (StatusCode, Json<Accepted>) {
    (StatusCode::CREATED, Accepted::new(Value::Object(body)))
}
