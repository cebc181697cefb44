//! Named schemas for the marketplace endpoints
//!
//! The registry is built once at startup and handed to route registration.
//! It is immutable afterwards; schemas are shared through `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::errors::{SchemaError, SchemaResult};
use super::loader::SchemaLoader;
use super::types::{FieldKind, FieldRule, NumberRule, Schema, StringRule};

pub const VENDOR_LOGIN: &str = "vendorLogin";
pub const VENDOR_REGISTER: &str = "vendorRegister";
pub const VENDOR_PROFILE_UPDATE: &str = "vendorProfileUpdate";
pub const CUSTOMER_LOGIN: &str = "customerLogin";
pub const CUSTOMER_REGISTER: &str = "customerRegister";
pub const PRODUCT_CREATE: &str = "productCreate";
pub const PRODUCT_UPDATE: &str = "productUpdate";
pub const PRODUCT_QUERY: &str = "productQuery";
pub const ID_PARAM: &str = "idParam";
pub const CART_ITEM: &str = "cartItem";
pub const CART_UPDATE: &str = "cartUpdate";
pub const ORDER_CREATE: &str = "orderCreate";
pub const ORDER_STATUS_UPDATE: &str = "orderStatusUpdate";

/// Order lifecycle states accepted by `orderStatusUpdate`
pub const ORDER_STATUSES: [&str; 5] = ["pending", "processing", "shipped", "delivered", "cancelled"];

const PHONE_PATTERN: &str = r"^[0-9+\-\s()]{7,20}$";

/// Immutable map from schema name to schema
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry of marketplace schemas.
    pub fn builtin() -> SchemaResult<Self> {
        let mut registry = Self::new();

        registry.insert(VENDOR_LOGIN, vendor_login())?;
        registry.insert(VENDOR_REGISTER, vendor_register()?)?;
        registry.insert(VENDOR_PROFILE_UPDATE, vendor_profile_update()?)?;
        registry.insert(CUSTOMER_LOGIN, customer_login())?;
        registry.insert(CUSTOMER_REGISTER, customer_register()?)?;
        registry.insert(PRODUCT_CREATE, product_fields(true))?;
        registry.insert(PRODUCT_UPDATE, product_fields(false))?;
        registry.insert(PRODUCT_QUERY, product_query())?;
        registry.insert(ID_PARAM, id_param())?;
        registry.insert(CART_ITEM, cart_item())?;
        registry.insert(CART_UPDATE, cart_update())?;
        registry.insert(ORDER_CREATE, order_create())?;
        registry.insert(ORDER_STATUS_UPDATE, order_status_update())?;

        Ok(registry)
    }

    /// Adds a schema. Names are unique.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) -> SchemaResult<()> {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::duplicate(name));
        }
        self.schemas.insert(name, Arc::new(schema));
        Ok(())
    }

    /// Adds every schema from the loader, replacing registered schemas of the
    /// same name.
    pub fn merge_loaded(&mut self, loader: SchemaLoader) {
        for (name, schema) in loader.into_schemas() {
            let replaced = self.schemas.insert(name.clone(), Arc::new(schema)).is_some();
            info!(schema = %name, replaced, "schema registered from file");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    /// Looks up a schema, failing with MC_SCHEMA_UNKNOWN if absent.
    pub fn require(&self, name: &str) -> SchemaResult<Arc<Schema>> {
        self.get(name).ok_or_else(|| SchemaError::unknown_schema(name))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn phone() -> SchemaResult<StringRule> {
    StringRule::new().pattern(PHONE_PATTERN)
}

fn vendor_login() -> Schema {
    Schema::new()
        .field("username", FieldRule::required_string())
        .field("password", FieldRule::required_string())
}

fn vendor_register() -> SchemaResult<Schema> {
    Ok(Schema::new()
        .field(
            "username",
            FieldRule::required(StringRule::new().min_length(3).max_length(50)),
        )
        .field("password", FieldRule::required(StringRule::new().min_length(6)))
        .field("email", FieldRule::required(StringRule::new().email()))
        .field("full_name", FieldRule::required_string())
        .field("business_name", FieldRule::required_string())
        .field("business_address", FieldRule::required_string())
        .field("phone", FieldRule::required(phone()?))
        .field("business_type", FieldRule::required_string())
        .field("tax_id", FieldRule::required_string()))
}

fn vendor_profile_update() -> SchemaResult<Schema> {
    Ok(Schema::new()
        .field("full_name", FieldRule::optional_string())
        .field("business_name", FieldRule::optional_string())
        .field("business_address", FieldRule::optional_string())
        .field("phone", FieldRule::optional(phone()?))
        .field("business_type", FieldRule::optional_string()))
}

fn customer_login() -> Schema {
    Schema::new()
        .field("email", FieldRule::required(StringRule::new().email()))
        .field("password", FieldRule::required_string())
}

fn customer_register() -> SchemaResult<Schema> {
    Ok(Schema::new()
        .field(
            "name",
            FieldRule::required(StringRule::new().min_length(2).max_length(100)),
        )
        .field("email", FieldRule::required(StringRule::new().email()))
        .field("password", FieldRule::required(StringRule::new().min_length(6)))
        .field("phone", FieldRule::optional(phone()?))
        .field("address", FieldRule::optional_string()))
}

/// productCreate when `required`, productUpdate otherwise
fn product_fields(required: bool) -> Schema {
    let rule = |kind: FieldKind| {
        if required {
            FieldRule::required(kind)
        } else {
            FieldRule::optional(kind)
        }
    };

    Schema::new()
        .field("name", rule(StringRule::new().max_length(255).into()))
        .field("description", FieldRule::optional_string())
        .field("price", rule(NumberRule::new().min(0.0).into()))
        .field("stock_quantity", rule(NumberRule::new().min(0.0).into()))
        .field("category", rule(StringRule::new().into()))
        .field("image_url", FieldRule::optional_string())
        .field("is_featured", FieldRule::optional_boolean())
        .field("is_active", FieldRule::optional_boolean())
}

fn product_query() -> Schema {
    Schema::new()
        .field("page", FieldRule::optional(NumberRule::new().min(1.0)))
        .field("limit", FieldRule::optional(NumberRule::new().min(1.0).max(100.0)))
        .field("category", FieldRule::optional_string())
        .field("search", FieldRule::optional(StringRule::new().max_length(100)))
        .field("vendor_id", FieldRule::optional(NumberRule::new().min(1.0)))
}

fn id_param() -> Schema {
    Schema::new().field("id", FieldRule::required(NumberRule::new().min(1.0)))
}

fn cart_item() -> Schema {
    Schema::new()
        .field("product_id", FieldRule::required(NumberRule::new().min(1.0)))
        .field("quantity", FieldRule::required(NumberRule::new().min(1.0)))
}

fn cart_update() -> Schema {
    Schema::new().field("quantity", FieldRule::required(NumberRule::new().min(1.0)))
}

fn order_create() -> Schema {
    Schema::new()
        .field("shipping_address", FieldRule::required_string())
        .field("payment_method", FieldRule::required_string())
        .field("order_type", FieldRule::optional_string())
}

fn order_status_update() -> Schema {
    Schema::new().field(
        "status",
        FieldRule::required_string().with_validator(|value, _| {
            let status = value.as_str()?;
            (!ORDER_STATUSES.contains(&status))
                .then(|| format!("status must be one of: {}", ORDER_STATUSES.join(", ")))
        }),
    )
}
