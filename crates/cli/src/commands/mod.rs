pub mod bounds;
pub mod browse;
pub mod compare;
pub mod config;
pub mod lint;
pub mod recent;
pub mod showcase;
pub mod suggest;

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use storefront_core::config::{AppConfig, LoadOptions};
use storefront_core::{parse_catalog, ApplicationError, DomainError, ExchangeRates, Product};
use storefront_core::{Currency, JsonFileStore};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, Value::Null)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: impl Serialize,
    ) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), EXIT_INPUT)
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with_data(command, error_class, message, exit_code, None)
    }

    pub fn failure_with_data(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Maps an application error onto the stable failure payload.
    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        let exit_code = match error {
            ApplicationError::Configuration(_) => EXIT_CONFIG,
            _ => EXIT_INPUT,
        };
        Self::failure(command, error.error_class(), error.to_string(), exit_code)
    }
}

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INPUT: u8 = 3;

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\",\"data\":null}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })
}

pub(crate) fn read_catalog(path: &Path) -> Result<Vec<Product>, ApplicationError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        DomainError::MalformedCatalog(format!("cannot read `{}`: {error}", path.display()))
    })?;
    Ok(parse_catalog(&raw)?)
}

pub(crate) fn open_state(config: &AppConfig) -> Result<JsonFileStore, ApplicationError> {
    Ok(JsonFileStore::open(&config.storage.path)?)
}

/// Product row shared by every listing command.
#[derive(Debug, Serialize)]
pub(crate) struct ProductView<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    price: rust_decimal::Decimal,
    display_price: String,
    rating: f64,
    review_count: u32,
    is_top_deal: bool,
}

impl<'a> ProductView<'a> {
    pub(crate) fn new(product: &'a Product, rates: &ExchangeRates, currency: Currency) -> Self {
        Self {
            id: &product.id.0,
            name: &product.name,
            category: product.category.as_str(),
            price: product.price,
            display_price: rates.format_price(product.price, currency),
            rating: product.rating,
            review_count: product.review_count(),
            is_top_deal: product.is_top_deal,
        }
    }
}
