use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;
use storefront_core::catalog::{BrowseSession, CategorySelector, PriceRange, SortKey};
use storefront_core::currency::{load_preference, save_preference};
use storefront_core::config::AppConfig;
use storefront_core::{ApplicationError, Currency, ExchangeRates};

use crate::commands::{
    load_config, open_state, read_catalog, CommandResult, ProductView, EXIT_INPUT,
};

const COMMAND: &str = "browse";

#[derive(Clone, Debug, Default)]
pub struct BrowseArgs {
    pub catalog: PathBuf,
    pub term: Option<String>,
    pub category: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub sort: Option<String>,
    pub currency: Option<String>,
    pub rates: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BrowseData<'a> {
    term: &'a str,
    category: String,
    sort: SortKey,
    price: PriceRange,
    bounds: PriceRange,
    currency: Currency,
    count: usize,
    products: Vec<ProductView<'a>>,
}

pub fn run(args: BrowseArgs) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let products = match read_catalog(&args.catalog) {
        Ok(products) => products,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let rates = match load_rates(args.rates.as_deref()) {
        Ok(rates) => rates,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "rates_unavailable",
                format!("{error:#}"),
                EXIT_INPUT,
            );
        }
    };

    let currency = match resolve_currency(&config, args.currency.as_deref()) {
        Ok(currency) => currency,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let mut session = BrowseSession::new(&products);
    if let Some(term) = &args.term {
        session.set_term(term.as_str());
    }
    if let Some(category) = &args.category {
        match category.parse::<CategorySelector>() {
            Ok(selector) => session.select_category(&products, selector),
            Err(error) => return rejected(error.into()),
        }
    }
    if args.min.is_some() || args.max.is_some() {
        let bounds = session.bounds();
        let min = match parse_bound("min", args.min.as_deref(), bounds.min) {
            Ok(min) => min,
            Err(failure) => return failure,
        };
        let max = match parse_bound("max", args.max.as_deref(), bounds.max) {
            Ok(max) => max,
            Err(failure) => return failure,
        };
        session.set_price_range(PriceRange::new(min, max));
    }
    if let Some(sort) = &args.sort {
        match sort.parse::<SortKey>() {
            Ok(sort) => session.set_sort(sort),
            Err(error) => return rejected(error.into()),
        }
    }

    let visible = session.visible(&products);
    let spec = session.spec();
    let data = BrowseData {
        term: &spec.term,
        category: spec.category.to_string(),
        sort: spec.sort,
        price: spec.price,
        bounds: session.bounds(),
        currency,
        count: visible.len(),
        products: visible
            .iter()
            .map(|product| ProductView::new(product, &rates, currency))
            .collect(),
    };

    let message = if session.is_empty_result(&products) {
        "no products match the current filters".to_string()
    } else {
        format!("{} products", visible.len())
    };
    CommandResult::success_with_data(COMMAND, message, data)
}

fn rejected(error: ApplicationError) -> CommandResult {
    CommandResult::from_error(COMMAND, &error)
}

/// Display currency from the flag, else the stored preference, else config.
/// An explicit choice is remembered for later runs.
fn resolve_currency(
    config: &AppConfig,
    requested: Option<&str>,
) -> Result<Currency, ApplicationError> {
    let mut store = open_state(config)?;
    match requested {
        Some(code) => {
            let currency: Currency = code.parse()?;
            save_preference(&mut store, currency)?;
            Ok(currency)
        }
        None => Ok(load_preference(&store, config.currency.display)?),
    }
}

fn parse_bound(name: &str, raw: Option<&str>, fallback: Decimal) -> Result<Decimal, CommandResult> {
    let Some(raw) = raw else {
        return Ok(fallback);
    };
    raw.trim().parse::<Decimal>().map_err(|error| {
        CommandResult::failure(
            COMMAND,
            "bad_request",
            format!("--{name} must be a decimal amount, got `{raw}`: {error}"),
            EXIT_INPUT,
        )
    })
}

/// Exchange rates from a provider response saved to disk, or the built-in
/// table when no file is given. An unreadable payload falls back as well.
fn load_rates(path: Option<&Path>) -> anyhow::Result<ExchangeRates> {
    let Some(path) = path else {
        return Ok(ExchangeRates::fallback());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading exchange rates from `{}`", path.display()))?;
    Ok(ExchangeRates::from_provider_json_or_fallback(&raw))
}
