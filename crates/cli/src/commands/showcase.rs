use std::path::PathBuf;

use serde::Serialize;
use storefront_core::currency::load_preference;
use storefront_core::showcase::{new_arrivals, top_deals, NEW_ARRIVALS_LIMIT};
use storefront_core::{ApplicationError, ExchangeRates};

use crate::commands::{load_config, open_state, read_catalog, CommandResult, ProductView};

const COMMAND: &str = "showcase";

#[derive(Debug, Serialize)]
struct ShowcaseData<'a> {
    top_deals: Vec<ProductView<'a>>,
    new_arrivals: Vec<ProductView<'a>>,
}

pub fn run(catalog: PathBuf) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let products = match read_catalog(&catalog) {
        Ok(products) => products,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let currency = match open_state(&config)
        .and_then(|store| {
            load_preference(&store, config.currency.display).map_err(ApplicationError::from)
        })
    {
        Ok(currency) => currency,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let rates = ExchangeRates::fallback();
    let view = |product| ProductView::new(product, &rates, currency);
    let data = ShowcaseData {
        top_deals: top_deals(&products).into_iter().map(view).collect(),
        new_arrivals: new_arrivals(&products, NEW_ARRIVALS_LIMIT).into_iter().map(view).collect(),
    };

    let message =
        format!("{} top deals, {} new arrivals", data.top_deals.len(), data.new_arrivals.len());
    CommandResult::success_with_data(COMMAND, message, data)
}
