use std::path::PathBuf;

use serde::Serialize;
use storefront_core::catalog::find;
use storefront_core::currency::load_preference;
use storefront_core::{ApplicationError, ExchangeRates, ProductId, RecentlyViewed};

use crate::commands::{
    load_config, open_state, read_catalog, CommandResult, ProductView, EXIT_INPUT,
};

const COMMAND: &str = "recent";

#[derive(Clone, Debug, Default)]
pub struct RecentArgs {
    pub catalog: Option<PathBuf>,
    pub add: Option<String>,
    pub clear: bool,
}

#[derive(Debug, Serialize)]
struct RecentData<'a> {
    count: usize,
    products: Vec<ProductView<'a>>,
}

pub fn run(args: RecentArgs) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let result = (|| -> Result<CommandResult, ApplicationError> {
        let store = open_state(&config)?;
        let currency = load_preference(&store, config.currency.display)?;
        let mut history = RecentlyViewed::load(store)?;

        if args.clear {
            history.clear()?;
        }

        if let Some(raw_id) = &args.add {
            let Some(catalog) = &args.catalog else {
                return Ok(CommandResult::failure(
                    COMMAND,
                    "bad_request",
                    "--add needs --catalog to look the product up",
                    EXIT_INPUT,
                ));
            };
            let products = read_catalog(catalog)?;
            let product = find(&products, &ProductId(raw_id.clone()))?;
            history.add(product)?;
        }

        let rates = ExchangeRates::fallback();
        let data = RecentData {
            count: history.products().len(),
            products: history
                .products()
                .iter()
                .map(|product| ProductView::new(product, &rates, currency))
                .collect(),
        };
        let message = format!("{} recently viewed products", data.count);
        Ok(CommandResult::success_with_data(COMMAND, message, data))
    })();

    result.unwrap_or_else(|error| CommandResult::from_error(COMMAND, &error))
}
