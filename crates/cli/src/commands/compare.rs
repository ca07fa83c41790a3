use std::path::PathBuf;

use serde::Serialize;
use storefront_core::catalog::find;
use storefront_core::currency::load_preference;
use storefront_core::{ApplicationError, ComparisonList, ExchangeRates, ProductId};

use crate::commands::{load_config, open_state, read_catalog, CommandResult, ProductView};

const COMMAND: &str = "compare";

#[derive(Clone, Debug, Default)]
pub struct CompareArgs {
    pub catalog: PathBuf,
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ComparedProduct<'a> {
    #[serde(flatten)]
    summary: ProductView<'a>,
    features: &'a [String],
    pros: &'a [String],
    cons: &'a [String],
}

pub fn run(args: CompareArgs) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let products = match read_catalog(&args.catalog) {
        Ok(products) => products,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let result = (|| -> Result<CommandResult, ApplicationError> {
        let store = open_state(&config)?;
        let currency = load_preference(&store, config.currency.display)?;

        let mut tray = ComparisonList::default();
        for raw_id in &args.ids {
            let product = find(&products, &ProductId(raw_id.trim().to_string()))?;
            tray.add(product)?;
        }

        let rates = ExchangeRates::fallback();
        let compared: Vec<ComparedProduct<'_>> = tray
            .products()
            .iter()
            .map(|product| ComparedProduct {
                summary: ProductView::new(product, &rates, currency),
                features: &product.features,
                pros: &product.pros,
                cons: &product.cons,
            })
            .collect();

        let message = format!("comparing {} products", compared.len());
        Ok(CommandResult::success_with_data(COMMAND, message, compared))
    })();

    result.unwrap_or_else(|error| CommandResult::from_error(COMMAND, &error))
}
