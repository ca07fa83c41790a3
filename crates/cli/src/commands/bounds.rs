use std::path::PathBuf;

use serde::Serialize;
use storefront_core::catalog::{category_price_bounds, CategorySelector, PriceRange};
use storefront_core::{ApplicationError, Category};

use crate::commands::{load_config, read_catalog, CommandResult};

const COMMAND: &str = "bounds";

#[derive(Clone, Debug, Default)]
pub struct BoundsArgs {
    pub catalog: PathBuf,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
struct CategoryBounds {
    category: String,
    product_count: usize,
    bounds: PriceRange,
}

pub fn run(args: BoundsArgs) -> CommandResult {
    if let Err(failure) = load_config(COMMAND) {
        return failure;
    }

    let products = match read_catalog(&args.catalog) {
        Ok(products) => products,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let selectors = match args.category.as_deref() {
        Some(raw) => match raw.parse::<CategorySelector>() {
            Ok(selector) => vec![selector],
            Err(error) => {
                return CommandResult::from_error(COMMAND, &ApplicationError::from(error));
            }
        },
        None => std::iter::once(CategorySelector::All)
            .chain(Category::ALL.into_iter().map(CategorySelector::Only))
            .collect(),
    };

    let rows: Vec<CategoryBounds> = selectors
        .into_iter()
        .map(|selector| CategoryBounds {
            category: selector.to_string(),
            product_count: products
                .iter()
                .filter(|product| selector.matches(product.category))
                .count(),
            bounds: category_price_bounds(&products, selector),
        })
        .collect();

    CommandResult::success_with_data(COMMAND, format!("{} price ranges", rows.len()), rows)
}
