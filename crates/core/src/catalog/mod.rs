//! Catalog query engine: filtering, ordering, price bounds and autocomplete
//! suggestions over an in-memory product list.
//!
//! Every function here is pure. Callers own the product list and the query
//! state and pass them in by reference.

pub mod browse;
pub mod engine;
pub mod feed;
pub mod query;
pub mod suggest;

pub use browse::BrowseSession;
pub use engine::{category_price_bounds, compute_price_bounds, filter, run, sort};
pub use feed::CatalogFeed;
pub use query::{CategorySelector, PriceRange, QuerySpec, SortKey, SuggestionPolicy};
pub use suggest::{highlight_match, suggest, suggest_with, Highlighted, Segment, Suggestion};

use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;

pub fn find<'a>(
    products: &'a [Product],
    product_id: &ProductId,
) -> Result<&'a Product, DomainError> {
    products
        .iter()
        .find(|product| &product.id == product_id)
        .ok_or_else(|| DomainError::UnknownProduct(product_id.clone()))
}
