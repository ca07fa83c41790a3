use tracing::debug;

use crate::catalog::engine::{category_price_bounds, run};
use crate::catalog::query::{CategorySelector, PriceRange, QuerySpec, SortKey};
use crate::domain::product::Product;

/// Query state owned by a product listing view.
///
/// The product list itself is not stored: every call that needs it borrows
/// whatever list the caller currently holds, which may be empty while a fetch
/// is in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowseSession {
    spec: QuerySpec,
    bounds: PriceRange,
}

impl BrowseSession {
    pub fn new(products: &[Product]) -> Self {
        let bounds = category_price_bounds(products, CategorySelector::All);
        Self { spec: QuerySpec { price: bounds, ..QuerySpec::default() }, bounds }
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Price bounds of the currently selected category.
    pub fn bounds(&self) -> PriceRange {
        self.bounds
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.spec.term = term.into();
        debug!(event_name = "browse.term_changed", term = %self.spec.term, "search term updated");
    }

    /// Switches category, recomputing bounds for it and resetting the price
    /// selection to those bounds.
    pub fn select_category(&mut self, products: &[Product], category: CategorySelector) {
        self.spec.category = category;
        self.reset_price_bounds(products);
        debug!(
            event_name = "browse.category_selected",
            category = %category,
            min = %self.bounds.min,
            max = %self.bounds.max,
            "category changed; price selection reset"
        );
    }

    /// Applies a price selection, narrowed to the current bounds.
    pub fn set_price_range(&mut self, range: PriceRange) -> PriceRange {
        self.spec.price = range.clamp_to(self.bounds);
        debug!(
            event_name = "browse.price_range_changed",
            min = %self.spec.price.min,
            max = %self.spec.price.max,
            "price selection updated"
        );
        self.spec.price
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.spec.sort = sort;
        debug!(event_name = "browse.sort_changed", sort = %sort, "sort key updated");
    }

    /// A fresh product list arrived; bounds are rebuilt for the current
    /// category.
    pub fn catalog_loaded(&mut self, products: &[Product]) {
        self.reset_price_bounds(products);
        debug!(
            event_name = "browse.catalog_loaded",
            product_count = products.len(),
            "catalog snapshot applied to browse session"
        );
    }

    pub fn visible<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        run(products, &self.spec)
    }

    /// True when the current query hides every product, which a listing
    /// shows as its empty state.
    pub fn is_empty_result(&self, products: &[Product]) -> bool {
        self.visible(products).is_empty()
    }

    fn reset_price_bounds(&mut self, products: &[Product]) {
        self.bounds = category_price_bounds(products, self.spec.category);
        self.spec.price = self.bounds;
    }
}
