use tracing::debug;

use crate::domain::product::Product;

/// Latest product list delivered by the data store.
///
/// Fetches are tagged with the generation at which they were issued. A
/// response older than the one already applied is dropped, so a slow request
/// can never overwrite a newer list.
#[derive(Clone, Debug, Default)]
pub struct CatalogFeed {
    generation: u64,
    products: Vec<Product>,
}

impl CatalogFeed {
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` when the snapshot replaced the current list.
    pub fn apply(&mut self, generation: u64, products: Vec<Product>) -> bool {
        if generation < self.generation {
            debug!(
                event_name = "catalog.feed.stale_snapshot_dropped",
                generation,
                current_generation = self.generation,
                "ignoring out-of-order catalog response"
            );
            return false;
        }

        self.generation = generation;
        self.products = products;
        true
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::CatalogFeed;
    use crate::domain::product::{Category, Product, ProductId};

    fn product(id: &str) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            name: id.to_owned(),
            category: Category::Accessories,
            price: Decimal::ONE,
            rating: 0.0,
            description: String::new(),
            features: Vec::new(),
            pros: Vec::new(),
            cons: Vec::new(),
            image_url: String::new(),
            affiliate_link: String::new(),
            is_top_deal: false,
            created_at: None,
            reviews: None,
        }
    }

    #[test]
    fn starts_empty_while_loading() {
        let feed = CatalogFeed::default();
        assert!(feed.products().is_empty());
        assert_eq!(feed.generation(), 0);
    }

    #[test]
    fn stale_response_does_not_replace_newer_list() {
        let mut feed = CatalogFeed::default();
        assert!(feed.apply(2, vec![product("fresh")]));
        assert!(!feed.apply(1, vec![product("stale")]));

        assert_eq!(feed.products()[0].id.0, "fresh");
        assert_eq!(feed.generation(), 2);
    }

    #[test]
    fn same_generation_refetch_wins() {
        let mut feed = CatalogFeed::default();
        feed.apply(3, vec![product("a")]);
        assert!(feed.apply(3, vec![product("b")]));
        assert_eq!(feed.products()[0].id.0, "b");
    }
}
