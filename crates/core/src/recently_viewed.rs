use tracing::debug;

use crate::domain::product::Product;
use crate::storage::{load_json, store_json, KeyValueStore, StorageError};

pub const RECENTLY_VIEWED_KEY: &str = "recently_viewed_products";
pub const MAX_RECENTLY_VIEWED: usize = 8;

/// Most-recent-first history of product pages the shopper opened.
///
/// Products are stored as snapshots, so the history still renders when the
/// live catalog has not loaded yet.
#[derive(Debug)]
pub struct RecentlyViewed<S> {
    store: S,
    products: Vec<Product>,
}

impl<S: KeyValueStore> RecentlyViewed<S> {
    pub fn load(mut store: S) -> Result<Self, StorageError> {
        let products: Vec<Product> =
            load_json(&mut store, RECENTLY_VIEWED_KEY)?.unwrap_or_default();
        Ok(Self { store, products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Moves `product` to the front, dropping any older entry with the same
    /// id and anything past the history limit.
    pub fn add(&mut self, product: &Product) -> Result<(), StorageError> {
        self.products.retain(|existing| existing.id != product.id);
        self.products.insert(0, product.clone());
        self.products.truncate(MAX_RECENTLY_VIEWED);
        store_json(&mut self.store, RECENTLY_VIEWED_KEY, &self.products)?;

        debug!(
            event_name = "recently_viewed.product_added",
            product_id = %product.id,
            history_len = self.products.len(),
            "product recorded in history"
        );
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.products.clear();
        self.store.remove(RECENTLY_VIEWED_KEY)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{RecentlyViewed, MAX_RECENTLY_VIEWED, RECENTLY_VIEWED_KEY};
    use crate::domain::product::{Category, Product, ProductId};
    use crate::storage::{KeyValueStore, MemoryStore};

    fn product(id: &str) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            name: format!("Product {id}"),
            category: Category::Accessories,
            price: Decimal::new(25, 0),
            rating: 3.5,
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

    fn ids<S: KeyValueStore>(history: &RecentlyViewed<S>) -> Vec<&str> {
        history.products().iter().map(|product| product.id.0.as_str()).collect()
    }

    #[test]
    fn revisiting_moves_product_to_front_without_duplicates() {
        let mut history = RecentlyViewed::load(MemoryStore::default()).expect("empty store");
        for id in ["a", "b", "c", "a"] {
            history.add(&product(id)).expect("add succeeds");
        }

        assert_eq!(ids(&history), vec!["a", "c", "b"]);
    }

    #[test]
    fn history_is_capped_and_survives_reload() {
        let mut history = RecentlyViewed::load(MemoryStore::default()).expect("empty store");
        for index in 0..10 {
            history.add(&product(&format!("p{index}"))).expect("add succeeds");
        }
        assert_eq!(history.products().len(), MAX_RECENTLY_VIEWED);
        assert_eq!(ids(&history)[0], "p9");
        assert_eq!(ids(&history)[MAX_RECENTLY_VIEWED - 1], "p2");

        let reloaded = RecentlyViewed::load(history.into_store()).expect("reload");
        assert_eq!(ids(&reloaded).len(), MAX_RECENTLY_VIEWED);
        assert_eq!(ids(&reloaded)[0], "p9");
    }

    #[test]
    fn clear_removes_stored_key() {
        let mut history = RecentlyViewed::load(MemoryStore::default()).expect("empty store");
        history.add(&product("a")).expect("add succeeds");
        history.clear().expect("clear succeeds");

        assert!(history.products().is_empty());
        let store = history.into_store();
        assert_eq!(store.get(RECENTLY_VIEWED_KEY).expect("read"), None);
    }

    #[test]
    fn corrupt_history_loads_empty_and_is_dropped() {
        let mut store = MemoryStore::default();
        store.set(RECENTLY_VIEWED_KEY, "{broken".to_string()).expect("write");

        let history = RecentlyViewed::load(store).expect("corrupt history tolerated");
        assert!(history.products().is_empty());
        assert_eq!(history.into_store().get(RECENTLY_VIEWED_KEY).expect("read"), None);
    }
}
