use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;

pub const MAX_COMPARISON: usize = 4;

/// Side-by-side comparison tray. Holds product snapshots in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonList {
    products: Vec<Product>,
}

impl ComparisonList {
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.products.iter().any(|product| &product.id == product_id)
    }

    pub fn add(&mut self, product: &Product) -> Result<(), DomainError> {
        if self.products.len() >= MAX_COMPARISON {
            return Err(DomainError::ComparisonFull { max: MAX_COMPARISON });
        }
        if self.contains(&product.id) {
            return Err(DomainError::AlreadyInComparison(product.id.clone()));
        }
        self.products.push(product.clone());
        Ok(())
    }

    /// Returns whether a product was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|product| &product.id != product_id);
        self.products.len() != before
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }
}
