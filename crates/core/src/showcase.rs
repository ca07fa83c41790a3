//! Landing-page product rails.

use crate::catalog::engine::sort;
use crate::catalog::query::SortKey;
use crate::domain::product::Product;

pub const NEW_ARRIVALS_LIMIT: usize = 6;

/// Products flagged as deals, in catalog order.
pub fn top_deals(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|product| product.is_top_deal).collect()
}

/// Newest products first, at most `limit` of them.
pub fn new_arrivals(products: &[Product], limit: usize) -> Vec<&Product> {
    let mut newest = sort(products.iter().collect(), SortKey::Newest);
    newest.truncate(limit);
    newest
}
