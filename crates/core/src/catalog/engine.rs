use std::cmp::Ordering;

use crate::catalog::query::{CategorySelector, PriceRange, QuerySpec, SortKey};
use crate::catalog::suggest::contains_ignore_case;
use crate::domain::product::Product;

/// Products matching the term, category and price range, in input order.
///
/// The term is matched case-insensitively as a substring of the name or the
/// description; an empty term matches everything. An inverted range matches
/// nothing.
pub fn filter<'a>(
    products: &'a [Product],
    term: &str,
    category: CategorySelector,
    price: PriceRange,
) -> Vec<&'a Product> {
    if price.is_inverted() {
        return Vec::new();
    }

    products
        .iter()
        .filter(|product| matches_term(product, term))
        .filter(|product| category.matches(product.category))
        .filter(|product| price.contains(product.price))
        .collect()
}

fn matches_term(product: &Product, term: &str) -> bool {
    contains_ignore_case(&product.name, term) || contains_ignore_case(&product.description, term)
}

/// Stable sort: products with equal keys keep their relative order.
pub fn sort<'a>(mut products: Vec<&'a Product>, key: SortKey) -> Vec<&'a Product> {
    products.sort_by(|left, right| compare(left, right, key));
    products
}

fn compare(left: &Product, right: &Product, key: SortKey) -> Ordering {
    match key {
        SortKey::PriceAsc => left.price.cmp(&right.price),
        SortKey::PriceDesc => right.price.cmp(&left.price),
        SortKey::RatingDesc => right.rating.total_cmp(&left.rating),
        SortKey::Newest => right.created_or_epoch().cmp(&left.created_or_epoch()),
        SortKey::MostReviewed => right.review_count().cmp(&left.review_count()),
    }
}

/// `[floor(min), ceil(max)]` over the given prices, or the default range when
/// there are none.
pub fn compute_price_bounds<'a, I>(products: I) -> PriceRange
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut prices = products.into_iter().map(|product| product.price);
    let Some(first) = prices.next() else {
        return PriceRange::DEFAULT;
    };

    let (min, max) =
        prices.fold((first, first), |(min, max), price| (min.min(price), max.max(price)));
    PriceRange::new(min.floor(), max.ceil())
}

pub fn category_price_bounds(products: &[Product], category: CategorySelector) -> PriceRange {
    compute_price_bounds(products.iter().filter(|product| category.matches(product.category)))
}

/// Filter then sort.
pub fn run<'a>(products: &'a [Product], spec: &QuerySpec) -> Vec<&'a Product> {
    sort(filter(products, &spec.term, spec.category, spec.price), spec.sort)
}
