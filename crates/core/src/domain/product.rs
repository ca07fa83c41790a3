use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::review::ReviewSummary;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Smartphones,
    Smartwatches,
    Earbuds,
    Cameras,
    Accessories,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Smartphones,
        Category::Smartwatches,
        Category::Earbuds,
        Category::Cameras,
        Category::Accessories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smartphones => "Smartphones",
            Self::Smartwatches => "Smartwatches",
            Self::Earbuds => "Earbuds",
            Self::Cameras => "Cameras",
            Self::Accessories => "Accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownCategory(wanted.to_string()))
    }
}

/// A catalog entry as served by the remote data store. Prices are in USD.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProductRecord")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Decimal,
    pub rating: f64,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub affiliate_link: String,
    #[serde(default)]
    pub is_top_deal: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviews: Option<ReviewSummary>,
}

/// Wire shape of a catalog entry. The data store sends a flat `review_count`
/// and may send bare dates; stored snapshots carry the nested summary.
#[derive(Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    category: Category,
    price: Decimal,
    rating: f64,
    description: String,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    pros: Vec<String>,
    #[serde(default)]
    cons: Vec<String>,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    affiliate_link: String,
    #[serde(default)]
    is_top_deal: bool,
    #[serde(default, deserialize_with = "deserialize_created_at")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    reviews: Option<ReviewSummary>,
    #[serde(default)]
    review_count: Option<u32>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let reviews = record.reviews.or_else(|| {
            record
                .review_count
                .map(|count| ReviewSummary { count, average_rating: record.rating })
        });
        Self {
            id: record.id,
            name: record.name,
            category: record.category,
            price: record.price,
            rating: record.rating,
            description: record.description,
            features: record.features,
            pros: record.pros,
            cons: record.cons,
            image_url: record.image_url,
            affiliate_link: record.affiliate_link,
            is_top_deal: record.is_top_deal,
            created_at: record.created_at,
            reviews,
        }
    }
}

/// RFC 3339 timestamp, or a `YYYY-MM-DD` date taken as midnight UTC.
fn deserialize_created_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_timestamp(raw.trim()).map(Some).ok_or_else(|| {
        serde::de::Error::custom(format!("`{raw}` is neither an RFC 3339 timestamp nor a date"))
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

impl Product {
    pub fn review_count(&self) -> u32 {
        self.reviews.as_ref().map(|summary| summary.count).unwrap_or(0)
    }

    pub fn created_or_epoch(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Parses a JSON array of products, rejecting documents that repeat an id.
pub fn parse_catalog(raw: &str) -> Result<Vec<Product>, DomainError> {
    let products: Vec<Product> = serde_json::from_str(raw)
        .map_err(|error| DomainError::MalformedCatalog(error.to_string()))?;

    let mut seen = HashSet::with_capacity(products.len());
    for product in &products {
        if !seen.insert(&product.id) {
            return Err(DomainError::DuplicateProductId(product.id.clone()));
        }
    }

    Ok(products)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{parse_catalog, Category, ProductId};
    use crate::catalog::{sort, SortKey};
    use crate::domain::review::ReviewSummary;
    use crate::errors::DomainError;

    #[test]
    fn parses_catalog_with_optional_fields_missing() {
        let products = parse_catalog(
            r#"[
                {"id": "sw-1", "name": "Alpha Watch", "category": "Smartwatches",
                 "price": 100, "rating": 4.0, "description": "steel case"},
                {"id": "eb-1", "name": "Pod Buds", "category": "Earbuds",
                 "price": "59.99", "rating": 4.4, "description": "noise cancelling",
                 "created_at": "2024-02-01T00:00:00Z", "is_top_deal": true,
                 "reviews": {"count": 12, "average_rating": 4.5}}
            ]"#,
        )
        .expect("catalog should parse");

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, Decimal::new(100, 0));
        assert!(products[0].created_at.is_none());
        assert_eq!(products[0].review_count(), 0);
        assert_eq!(products[1].price, Decimal::new(5999, 2));
        assert_eq!(products[1].review_count(), 12);
        assert!(products[1].is_top_deal);
    }

    #[test]
    fn flat_review_count_feeds_most_reviewed_order() {
        let products = parse_catalog(
            r#"[
                {"id": "few", "name": "Few", "category": "Earbuds", "price": 20,
                 "rating": 3.5, "description": "x", "review_count": 2},
                {"id": "none", "name": "None", "category": "Earbuds", "price": 20,
                 "rating": 4.0, "description": "x"},
                {"id": "many", "name": "Many", "category": "Earbuds", "price": 20,
                 "rating": 4.5, "description": "x", "review_count": 12}
            ]"#,
        )
        .expect("catalog should parse");

        assert_eq!(products[2].review_count(), 12);
        assert_eq!(
            products[2].reviews,
            Some(ReviewSummary { count: 12, average_rating: 4.5 })
        );

        let ordered = sort(products.iter().collect(), SortKey::MostReviewed);
        let ids: Vec<&str> = ordered.iter().map(|product| product.id.0.as_str()).collect();
        assert_eq!(ids, vec!["many", "few", "none"]);
    }

    #[test]
    fn bare_dates_are_midnight_utc() {
        let products = parse_catalog(
            r#"[
                {"id": "a", "name": "Alpha Watch", "category": "Smartwatches", "price": 100,
                 "rating": 4.0, "description": "x", "created_at": "2024-01-01"},
                {"id": "b", "name": "Beta Watch", "category": "Smartwatches", "price": 50,
                 "rating": 4.5, "description": "x", "created_at": "2024-02-01T09:30:00+05:30"}
            ]"#,
        )
        .expect("catalog should parse");

        assert_eq!(products[0].created_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single());
        assert_eq!(products[1].created_at, Utc.with_ymd_and_hms(2024, 2, 1, 4, 0, 0).single());

        let error = parse_catalog(
            r#"[{"id": "c", "name": "C", "category": "Cameras", "price": 1, "rating": 1,
                 "description": "x", "created_at": "last tuesday"}]"#,
        )
        .expect_err("unparseable dates must fail");
        assert!(matches!(error, DomainError::MalformedCatalog(_)));
    }

    #[test]
    fn stored_snapshot_reads_back_unchanged() {
        let products = parse_catalog(
            r#"[{"id": "p", "name": "Pixel", "category": "Smartphones", "price": 499,
                 "rating": 4.6, "description": "x", "created_at": "2024-03-01",
                 "reviews": {"count": 3, "average_rating": 4.0}, "review_count": 9}]"#,
        )
        .expect("catalog should parse");
        assert_eq!(products[0].review_count(), 3);

        let encoded = serde_json::to_string(&products).expect("serialize");
        assert_eq!(parse_catalog(&encoded), Ok(products));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let error = parse_catalog(
            r#"[
                {"id": "x", "name": "A", "category": "Cameras", "price": 1, "rating": 1, "description": ""},
                {"id": "x", "name": "B", "category": "Cameras", "price": 2, "rating": 2, "description": ""}
            ]"#,
        )
        .expect_err("duplicate ids must fail");

        assert_eq!(error, DomainError::DuplicateProductId(ProductId("x".to_string())));
    }

    #[test]
    fn malformed_document_is_reported() {
        let error = parse_catalog("{not json").expect_err("garbage must fail");
        assert!(matches!(error, DomainError::MalformedCatalog(_)));
    }

    #[test]
    fn admin_created_phones_load_with_the_rest() {
        let products = parse_catalog(
            r#"[
                {"id": "ph-1", "name": "Nova Phone", "category": "Smartphones", "price": 699,
                 "rating": 4.5, "description": "x"},
                {"id": "sw-1", "name": "Alpha Watch", "category": "Smartwatches", "price": 100,
                 "rating": 4.0, "description": "x"}
            ]"#,
        )
        .expect("catalog should parse");

        assert_eq!(products[0].category, Category::Smartphones);
        assert_eq!(Category::Smartphones.to_string(), "Smartphones");
        assert_eq!("smartphones".parse::<Category>(), Ok(Category::Smartphones));
        assert_eq!(Category::ALL.len(), 5);
    }

    #[test]
    fn category_parsing_ignores_ascii_case() {
        assert_eq!("earbuds".parse::<Category>(), Ok(Category::Earbuds));
        assert_eq!(" Cameras ".parse::<Category>(), Ok(Category::Cameras));
        assert!(matches!("Drones".parse::<Category>(), Err(DomainError::UnknownCategory(_))));
    }
}
