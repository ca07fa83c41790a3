//! Checks for catalog-admin product drafts and shopper review drafts.
//!
//! Validation collects every problem before failing so a form can show all
//! of them at once.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Category, Product};
use crate::errors::DomainError;

const PRODUCT_NAME_MAX: usize = 200;
const DESCRIPTION_MIN: usize = 10;
const DESCRIPTION_MAX: usize = 2000;
const REVIEW_TEXT_MIN: usize = 10;
const REVIEW_TEXT_MAX: usize = 500;
const BLOCKED_REVIEW_WORDS: [&str; 3] = ["spam", "fake", "scam"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: Category,
    pub price: Decimal,
    pub rating: f64,
    pub description: String,
    pub affiliate_link: String,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut issues = Vec::new();

        let name_len = self.name.chars().count();
        if name_len == 0 {
            issues.push("product name is required".to_string());
        } else if name_len > PRODUCT_NAME_MAX {
            issues.push(format!("product name must be at most {PRODUCT_NAME_MAX} characters"));
        }

        if self.price <= Decimal::ZERO {
            issues.push("price must be positive".to_string());
        }

        if !(0.0..=5.0).contains(&self.rating) {
            issues.push("rating must be between 0 and 5".to_string());
        }

        let description_len = self.description.chars().count();
        if description_len < DESCRIPTION_MIN {
            issues.push(format!("description must be at least {DESCRIPTION_MIN} characters"));
        } else if description_len > DESCRIPTION_MAX {
            issues.push(format!("description must be at most {DESCRIPTION_MAX} characters"));
        }

        if !is_web_url(&self.affiliate_link) {
            issues.push("affiliate link must be a valid http(s) URL".to_string());
        }

        finish("product", issues)
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category,
            price: product.price,
            rating: product.rating,
            description: product.description.clone(),
            affiliate_link: product.affiliate_link.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub rating: u8,
    pub text: String,
}

impl ReviewDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut issues = Vec::new();

        if !(1..=5).contains(&self.rating) {
            issues.push("rating must be between 1 and 5".to_string());
        }

        let text_len = self.text.chars().count();
        if self.text.trim().chars().count() < REVIEW_TEXT_MIN {
            issues.push(format!("review must be at least {REVIEW_TEXT_MIN} characters"));
        } else if text_len > REVIEW_TEXT_MAX {
            issues.push(format!("review must be less than {REVIEW_TEXT_MAX} characters"));
        }

        let lowered = self.text.to_lowercase();
        if BLOCKED_REVIEW_WORDS.iter().any(|word| lowered.contains(word)) {
            issues.push("review contains inappropriate content".to_string());
        }

        finish("review", issues)
    }
}

fn finish(subject: &str, issues: Vec<String>) -> Result<(), DomainError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation { subject: subject.to_string(), issues })
    }
}

fn is_web_url(candidate: &str) -> bool {
    let Some(rest) =
        candidate.strip_prefix("https://").or_else(|| candidate.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty() && !candidate.chars().any(char::is_whitespace)
}
