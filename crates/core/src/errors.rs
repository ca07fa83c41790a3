use thiserror::Error;

use crate::{autocomplete::AutocompleteTransitionError, domain::product::ProductId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid catalog document: {0}")]
    MalformedCatalog(String),
    #[error("duplicate product id `{0}` in catalog")]
    DuplicateProductId(ProductId),
    #[error("unknown product id `{0}`")]
    UnknownProduct(ProductId),
    #[error(
        "unknown category `{0}` (expected Smartphones|Smartwatches|Earbuds|Cameras|Accessories)"
    )]
    UnknownCategory(String),
    #[error(
        "unknown sort key `{0}` (expected price-asc|price-desc|rating-desc|newest|most-reviewed)"
    )]
    UnknownSortKey(String),
    #[error("unsupported currency `{0}` (expected USD|INR|EUR|GBP|AUD)")]
    UnsupportedCurrency(String),
    #[error("comparison is limited to {max} products")]
    ComparisonFull { max: usize },
    #[error("product `{0}` is already in the comparison")]
    AlreadyInComparison(ProductId),
    #[error("{subject} failed validation: {}", .issues.join("; "))]
    Validation { subject: String, issues: Vec<String> },
    #[error(transparent)]
    Autocomplete(#[from] AutocompleteTransitionError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable machine-readable class used in structured command output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::MalformedCatalog(_))
            | Self::Domain(DomainError::DuplicateProductId(_)) => "catalog_invalid",
            Self::Domain(DomainError::Validation { .. }) => "validation",
            Self::Domain(_) => "bad_request",
            Self::Persistence(_) => "persistence",
            Self::Configuration(_) => "config_validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::ProductId;
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn catalog_errors_map_to_catalog_class() {
        let error = ApplicationError::from(DomainError::DuplicateProductId(ProductId(
            "sw-1".to_owned(),
        )));

        assert_eq!(error.error_class(), "catalog_invalid");
        assert_eq!(error.to_string(), "duplicate product id `sw-1` in catalog");
    }

    #[test]
    fn validation_message_lists_every_issue() {
        let error = DomainError::Validation {
            subject: "product".to_owned(),
            issues: vec!["name is required".to_owned(), "price must be positive".to_owned()],
        };

        assert_eq!(
            error.to_string(),
            "product failed validation: name is required; price must be positive"
        );
        assert_eq!(ApplicationError::from(error).error_class(), "validation");
    }

    #[test]
    fn persistence_and_configuration_have_distinct_classes() {
        let persistence = ApplicationError::Persistence("disk full".to_owned());
        assert_eq!(persistence.error_class(), "persistence");
        assert_eq!(
            ApplicationError::Configuration("bad level".to_owned()).error_class(),
            "config_validation"
        );
    }
}
