pub mod autocomplete;
pub mod catalog;
pub mod comparison;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod recently_viewed;
pub mod showcase;
pub mod storage;
pub mod validation;

pub use autocomplete::{
    AutocompleteEvent, AutocompleteMachine, AutocompleteState, AutocompleteTransitionError,
    NavigationKey, SearchBox,
};
pub use catalog::{
    BrowseSession, CatalogFeed, CategorySelector, Highlighted, PriceRange, QuerySpec, SortKey,
    Suggestion, SuggestionPolicy,
};
pub use comparison::ComparisonList;
pub use currency::{Currency, ExchangeRates};
pub use domain::product::{parse_catalog, Category, Product, ProductId};
pub use domain::review::ReviewSummary;
pub use errors::{ApplicationError, DomainError};
pub use recently_viewed::RecentlyViewed;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
pub use validation::{ProductDraft, ReviewDraft};
