use std::ops::Range;
use std::path::PathBuf;

use serde::Serialize;
use storefront_core::autocomplete::{
    AutocompleteState, AutocompleteTransitionError, NavigationKey, SearchBox,
};
use storefront_core::catalog::{find, Suggestion};
use storefront_core::{ApplicationError, DomainError, Product, ProductId};

use crate::commands::{load_config, read_catalog, CommandResult, EXIT_INPUT};

const COMMAND: &str = "suggest";

#[derive(Clone, Debug, Default)]
pub struct SuggestArgs {
    pub catalog: PathBuf,
    pub term: String,
    /// Keystrokes replayed against the dropdown after typing, e.g.
    /// `down,down,enter` or `hover:2`.
    pub keys: Vec<String>,
}

/// One replayed interaction with the dropdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Interaction {
    Key(NavigationKey),
    Hover(usize),
    Focus,
    PointerOutside,
}

#[derive(Debug, Serialize)]
struct SuggestionView<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    highlighted: String,
    matched_spans: Vec<Range<usize>>,
    highlighted_category: String,
    category_spans: Vec<Range<usize>>,
}

impl<'a> From<&Suggestion<'a>> for SuggestionView<'a> {
    fn from(suggestion: &Suggestion<'a>) -> Self {
        Self {
            id: &suggestion.product.id.0,
            name: &suggestion.product.name,
            category: suggestion.product.category.as_str(),
            highlighted: suggestion.name.render("[", "]"),
            matched_spans: suggestion.name.matched_spans(),
            highlighted_category: suggestion.category.render("[", "]"),
            category_spans: suggestion.category.matched_spans(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SuggestData<'a> {
    term: &'a str,
    state: AutocompleteState,
    suggestions: Vec<SuggestionView<'a>>,
    selected: Option<&'a str>,
}

pub fn run(args: SuggestArgs) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let products = match read_catalog(&args.catalog) {
        Ok(products) => products,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let interactions =
        match args.keys.iter().map(|key| parse_key(key)).collect::<Result<Vec<_>, _>>() {
            Ok(interactions) => interactions,
            Err(failure) => return failure,
        };

    let mut search = SearchBox::new(config.suggestion_policy());
    let selected = match replay(&mut search, &products, &args.term, interactions) {
        Ok(Some(id)) => match find(&products, &id) {
            Ok(product) => Some(product),
            Err(error) => return CommandResult::from_error(COMMAND, &error.into()),
        },
        Ok(None) => None,
        Err(error) => {
            let error = ApplicationError::from(DomainError::from(error));
            return CommandResult::from_error(COMMAND, &error);
        }
    };

    let suggestions = search.suggestions(&products);
    let data = SuggestData {
        term: search.term(),
        state: search.state(),
        suggestions: suggestions.iter().map(SuggestionView::from).collect(),
        selected: selected.map(|product| product.id.0.as_str()),
    };

    let message = match selected {
        Some(product) => format!("selected {}", product.name),
        None => format!("{} suggestions", suggestions.len()),
    };
    CommandResult::success_with_data(COMMAND, message, data)
}

/// Types `term` and then replays each interaction. Returns the id of the
/// last product committed with Enter, if any.
fn replay(
    search: &mut SearchBox,
    products: &[Product],
    term: &str,
    interactions: Vec<Interaction>,
) -> Result<Option<ProductId>, AutocompleteTransitionError> {
    search.input(products, term)?;
    let mut selected = None;
    for interaction in interactions {
        match interaction {
            Interaction::Key(key) => {
                if let Some(id) = search.key(products, key)? {
                    selected = Some(id);
                }
            }
            Interaction::Hover(index) => {
                search.hover(products, index)?;
            }
            Interaction::Focus => {
                search.focus(products)?;
            }
            Interaction::PointerOutside => {
                search.pointer_outside(products)?;
            }
        }
    }
    Ok(selected)
}

fn parse_key(raw: &str) -> Result<Interaction, CommandResult> {
    let key = raw.trim().to_ascii_lowercase();
    let interaction = match key.as_str() {
        "down" => Interaction::Key(NavigationKey::ArrowDown),
        "up" => Interaction::Key(NavigationKey::ArrowUp),
        "enter" => Interaction::Key(NavigationKey::Enter),
        "escape" | "esc" => Interaction::Key(NavigationKey::Escape),
        "focus" => Interaction::Focus,
        "outside" => Interaction::PointerOutside,
        other => match other.strip_prefix("hover:").map(str::parse::<usize>) {
            Some(Ok(index)) => Interaction::Hover(index),
            _ => {
                return Err(CommandResult::failure(
                    COMMAND,
                    "bad_request",
                    format!(
                        "unknown key `{raw}` (expected down|up|enter|escape|focus|outside|hover:N)"
                    ),
                    EXIT_INPUT,
                ))
            }
        },
    };
    Ok(interaction)
}
