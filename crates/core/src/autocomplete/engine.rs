use thiserror::Error;
use tracing::debug;

use crate::autocomplete::states::{
    AutocompleteAction, AutocompleteContext, AutocompleteEvent, AutocompleteState,
    NavigationKey, TransitionOutcome,
};
use crate::catalog::query::SuggestionPolicy;
use crate::catalog::suggest::{suggest_with, Suggestion};
use crate::domain::product::{Product, ProductId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AutocompleteTransitionError {
    #[error("hovered row {index} is outside the {suggestion_count} visible suggestions")]
    HoverOutOfRange { index: usize, suggestion_count: usize },
}

/// Keyboard and pointer navigation over a suggestion list.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutocompleteMachine;

impl AutocompleteMachine {
    pub fn initial_state(&self) -> AutocompleteState {
        AutocompleteState::Closed
    }

    pub fn apply(
        &self,
        current: &AutocompleteState,
        event: &AutocompleteEvent,
        context: &AutocompleteContext,
    ) -> Result<TransitionOutcome, AutocompleteTransitionError> {
        transition(current, event, context)
    }
}

fn transition(
    current: &AutocompleteState,
    event: &AutocompleteEvent,
    context: &AutocompleteContext,
) -> Result<TransitionOutcome, AutocompleteTransitionError> {
    use AutocompleteAction::{ClearTerm, CommitSelection};
    use AutocompleteEvent::{
        ArrowDown, ArrowUp, Enter, Escape, Focused, Hover, PointerOutside, TermChanged,
    };
    use AutocompleteState::{Closed, Open};

    let count = context.suggestion_count;
    let (to, actions) = match (*current, *event) {
        (_, TermChanged { trimmed_len }) => {
            if trimmed_len >= context.min_chars && count > 0 {
                (Open { active: None }, Vec::new())
            } else {
                (Closed, Vec::new())
            }
        }
        (Closed, Focused) if count > 0 => (Open { active: None }, Vec::new()),
        (_, PointerOutside) | (Open { .. }, Escape) => (Closed, Vec::new()),
        (Open { .. }, ArrowDown | ArrowUp) if count == 0 => (Closed, Vec::new()),
        (Open { active }, ArrowDown) => {
            let next = match active {
                Some(index) if index + 1 < count => index + 1,
                _ => 0,
            };
            (Open { active: Some(next) }, Vec::new())
        }
        (Open { active }, ArrowUp) => {
            let last = count - 1;
            let previous = match active {
                Some(index) if index > 0 => (index - 1).min(last),
                _ => last,
            };
            (Open { active: Some(previous) }, Vec::new())
        }
        (Open { active: Some(index) }, Enter) if index < count => {
            (Closed, vec![CommitSelection(index), ClearTerm])
        }
        (Open { .. }, Hover(index)) => {
            if index >= count {
                return Err(AutocompleteTransitionError::HoverOutOfRange {
                    index,
                    suggestion_count: count,
                });
            }
            (Open { active: Some(index) }, Vec::new())
        }
        // Keys while closed, focus while already open, and Enter without a
        // highlighted row leave the state untouched.
        (state, _) => (state, Vec::new()),
    };

    Ok(TransitionOutcome { from: *current, to, event: *event, actions })
}

/// Search input with an attached suggestion dropdown.
///
/// Owns the typed term and the dropdown state; the product list is borrowed
/// per call so the box always works against the caller's latest snapshot.
#[derive(Clone, Debug)]
pub struct SearchBox {
    machine: AutocompleteMachine,
    policy: SuggestionPolicy,
    state: AutocompleteState,
    term: String,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new(SuggestionPolicy::DEFAULT)
    }
}

impl SearchBox {
    pub fn new(policy: SuggestionPolicy) -> Self {
        let machine = AutocompleteMachine;
        Self { state: machine.initial_state(), machine, policy, term: String::new() }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn state(&self) -> AutocompleteState {
        self.state
    }

    pub fn suggestions<'a>(&self, products: &'a [Product]) -> Vec<Suggestion<'a>> {
        suggest_with(products, &self.term, self.policy)
    }

    pub fn input(
        &mut self,
        products: &[Product],
        term: impl Into<String>,
    ) -> Result<TransitionOutcome, AutocompleteTransitionError> {
        self.term = term.into();
        let trimmed_len = self.term.trim().chars().count();
        let (outcome, _) =
            self.dispatch(products, AutocompleteEvent::TermChanged { trimmed_len })?;
        Ok(outcome)
    }

    /// Handles a key press. Enter on a highlighted row returns the chosen
    /// product's id and clears the term.
    pub fn key(
        &mut self,
        products: &[Product],
        key: NavigationKey,
    ) -> Result<Option<ProductId>, AutocompleteTransitionError> {
        let (_, committed) = self.dispatch(products, key.into())?;
        Ok(committed.map(|product| product.id.clone()))
    }

    /// Highlights the row under the pointer.
    pub fn hover(
        &mut self,
        products: &[Product],
        index: usize,
    ) -> Result<AutocompleteState, AutocompleteTransitionError> {
        Ok(self.dispatch(products, AutocompleteEvent::Hover(index))?.0.to)
    }

    pub fn focus(
        &mut self,
        products: &[Product],
    ) -> Result<AutocompleteState, AutocompleteTransitionError> {
        Ok(self.dispatch(products, AutocompleteEvent::Focused)?.0.to)
    }

    pub fn pointer_outside(
        &mut self,
        products: &[Product],
    ) -> Result<AutocompleteState, AutocompleteTransitionError> {
        Ok(self.dispatch(products, AutocompleteEvent::PointerOutside)?.0.to)
    }

    /// Feeds one event through the machine. When the event commits a
    /// selection, the chosen product is returned and the term is cleared.
    pub fn dispatch<'a>(
        &mut self,
        products: &'a [Product],
        event: AutocompleteEvent,
    ) -> Result<(TransitionOutcome, Option<&'a Product>), AutocompleteTransitionError> {
        let suggestions = self.suggestions(products);
        let context = AutocompleteContext {
            suggestion_count: suggestions.len(),
            min_chars: self.policy.min_chars,
        };
        let outcome = self.machine.apply(&self.state, &event, &context)?;

        let mut committed = None;
        for action in &outcome.actions {
            match action {
                AutocompleteAction::CommitSelection(index) => {
                    committed = suggestions.get(*index).map(|suggestion| suggestion.product);
                }
                AutocompleteAction::ClearTerm => self.term.clear(),
            }
        }

        if outcome.from != outcome.to {
            debug!(
                event_name = "autocomplete.transition_applied",
                from = ?outcome.from,
                to = ?outcome.to,
                event = ?outcome.event,
                "autocomplete state changed"
            );
        }
        self.state = outcome.to;
        Ok((outcome, committed))
    }
}
