pub mod engine;
pub mod states;

pub use engine::{AutocompleteMachine, AutocompleteTransitionError, SearchBox};
pub use states::{
    AutocompleteAction, AutocompleteContext, AutocompleteEvent, AutocompleteState,
    NavigationKey, TransitionOutcome,
};
