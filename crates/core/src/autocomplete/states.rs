use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutocompleteState {
    #[default]
    Closed,
    /// `active` is the highlighted row; `None` means nothing is highlighted.
    Open { active: Option<usize> },
}

impl AutocompleteState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn active_index(&self) -> Option<usize> {
        match self {
            Self::Open { active } => *active,
            Self::Closed => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutocompleteEvent {
    TermChanged { trimmed_len: usize },
    Focused,
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    PointerOutside,
    Hover(usize),
}

/// Keys the dropdown reacts to while the search box has focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

impl From<NavigationKey> for AutocompleteEvent {
    fn from(key: NavigationKey) -> Self {
        match key {
            NavigationKey::ArrowDown => Self::ArrowDown,
            NavigationKey::ArrowUp => Self::ArrowUp,
            NavigationKey::Enter => Self::Enter,
            NavigationKey::Escape => Self::Escape,
        }
    }
}

/// Facts about the current suggestion list that transitions depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteContext {
    pub suggestion_count: usize,
    pub min_chars: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutocompleteAction {
    CommitSelection(usize),
    ClearTerm,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: AutocompleteState,
    pub to: AutocompleteState,
    pub event: AutocompleteEvent,
    pub actions: Vec<AutocompleteAction>,
}
