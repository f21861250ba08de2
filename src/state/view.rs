//! View selector: list mode or a single focused timer

use serde::{Deserialize, Serialize};

use super::timer::TimerId;

/// Which view the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ViewSelector {
    /// Every timer, in store order
    #[default]
    List,
    /// One timer, looked up by id at render time
    #[serde(rename_all = "camelCase")]
    SingleFocus { focused_id: TimerId },
}

impl ViewSelector {
    pub fn focused_id(&self) -> Option<TimerId> {
        match self {
            ViewSelector::List => None,
            ViewSelector::SingleFocus { focused_id } => Some(*focused_id),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ViewSelector::List)
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            ViewSelector::List => "list",
            ViewSelector::SingleFocus { .. } => "singleFocus",
        }
    }

    pub fn focus(&mut self, id: TimerId) {
        *self = ViewSelector::SingleFocus { focused_id: id };
    }

    /// Return to the list view
    pub fn back(&mut self) {
        *self = ViewSelector::List;
    }

    /// Drop the focus if it pointed at a timer that was just deleted.
    /// Returns whether the view changed.
    pub fn on_deleted(&mut self, id: TimerId) -> bool {
        if self.focused_id() == Some(id) {
            self.back();
            true
        } else {
            false
        }
    }
}
