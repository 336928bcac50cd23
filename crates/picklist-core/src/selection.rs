//! Selection state machine.
//!
//! The selection is initialized from the controlled value (or, failing that,
//! from the serialized default), then mutated only by clicks. Every click
//! returns the value to report outward, computed from the same new state, so
//! what is stored and what is emitted never diverge.

use crate::value::SelectionValue;
use serde::{Deserialize, Serialize};

/// Selection mode of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectMode {
    /// At most one selected id
    #[default]
    Single,
    /// Any number of ids, in selection order
    Multiple,
}

impl SelectMode {
    /// Mode for a `multiple` flag.
    #[must_use]
    pub const fn from_multiple(multiple: bool) -> Self {
        if multiple {
            Self::Multiple
        } else {
            Self::Single
        }
    }
}

/// Compute the initial selected ids from the controlled value, else from
/// the serialized default value.
///
/// A controlled value wins even when it is empty.
#[must_use]
pub fn initial_ids(value: Option<&SelectionValue>, default_value: Option<&str>) -> Vec<String> {
    match (value, default_value) {
        (Some(value), _) => value.clone().into_ids(),
        (None, Some(raw)) => SelectionValue::parse(raw).into_ids(),
        (None, None) => Vec::new(),
    }
}

/// Selected ids plus the mode that governs how clicks mutate them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    mode: SelectMode,
    ids: Vec<String>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub const fn new(mode: SelectMode) -> Self {
        Self {
            mode,
            ids: Vec::new(),
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> SelectMode {
        self.mode
    }

    /// Selected ids, in selection order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Change the mode; switching to single keeps only the first id.
    pub fn set_mode(&mut self, mode: SelectMode) {
        self.mode = mode;
        self.enforce_mode();
    }

    /// Overwrite the selection from props.
    pub fn sync(&mut self, value: Option<&SelectionValue>, default_value: Option<&str>) {
        self.ids = initial_ids(value, default_value);
        self.enforce_mode();
    }

    /// Apply a click on `id` and return the value to report.
    ///
    /// Single mode always selects `[id]`, even when it is already the sole
    /// selection. Multiple mode toggles `id`: removed if present, appended
    /// otherwise.
    pub fn click(&mut self, id: &str) -> SelectionValue {
        match self.mode {
            SelectMode::Single => {
                self.ids = vec![id.to_string()];
                SelectionValue::Single(id.to_string())
            }
            SelectMode::Multiple => {
                if let Some(pos) = self.ids.iter().position(|selected| selected == id) {
                    self.ids.remove(pos);
                } else {
                    self.ids.push(id.to_string());
                }
                SelectionValue::Many(self.ids.clone())
            }
        }
    }

    /// Current selection in the shape reported for this mode.
    ///
    /// An empty single selection has no id to report and reads as an empty
    /// `Many`, the same value a JSON `null` decodes to.
    #[must_use]
    pub fn value(&self) -> SelectionValue {
        match (self.mode, self.ids.first()) {
            (SelectMode::Single, Some(id)) => SelectionValue::Single(id.clone()),
            (SelectMode::Single, None) => SelectionValue::Many(Vec::new()),
            (SelectMode::Multiple, _) => SelectionValue::Many(self.ids.clone()),
        }
    }

    fn enforce_mode(&mut self) {
        if self.mode == SelectMode::Single && self.ids.len() > 1 {
            tracing::debug!(
                dropped = self.ids.len() - 1,
                "single-select value has several ids, keeping the first"
            );
            self.ids.truncate(1);
        }
    }
}
