//! Selector widget for picklist.
//!
//! - [`Selector`]: list of values bound to a backend variable, with single or
//!   multiple selection and optional filtering
//! - [`ItemRow`]: stateless row renderer used by the selector
//! - [`SearchField`]: the filter text input
//! - [`SelectorProps`] / [`SelectorStyle`]: configuration from JSON or YAML

mod html;
pub mod item_row;
pub mod props;
pub mod search_field;
pub mod selector;

pub use html::escape_html;
pub use item_row::ItemRow;
pub use props::{split_update_vars, LovKey, PropsError, SelectorProps, SelectorStyle};
pub use search_field::{SearchChanged, SearchField};
pub use selector::{Selector, SelectorChanged};
