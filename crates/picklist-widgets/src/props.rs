//! Selector configuration: bound props and visual style.
//!
//! Props arrive from the backend as JSON (camelCase keys, with the framework's
//! `tp_` prefixed binding keys) or from a YAML manifest.

use picklist_core::{Color, RawLovEntry, SelectMode, SelectionValue};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Error loading selector props.
#[derive(Debug, Error)]
pub enum PropsError {
    /// Invalid JSON props
    #[error("invalid selector props JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid YAML props
    #[error("invalid selector props YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    /// No bound variable name
    #[error("selector props have no bound variable name (tp_varname)")]
    MissingVarName,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UpdateVars {
    List(Vec<String>),
    Joined(String),
}

/// Split a `;`-separated update variable list, dropping empty names.
#[must_use]
pub fn split_update_vars(joined: &str) -> Vec<String> {
    joined
        .split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn deserialize_update_vars<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<UpdateVars>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(UpdateVars::List(names)) => names,
        Some(UpdateVars::Joined(joined)) => split_update_vars(&joined),
    })
}

/// Accept `defaultValue` as serialized text or as a live JSON value.
///
/// Non-string values are kept in their JSON text form, which
/// [`SelectionValue::parse`] decodes back to the same selection.
fn deserialize_default_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(raw)) => Some(raw),
        Some(live) => Some(live.to_string()),
    })
}

const fn default_true() -> bool {
    true
}

/// Props of a selector bound to a backend variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorProps {
    /// Widget identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Serialized initial value, used when `value` is absent
    #[serde(
        rename = "defaultValue",
        default,
        deserialize_with = "deserialize_default_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<String>,
    /// Controlled value pushed by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<SelectionValue>,
    /// Name of the bound variable
    #[serde(default)]
    pub tp_varname: String,
    /// Serialized list of values, used when `lov` is absent
    #[serde(rename = "defaultLov", default, skip_serializing_if = "Option::is_none")]
    pub default_lov: Option<String>,
    /// Structured list of values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lov: Option<Vec<RawLovEntry>>,
    /// Show the search field and filter rows
    #[serde(default)]
    pub filter: bool,
    /// Allow several selected ids
    #[serde(default)]
    pub multiple: bool,
    /// Ask the backend to recompute dependents on change
    #[serde(default = "default_true")]
    pub propagate: bool,
    /// Whether the selector reacts to clicks
    #[serde(default = "default_true")]
    pub active: bool,
    /// Extra variables to refresh on mount
    #[serde(default, deserialize_with = "deserialize_update_vars")]
    pub tp_updatevars: Vec<String>,
    /// Extra CSS class for the root element
    #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl Default for SelectorProps {
    fn default() -> Self {
        Self {
            id: None,
            default_value: None,
            value: None,
            tp_varname: String::new(),
            default_lov: None,
            lov: None,
            filter: false,
            multiple: false,
            propagate: true,
            active: true,
            tp_updatevars: Vec::new(),
            class_name: None,
        }
    }
}

impl SelectorProps {
    /// Props bound to `var_name`.
    #[must_use]
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            tp_varname: var_name.into(),
            ..Self::default()
        }
    }

    /// Parse and validate JSON props.
    pub fn from_json(json: &str) -> Result<Self, PropsError> {
        let props: Self = serde_json::from_str(json)?;
        props.validate()
    }

    /// Parse and validate YAML props.
    pub fn from_yaml(yaml: &str) -> Result<Self, PropsError> {
        let props: Self = serde_yaml_ng::from_str(yaml)?;
        props.validate()
    }

    fn validate(self) -> Result<Self, PropsError> {
        if self.tp_varname.trim().is_empty() {
            return Err(PropsError::MissingVarName);
        }
        Ok(self)
    }

    /// Set the widget identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the structured list of values.
    #[must_use]
    pub fn with_lov(mut self, lov: Vec<RawLovEntry>) -> Self {
        self.lov = Some(lov);
        self
    }

    /// Set the serialized fallback list of values.
    #[must_use]
    pub fn with_default_lov(mut self, default_lov: impl Into<String>) -> Self {
        self.default_lov = Some(default_lov.into());
        self
    }

    /// Set the controlled value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<SelectionValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the serialized default value.
    #[must_use]
    pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Enable or disable filtering.
    #[must_use]
    pub const fn with_filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    /// Enable or disable multiple selection.
    #[must_use]
    pub const fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Set the propagate flag.
    #[must_use]
    pub const fn with_propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    /// Set whether clicks are accepted.
    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Set the extra variables refreshed on mount.
    #[must_use]
    pub fn with_update_vars(mut self, names: Vec<String>) -> Self {
        self.tp_updatevars = names;
        self
    }

    /// Set the extra CSS class.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Selection mode implied by `multiple`.
    #[must_use]
    pub const fn mode(&self) -> SelectMode {
        SelectMode::from_multiple(self.multiple)
    }

    /// Variable names to request on mount: the bound variable first.
    #[must_use]
    pub fn binding_names(&self) -> Vec<String> {
        std::iter::once(self.tp_varname.clone())
            .chain(self.tp_updatevars.iter().cloned())
            .collect()
    }

    /// Key the normalized list is memoized under.
    #[must_use]
    pub fn lov_key(&self) -> LovKey {
        (self.lov.clone(), self.default_lov.clone())
    }
}

/// Inputs of list normalization.
pub type LovKey = (Option<Vec<RawLovEntry>>, Option<String>);

/// Visual style of a selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorStyle {
    /// Height of one row
    pub row_height: f32,
    /// Height of the search field
    pub search_height: f32,
    /// Inner padding of rows and search field
    pub padding: f32,
    /// Side of the checkbox in multi rows
    pub checkbox_size: f32,
    /// Side of image items
    pub image_size: f32,
    /// Text size
    pub text_size: f32,
    /// Preferred width
    pub max_width: f32,
    /// Background
    pub background: Color,
    /// Text color
    pub text_color: Color,
    /// Selected row background
    pub selected_color: Color,
    /// Keyboard-focused row outline
    pub focus_color: Color,
    /// Checked checkbox fill
    pub checked_color: Color,
    /// Unchecked checkbox fill
    pub box_color: Color,
    /// Check mark
    pub check_color: Color,
    /// Search field border
    pub border_color: Color,
    /// Search field placeholder
    pub placeholder_color: Color,
}

impl Default for SelectorStyle {
    fn default() -> Self {
        Self {
            row_height: 48.0,
            search_height: 40.0,
            padding: 8.0,
            checkbox_size: 18.0,
            image_size: 32.0,
            text_size: 16.0,
            max_width: 360.0,
            background: Color::WHITE,
            text_color: Color::new(0.13, 0.13, 0.13, 1.0),
            selected_color: Color::new(0.1, 0.46, 0.82, 0.12),
            focus_color: Color::new(0.2, 0.6, 1.0, 1.0),
            checked_color: Color::new(0.1, 0.46, 0.82, 1.0),
            box_color: Color::new(0.75, 0.75, 0.75, 1.0),
            check_color: Color::WHITE,
            border_color: Color::new(0.8, 0.8, 0.8, 1.0),
            placeholder_color: Color::new(0.45, 0.45, 0.45, 1.0),
        }
    }
}

impl SelectorStyle {
    /// Default style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set row height (at least 16).
    #[must_use]
    pub fn row_height(mut self, height: f32) -> Self {
        self.row_height = height.max(16.0);
        self
    }

    /// Set search field height (at least 16).
    #[must_use]
    pub fn search_height(mut self, height: f32) -> Self {
        self.search_height = height.max(16.0);
        self
    }

    /// Set padding.
    #[must_use]
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Set checkbox size (at least 8).
    #[must_use]
    pub fn checkbox_size(mut self, size: f32) -> Self {
        self.checkbox_size = size.max(8.0);
        self
    }

    /// Set image size (at least 8).
    #[must_use]
    pub fn image_size(mut self, size: f32) -> Self {
        self.image_size = size.max(8.0);
        self
    }

    /// Set text size (at least 6).
    #[must_use]
    pub fn text_size(mut self, size: f32) -> Self {
        self.text_size = size.max(6.0);
        self
    }

    /// Set preferred width.
    #[must_use]
    pub fn max_width(mut self, width: f32) -> Self {
        self.max_width = width.max(0.0);
        self
    }

    /// Set background color.
    #[must_use]
    pub const fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set text color.
    #[must_use]
    pub const fn text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Set selected row color.
    #[must_use]
    pub const fn selected_color(mut self, color: Color) -> Self {
        self.selected_color = color;
        self
    }

    /// Set checked checkbox color.
    #[must_use]
    pub const fn checked_color(mut self, color: Color) -> Self {
        self.checked_color = color;
        self
    }

    /// Row height, grown to fit the checkbox or image a row holds.
    #[must_use]
    pub fn effective_row_height(&self) -> f32 {
        self.row_height
            .max(self.checkbox_size + self.padding)
            .max(self.image_size + self.padding)
    }
}
