//! List-of-values (LOV) model and normalization.
//!
//! A selector receives its options either as a structured list of raw
//! `[id, item]` entries or as a serialized fallback string of the same shape.
//! [`normalize`] turns whichever source is present into an ordered list of
//! [`LovEntry`] values and never fails: malformed input degrades to an empty
//! list or to a literal passthrough of the raw text.
//!
//! ```
//! use picklist_core::lov::{normalize, ListItem};
//!
//! let entries = normalize(None, Some(r#"[["fr", "France"], ["de", null]]"#));
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[0].item, ListItem::text("France"));
//! // A missing label displays the identifier itself
//! assert_eq!(entries[1].item, ListItem::text("de"));
//! ```

use crate::error::parse_json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An image reference: a path or URI plus its alternative text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Icon {
    /// Image path or URI
    pub path: String,
    /// Alternative text, also used for filtering
    #[serde(default)]
    pub text: String,
}

/// Display unit of one entry: a text label or an image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    /// Plain text label
    Text(String),
    /// Image with alt text
    Image(Icon),
}

impl ListItem {
    /// Create a text item.
    #[must_use]
    pub fn text(label: impl Into<String>) -> Self {
        Self::Text(label.into())
    }

    /// Create an image item.
    #[must_use]
    pub fn image(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Image(Icon {
            path: path.into(),
            text: text.into(),
        })
    }

    /// Whether this item can stand in as a label (non-empty text or any image).
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(label) => !label.is_empty(),
            Self::Image(_) => true,
        }
    }

    /// Decode an item from JSON, returning `None` for falsy values
    /// (`null`, `false`, `0`, `""`) and shapes that carry no label.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(label) if !label.is_empty() => Some(Self::Text(label.clone())),
            Value::Bool(true) => Some(Self::text("true")),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(Self::Text(n.to_string())),
            Value::Object(map) => match (map.get("path"), map.get("text")) {
                (Some(Value::String(path)), text) => Some(Self::image(
                    path.clone(),
                    text.and_then(Value::as_str).unwrap_or_default(),
                )),
                (_, Some(Value::String(text))) if !text.is_empty() => Some(Self::Text(text.clone())),
                _ => None,
            },
            _ => None,
        }
    }
}

/// One unvalidated element of a structured list.
///
/// Decoded from any JSON value: `[id, item]` pairs, `[id]`, bare scalars (the
/// scalar is the id) or `null` (no id).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct RawLovEntry {
    /// Identifier, if the entry has a usable one
    pub id: Option<String>,
    /// Explicit display item, if present and truthy
    pub item: Option<ListItem>,
}

impl RawLovEntry {
    /// Entry with an id and no explicit item.
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            item: None,
        }
    }

    /// Entry with an id and an explicit item.
    #[must_use]
    pub fn with_item(id: impl Into<String>, item: ListItem) -> Self {
        Self {
            id: Some(id.into()),
            item: Some(item),
        }
    }

    fn to_entry(&self) -> Option<LovEntry> {
        let Some(id) = self.id.as_ref() else {
            tracing::debug!("skipping list entry without an identifier");
            return None;
        };
        let item = self
            .item
            .clone()
            .filter(ListItem::is_truthy)
            .unwrap_or_else(|| ListItem::Text(id.clone()));
        Some(LovEntry {
            id: id.clone(),
            item,
        })
    }
}

fn id_from_json(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<Value> for RawLovEntry {
    fn from(value: Value) -> Self {
        match &value {
            Value::Array(parts) => Self {
                id: parts.first().and_then(id_from_json),
                item: parts.get(1).and_then(ListItem::from_json),
            },
            other => Self {
                id: id_from_json(other),
                item: None,
            },
        }
    }
}

impl From<RawLovEntry> for Value {
    fn from(entry: RawLovEntry) -> Self {
        let id = entry.id.map_or(Self::Null, Self::String);
        match entry.item {
            Some(item) => Self::Array(vec![id, serde_json::to_value(item).unwrap_or_default()]),
            None => Self::Array(vec![id]),
        }
    }
}

/// A validated entry: unique identifier plus its display item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LovEntry {
    /// Identifier reported on selection
    pub id: String,
    /// Display item
    pub item: ListItem,
}

impl LovEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(id: impl Into<String>, item: ListItem) -> Self {
        Self {
            id: id.into(),
            item,
        }
    }

    /// Text shown for (and searched in) this entry.
    ///
    /// Image alt text or the label, falling back to the id when empty.
    #[must_use]
    pub fn display_text(&self) -> &str {
        let text = match &self.item {
            ListItem::Text(label) => label.as_str(),
            ListItem::Image(icon) => icon.text.as_str(),
        };
        if text.is_empty() {
            &self.id
        } else {
            text
        }
    }

    /// Case-insensitive substring match against an already lowercased needle.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty() || self.display_text().to_lowercase().contains(needle)
    }
}

/// Normalize the structured list, or the serialized fallback when the
/// structured list is absent.
///
/// A structured list that is present, even empty, always wins.
#[must_use]
pub fn normalize(lov: Option<&[RawLovEntry]>, default_lov: Option<&str>) -> Vec<LovEntry> {
    if let Some(entries) = lov {
        return normalize_entries(entries);
    }
    default_lov.map_or_else(Vec::new, |raw| normalize_entries(&parse_default_lov(raw)))
}

/// Decode a serialized fallback list.
///
/// Text that is not JSON is taken as the JSON string it spells, which decodes
/// to a single entry whose id is the raw text.
#[must_use]
pub fn parse_default_lov(raw: &str) -> Vec<RawLovEntry> {
    let value = parse_json(raw).unwrap_or_else(|err| {
        tracing::debug!(%err, "list of values is not JSON, using raw text");
        Value::String(raw.to_string())
    });
    match value {
        Value::Array(items) => items.into_iter().map(RawLovEntry::from).collect(),
        Value::Null => Vec::new(),
        other => vec![RawLovEntry::from(other)],
    }
}

fn normalize_entries(entries: &[RawLovEntry]) -> Vec<LovEntry> {
    match entries.first() {
        None => Vec::new(),
        Some(first) if first.id.is_none() => {
            tracing::warn!(
                len = entries.len(),
                "malformed list of values: first entry has no identifier"
            );
            Vec::new()
        }
        Some(_) => entries.iter().filter_map(RawLovEntry::to_entry).collect(),
    }
}

/// Indices of the entries whose display text contains `search`,
/// case-insensitively. An empty search matches everything.
#[must_use]
pub fn filter_indices(entries: &[LovEntry], search: &str) -> Vec<usize> {
    let needle = search.to_lowercase();
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.matches_lowercase(&needle))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    // =========================================================================
    // ListItem decoding
    // =========================================================================

    #[test]
    fn test_list_item_from_json_text() {
        assert_eq!(ListItem::from_json(&json!("Apple")), Some(ListItem::text("Apple")));
        assert_eq!(ListItem::from_json(&json!(42)), Some(ListItem::text("42")));
    }

    #[test]
    fn test_list_item_from_json_falsy() {
        for value in [json!(null), json!(""), json!(false), json!(0), json!([1])] {
            assert_eq!(ListItem::from_json(&value), None, "{value}");
        }
    }

    #[test]
    fn test_list_item_from_json_image() {
        let item = ListItem::from_json(&json!({"path": "/flags/fr.png", "text": "France"}));
        assert_eq!(item, Some(ListItem::image("/flags/fr.png", "France")));

        let item = ListItem::from_json(&json!({"path": "/flags/de.png"}));
        assert_eq!(item, Some(ListItem::image("/flags/de.png", "")));
    }

    #[test]
    fn test_list_item_serde_untagged() {
        let text: ListItem = serde_json::from_str(r#""Label""#).unwrap();
        assert_eq!(text, ListItem::text("Label"));
        let image: ListItem = serde_json::from_str(r#"{"path": "/x.png"}"#).unwrap();
        assert_eq!(image, ListItem::image("/x.png", ""));
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""Label""#);
    }

    // =========================================================================
    // RawLovEntry decoding
    // =========================================================================

    #[test]
    fn test_raw_entry_pair() {
        let entry: RawLovEntry = serde_json::from_value(json!(["id1", "Label"])).unwrap();
        assert_eq!(entry, RawLovEntry::with_item("id1", ListItem::text("Label")));
    }

    #[test]
    fn test_raw_entry_scalar_is_id() {
        let entry: RawLovEntry = serde_json::from_value(json!("solo")).unwrap();
        assert_eq!(entry, RawLovEntry::id("solo"));

        let entry: RawLovEntry = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(entry, RawLovEntry::id("7"));
    }

    #[test]
    fn test_raw_entry_missing_id() {
        let entry: RawLovEntry = serde_json::from_value(json!([null, "Label"])).unwrap();
        assert!(entry.id.is_none());
        let entry: RawLovEntry = serde_json::from_value(json!([])).unwrap();
        assert!(entry.id.is_none());
    }

    #[test]
    fn test_raw_entry_serializes_as_pair() {
        let value = serde_json::to_value(RawLovEntry::with_item("a", ListItem::text("A"))).unwrap();
        assert_eq!(value, json!(["a", "A"]));
        let value = serde_json::to_value(RawLovEntry::id("b")).unwrap();
        assert_eq!(value, json!(["b"]));
    }

    // =========================================================================
    // Normalization
    // =========================================================================

    #[test]
    fn test_normalize_structured_preserves_order() {
        let lov = vec![
            RawLovEntry::with_item("c", ListItem::text("Cherry")),
            RawLovEntry::id("a"),
            RawLovEntry::with_item("b", ListItem::image("/b.png", "Banana")),
        ];
        let entries = normalize(Some(lov.as_slice()), None);
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(entries[1].item, ListItem::text("a"));
        assert_eq!(entries[2].item, ListItem::image("/b.png", "Banana"));
    }

    #[test]
    fn test_normalize_empty_label_falls_back_to_id() {
        let lov = vec![RawLovEntry::with_item("x", ListItem::text(""))];
        assert_eq!(normalize(Some(lov.as_slice()), None)[0].item, ListItem::text("x"));
    }

    #[test]
    fn test_normalize_malformed_first_entry_is_empty() {
        let lov = vec![
            RawLovEntry {
                id: None,
                item: Some(ListItem::text("orphan")),
            },
            RawLovEntry::id("b"),
            RawLovEntry::id("c"),
        ];
        assert!(normalize(Some(lov.as_slice()), None).is_empty());
    }

    #[test]
    fn test_normalize_later_entry_without_id_is_skipped() {
        let lov = vec![RawLovEntry::id("a"), RawLovEntry::default(), RawLovEntry::id("c")];
        let ids: Vec<_> = normalize(Some(lov.as_slice()), None)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_normalize_structured_wins_over_fallback() {
        let entries = normalize(Some(&[]), Some(r#"[["a", "A"]]"#));
        assert!(entries.is_empty());
    }

    #[test]
    fn test_normalize_fallback_json() {
        let entries = normalize(None, Some(r#"[["a", "Alpha"], ["b"], "c"]"#));
        assert_eq!(
            entries,
            vec![
                LovEntry::new("a", ListItem::text("Alpha")),
                LovEntry::new("b", ListItem::text("b")),
                LovEntry::new("c", ListItem::text("c")),
            ]
        );
    }

    #[test]
    fn test_normalize_fallback_unparseable_passes_through() {
        let entries = normalize(None, Some("[broken"));
        assert_eq!(entries, vec![LovEntry::new("[broken", ListItem::text("[broken"))]);
    }

    #[test]
    fn test_normalize_fallback_null_is_empty() {
        assert!(normalize(None, Some("null")).is_empty());
    }

    #[test]
    fn test_normalize_nothing() {
        assert!(normalize(None, None).is_empty());
    }

    // =========================================================================
    // Display text and filtering
    // =========================================================================

    #[test]
    fn test_display_text() {
        assert_eq!(LovEntry::new("id", ListItem::text("Label")).display_text(), "Label");
        assert_eq!(LovEntry::new("id", ListItem::image("/p.png", "Alt")).display_text(), "Alt");
        assert_eq!(LovEntry::new("id", ListItem::image("/p.png", "")).display_text(), "id");
    }

    #[test]
    fn test_filter_indices_case_insensitive() {
        let entries = vec![
            LovEntry::new("apple", ListItem::text("apple")),
            LovEntry::new("banana", ListItem::text("banana")),
        ];
        assert_eq!(filter_indices(&entries, "an"), vec![1]);
        assert_eq!(filter_indices(&entries, "AN"), vec![1]);
        assert_eq!(filter_indices(&entries, ""), vec![0, 1]);
        assert!(filter_indices(&entries, "kiwi").is_empty());
    }

    #[test]
    fn test_filter_searches_image_alt_text() {
        let entries = vec![
            LovEntry::new("fr", ListItem::image("/fr.png", "France")),
            LovEntry::new("de", ListItem::image("/de.png", "Germany")),
        ];
        assert_eq!(filter_indices(&entries, "germ"), vec![1]);
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn arb_entries() -> impl Strategy<Value = Vec<RawLovEntry>> {
        prop::collection::vec(("[a-z]{1,8}", prop::option::of("[A-Za-z ]{0,8}")), 1..20).prop_map(
            |pairs| {
                pairs
                    .into_iter()
                    .map(|(id, label)| RawLovEntry {
                        id: Some(id),
                        item: label.map(ListItem::Text),
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_normalize_preserves_order_and_count(lov in arb_entries()) {
            let entries = normalize(Some(lov.as_slice()), None);
            prop_assert_eq!(entries.len(), lov.len());
            for (raw, entry) in lov.iter().zip(&entries) {
                prop_assert_eq!(raw.id.as_ref(), Some(&entry.id));
                match raw.item.as_ref().filter(|item| item.is_truthy()) {
                    Some(item) => prop_assert_eq!(item, &entry.item),
                    None => prop_assert_eq!(&entry.item, &ListItem::Text(entry.id.clone())),
                }
            }
        }

        #[test]
        fn prop_normalize_first_missing_id_is_empty(mut lov in arb_entries()) {
            lov[0].id = None;
            prop_assert!(normalize(Some(lov.as_slice()), None).is_empty());
        }

        #[test]
        fn prop_normalize_idempotent(lov in arb_entries()) {
            prop_assert_eq!(normalize(Some(lov.as_slice()), None), normalize(Some(lov.as_slice()), None));
        }

        #[test]
        fn prop_fallback_never_panics(raw in ".*") {
            let _ = normalize(None, Some(raw.as_str()));
        }

        #[test]
        fn prop_filter_is_subset_in_order(lov in arb_entries(), search in "[a-z]{0,2}") {
            let entries = normalize(Some(lov.as_slice()), None);
            let visible = filter_indices(&entries, &search);
            prop_assert!(visible.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(visible.iter().all(|&i| i < entries.len()));
        }
    }
}
