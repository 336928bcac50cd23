//! `Selector` widget: a list of values bound to a backend variable.
//!
//! The selector derives its entries from the `lov`/`defaultLov` props, keeps
//! the selected ids locally, optionally filters rows through a search field,
//! and reports every click to the application's [`UpdateSink`].
//!
//! ```
//! use std::sync::Arc;
//! use picklist_core::{RecordingSink, SelectionValue, UpdateMessage};
//! use picklist_widgets::{Selector, SelectorProps};
//!
//! let sink = Arc::new(RecordingSink::new());
//! let props = SelectorProps::new("fruit").with_default_lov(r#"[["a", "Apple"], ["b", "Banana"]]"#);
//! let mut selector = Selector::new(props, sink.clone());
//! selector.mount();
//!
//! selector.click_id("b");
//! assert_eq!(selector.selected_ids(), ["b"]);
//! assert_eq!(
//!     sink.last(),
//!     Some(UpdateMessage::SendUpdate {
//!         name: "fruit".into(),
//!         value: SelectionValue::from("b"),
//!         propagate: true,
//!     })
//! );
//! ```

use crate::html::escape_html;
use crate::item_row::ItemRow;
use crate::props::{LovKey, SelectorProps, SelectorStyle};
use crate::search_field::{SearchChanged, SearchField};
use picklist_core::{
    lov,
    widget::{AccessibleRole, LayoutResult, TextStyle},
    Brick, BrickAssertion, BrickBudget, BrickVerification, Canvas, Constraints, Event, Key,
    ListItem, LovEntry, Memo, MouseButton, Point, Rect, SelectMode, Selection, SelectionValue, Size,
    TypeId, UpdateMessage, UpdateSink, Widget,
};
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Message emitted when a click changes the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorChanged {
    /// Value reported to the bound variable
    pub value: SelectionValue,
}

const ASSERTIONS: &[BrickAssertion] = &[
    BrickAssertion::TextVisible,
    BrickAssertion::ContrastRatio(4.5),
    BrickAssertion::MaxLatencyMs(16),
];

/// Selectable list of values.
pub struct Selector {
    props: SelectorProps,
    style: SelectorStyle,
    sink: Arc<dyn UpdateSink>,
    entries: Memo<LovKey, Vec<LovEntry>>,
    selection: Selection,
    search: SearchField,
    /// Indices into the entries of the rows currently shown
    visible: Vec<usize>,
    /// Keyboard focus, as an index into `visible`
    focused_row: Option<usize>,
    scroll_offset: f32,
    bounds: Rect,
    list_bounds: Rect,
    mounted: bool,
    test_id_value: Option<String>,
}

impl Selector {
    /// Create a selector reporting to `sink`.
    ///
    /// Nothing is dispatched until [`Selector::mount`].
    #[must_use]
    pub fn new(props: SelectorProps, sink: Arc<dyn UpdateSink>) -> Self {
        let mut selection = Selection::new(props.mode());
        selection.sync(props.value.as_ref(), props.default_value.as_deref());
        let style = SelectorStyle::default();
        let mut selector = Self {
            search: search_field_for(&style, None),
            props,
            style,
            sink,
            entries: Memo::new(),
            selection,
            visible: Vec::new(),
            focused_row: None,
            scroll_offset: 0.0,
            bounds: Rect::default(),
            list_bounds: Rect::default(),
            mounted: false,
            test_id_value: None,
        };
        selector.derive_entries();
        selector.refresh_visible();
        selector
    }

    /// Set the visual style.
    #[must_use]
    pub fn style(mut self, style: SelectorStyle) -> Self {
        self.style = style;
        self.search = search_field_for(&self.style, self.test_id_value.as_deref());
        self
    }

    /// Set test ID. The search field gets `<id>-search`.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self.search = search_field_for(&self.style, self.test_id_value.as_deref());
        self
    }

    /// Request the bound variables from the backend. Only the first call
    /// dispatches.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.request_update();
    }

    /// Whether [`Selector::mount`] has run.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Replace the props and re-run whatever depends on the changed ones.
    pub fn set_props(&mut self, props: SelectorProps) {
        let old = std::mem::replace(&mut self.props, props);

        self.derive_entries();

        if old.multiple != self.props.multiple {
            self.selection.set_mode(self.props.mode());
        }
        if old.value != self.props.value || old.default_value != self.props.default_value {
            self.selection
                .sync(self.props.value.as_ref(), self.props.default_value.as_deref());
        }

        let binding_changed = old.id != self.props.id
            || old.tp_varname != self.props.tp_varname
            || old.tp_updatevars != self.props.tp_updatevars;
        if binding_changed && self.mounted {
            self.request_update();
        }

        if old.filter != self.props.filter {
            self.search.set_focused(false);
            let bounds = self.bounds;
            self.layout(bounds);
        }
        self.refresh_visible();
    }

    /// Current props.
    #[must_use]
    pub const fn props(&self) -> &SelectorProps {
        &self.props
    }

    /// All normalized entries, in display order.
    #[must_use]
    pub fn entries(&self) -> &[LovEntry] {
        self.entries.get()
    }

    /// Entries shown after filtering, in display order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &LovEntry> {
        let entries = self.entries.get();
        self.visible.iter().filter_map(move |&i| entries.get(i))
    }

    /// Selection state.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected ids, in selection order.
    #[must_use]
    pub fn selected_ids(&self) -> &[String] {
        self.selection.ids()
    }

    /// Current search text.
    #[must_use]
    pub fn search_text(&self) -> &str {
        self.search.text()
    }

    /// Keyboard-focused row, as a position among the visible rows.
    #[must_use]
    pub const fn focused_row(&self) -> Option<usize> {
        self.focused_row
    }

    /// Whether the search field has keyboard focus.
    #[must_use]
    pub const fn is_search_focused(&self) -> bool {
        self.search.is_focused()
    }

    /// Current vertical scroll offset of the rows.
    #[must_use]
    pub const fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Number of times the entry list has been normalized.
    #[must_use]
    pub const fn derivations(&self) -> u64 {
        self.entries.computations()
    }

    /// Apply a click on the entry `id`, dispatch the new value and return it.
    ///
    /// Returns `None` when the selector is inactive.
    pub fn click_id(&mut self, id: &str) -> Option<SelectionValue> {
        if !self.props.active {
            tracing::debug!(id, "selector inactive, ignoring click");
            return None;
        }
        let value = self.selection.click(id);
        tracing::debug!(name = %self.props.tp_varname, ?value, "sending selection update");
        self.sink.dispatch(UpdateMessage::SendUpdate {
            name: self.props.tp_varname.clone(),
            value: value.clone(),
            propagate: self.props.propagate,
        });
        Some(value)
    }

    fn request_update(&self) {
        let names = self.props.binding_names();
        tracing::debug!(id = ?self.props.id, ?names, "requesting bound variables");
        self.sink.dispatch(UpdateMessage::RequestUpdate {
            id: self.props.id.clone(),
            names,
        });
    }

    fn derive_entries(&mut self) {
        let recomputed = self.entries.update(self.props.lov_key(), |(lov, default_lov)| {
            lov::normalize(lov.as_deref(), default_lov.as_deref())
        });
        if recomputed {
            tracing::debug!(entries = self.entries.get().len(), "list of values derived");
        }
    }

    fn refresh_visible(&mut self) {
        let search = if self.props.filter {
            self.search.text()
        } else {
            ""
        };
        self.visible = lov::filter_indices(self.entries.get(), search);
        if self.focused_row.is_some_and(|row| row >= self.visible.len()) {
            self.focused_row = None;
        }
        self.clamp_scroll();
    }

    fn content_height(&self) -> f32 {
        self.visible.len() as f32 * self.style.effective_row_height()
    }

    fn clamp_scroll(&mut self) {
        let max_scroll = (self.content_height() - self.list_bounds.height).max(0.0);
        self.scroll_offset = self.scroll_offset.clamp(0.0, max_scroll);
    }

    fn row_rect(&self, row: usize) -> Rect {
        let height = self.style.effective_row_height();
        Rect::new(
            self.list_bounds.x,
            (row as f32).mul_add(height, self.list_bounds.y) - self.scroll_offset,
            self.list_bounds.width,
            height,
        )
    }

    fn row_at(&self, position: &Point) -> Option<usize> {
        if !self.list_bounds.contains_point(position) {
            return None;
        }
        let offset = position.y - self.list_bounds.y + self.scroll_offset;
        let row = (offset / self.style.effective_row_height()).floor();
        if row < 0.0 {
            return None;
        }
        let row = row as usize;
        (row < self.visible.len()).then_some(row)
    }

    fn scroll_into_view(&mut self, row: usize) {
        let height = self.style.effective_row_height();
        let top = row as f32 * height;
        let bottom = top + height;
        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if bottom > self.scroll_offset + self.list_bounds.height {
            self.scroll_offset = (bottom - self.list_bounds.height).max(0.0);
        }
    }

    fn focus_row(&mut self, row: usize) {
        self.focused_row = Some(row);
        self.scroll_into_view(row);
    }

    fn activate_row(&mut self, row: usize) -> Option<Box<dyn Any + Send>> {
        let id = self
            .visible
            .get(row)
            .and_then(|&i| self.entries.get().get(i))
            .map(|entry| entry.id.clone())?;
        let value = self.click_id(&id)?;
        Some(Box::new(SelectorChanged { value }))
    }

    fn on_search_event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        let msg = self.search.event(event)?;
        if msg.is::<SearchChanged>() {
            self.focused_row = None;
            self.scroll_offset = 0.0;
            self.refresh_visible();
        }
        Some(msg)
    }

    fn on_list_key(&mut self, key: Key) -> Option<Box<dyn Any + Send>> {
        let last = self.visible.len().checked_sub(1)?;
        match (key, self.focused_row) {
            (Key::Down, None) | (Key::Home, _) => self.focus_row(0),
            (Key::Up, None) | (Key::End, _) => self.focus_row(last),
            (Key::Down, Some(row)) => self.focus_row((row + 1).min(last)),
            (Key::Up, Some(row)) => self.focus_row(row.saturating_sub(1)),
            (Key::Enter | Key::Space, Some(row)) => return self.activate_row(row),
            _ => {}
        }
        None
    }

    fn css_class(&self) -> String {
        match &self.props.class_name {
            Some(extra) if !extra.trim().is_empty() => {
                format!("picklist-selector {}", escape_html(extra.trim()))
            }
            _ => "picklist-selector".to_string(),
        }
    }

    fn estimate_content_width(&self) -> f32 {
        let char_width = self.style.text_size * 0.6;
        let longest = self
            .entries
            .get()
            .iter()
            .map(|entry| match &entry.item {
                ListItem::Text(label) => label.chars().count() as f32 * char_width,
                ListItem::Image(_) => self.style.image_size,
            })
            .fold(0.0f32, f32::max);
        let checkbox = match self.selection.mode() {
            SelectMode::Single => 0.0,
            SelectMode::Multiple => self.style.checkbox_size + self.style.padding,
        };
        2.0f32.mul_add(self.style.padding, longest + checkbox)
    }
}

fn search_field_for(style: &SelectorStyle, test_id: Option<&str>) -> SearchField {
    let field = SearchField::new()
        .padding(style.padding)
        .text_style(TextStyle {
            size: style.text_size,
            color: style.text_color,
            ..TextStyle::default()
        })
        .placeholder_color(style.placeholder_color)
        .background_color(style.background)
        .border_colors(style.border_color, style.focus_color);
    match test_id {
        Some(id) => field.with_test_id(format!("{id}-search")),
        None => field,
    }
}

impl Widget for Selector {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let search = if self.props.filter {
            self.style.search_height
        } else {
            0.0
        };
        let width = self
            .estimate_content_width()
            .min(self.style.max_width)
            .max(constraints.min_width);
        constraints.constrain(Size::new(width, search + self.content_height()))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        if self.props.filter {
            let (search, rest) = bounds.split_top(self.style.search_height);
            self.search.layout(search);
            self.list_bounds = rest;
        } else {
            self.search.layout(Rect::default());
            self.list_bounds = bounds;
        }
        self.clamp_scroll();
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.bounds, self.style.background);
        if self.props.filter {
            self.search.paint(canvas);
        }

        canvas.push_clip(self.list_bounds);
        let mode = self.selection.mode();
        for (row, entry) in self.visible_entries().enumerate() {
            let rect = self.row_rect(row);
            if !rect.intersects(&self.list_bounds) {
                continue;
            }
            ItemRow::for_mode(mode, entry, self.selection.contains(&entry.id))
                .focused(self.focused_row == Some(row))
                .paint(canvas, rect, &self.style);
        }
        canvas.pop_clip();
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                if self.props.filter {
                    self.search.event(event);
                }
                let row = self.row_at(position)?;
                self.focused_row = Some(row);
                self.activate_row(row)
            }
            Event::Scroll { delta_y, .. } => {
                self.scroll_offset -= delta_y * self.style.effective_row_height();
                self.clamp_scroll();
                None
            }
            Event::FocusIn => {
                if self.props.filter {
                    self.search.set_focused(true);
                }
                None
            }
            Event::FocusOut => {
                self.search.set_focused(false);
                self.focused_row = None;
                None
            }
            Event::KeyDown { key: Key::Tab } if self.props.filter => {
                if self.search.is_focused() {
                    self.search.set_focused(false);
                    if !self.visible.is_empty() {
                        self.focus_row(0);
                    }
                } else {
                    self.focused_row = None;
                    self.search.set_focused(true);
                }
                None
            }
            Event::TextInput { .. } | Event::KeyDown { .. } if self.search.is_focused() => {
                self.on_search_event(event)
            }
            Event::KeyDown { key } => self.on_list_key(*key),
            _ => None,
        }
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn is_interactive(&self) -> bool {
        self.props.active
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.props.tp_varname)
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::ListBox
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Brick for Selector {
    fn brick_name(&self) -> &'static str {
        "Selector"
    }

    fn assertions(&self) -> &[BrickAssertion] {
        ASSERTIONS
    }

    fn budget(&self) -> BrickBudget {
        BrickBudget::uniform(16)
    }

    fn verify(&self) -> BrickVerification {
        let start = Instant::now();
        let mut passed = Vec::new();
        let mut failed = Vec::new();
        for assertion in ASSERTIONS {
            let outcome = match assertion {
                BrickAssertion::TextVisible => (self.style.text_color.a > 0.0)
                    .then_some(())
                    .ok_or_else(|| "text color is fully transparent".to_string()),
                BrickAssertion::ContrastRatio(min) => {
                    let ratio = self.style.text_color.contrast_ratio(&self.style.background);
                    (ratio >= *min)
                        .then_some(())
                        .ok_or_else(|| format!("contrast {ratio:.2}:1 below {min}:1"))
                }
                BrickAssertion::MaxLatencyMs(_) | BrickAssertion::Focusable => Ok(()),
            };
            match outcome {
                Ok(()) => passed.push(assertion.clone()),
                Err(reason) => failed.push((assertion.clone(), reason)),
            }
        }
        BrickVerification {
            passed,
            failed,
            verification_time: start.elapsed().max(Duration::from_nanos(1)),
        }
    }

    fn to_html(&self) -> String {
        let mut html = format!(r#"<div class="{}""#, self.css_class());
        if let Some(id) = &self.props.id {
            html.push_str(&format!(r#" id="{}""#, escape_html(id)));
        }
        let test_id = self.test_id_value.as_deref().unwrap_or("selector");
        html.push_str(&format!(r#" data-testid="{}">"#, escape_html(test_id)));

        if self.props.filter {
            html.push_str(&self.search.to_html());
        }

        let multiselectable = self.selection.mode() == SelectMode::Multiple;
        html.push_str(&format!(
            r#"<ul class="picklist-list" role="listbox" aria-label="{}" aria-multiselectable="{multiselectable}">"#,
            escape_html(&self.props.tp_varname),
        ));
        let mode = self.selection.mode();
        for entry in self.visible_entries() {
            html.push_str(&ItemRow::for_mode(mode, entry, self.selection.contains(&entry.id)).to_html());
        }
        html.push_str("</ul></div>");
        html
    }

    fn to_css(&self) -> String {
        format!(
            ".picklist-selector {{ width: 100%; background: {background}; }}\n\
             .picklist-list {{ list-style: none; margin: 0; padding: 0; max-width: {max_width}px; }}\n\
             .picklist-item {{ display: flex; align-items: center; min-height: {row}px; padding: 0 {pad}px; color: {text}; cursor: pointer; }}\n\
             .picklist-item.dense {{ min-height: {dense}px; }}\n\
             .picklist-item.selected {{ background: {selected}; }}\n\
             .picklist-avatar {{ width: {image}px; height: {image}px; border-radius: 50%; }}",
            background = self.style.background.to_hex(),
            max_width = self.style.max_width,
            row = self.style.effective_row_height(),
            dense = self.style.effective_row_height() * 0.75,
            pad = self.style.padding,
            text = self.style.text_color.to_hex(),
            selected = self.style.selected_color.to_hex(),
            image = self.style.image_size,
        )
    }
}
