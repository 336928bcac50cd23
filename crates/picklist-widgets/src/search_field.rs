//! Search field that edits the selector's filter text.

use crate::html::escape_html;
use picklist_core::{
    widget::{AccessibleRole, LayoutResult, TextStyle},
    Brick, BrickAssertion, BrickBudget, BrickVerification, Canvas, Color, Constraints, Event,
    Key, Point, Rect, Size, TypeId, Widget,
};
use std::any::Any;
use std::time::Duration;

/// Message emitted when the search text changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchChanged {
    /// The new search text
    pub text: String,
}

/// Single-line search input.
///
/// The cursor is a character index, so multi-byte input edits whole
/// characters.
#[derive(Debug, Clone)]
pub struct SearchField {
    text: String,
    placeholder: String,
    text_style: TextStyle,
    placeholder_color: Color,
    background_color: Color,
    border_color: Color,
    focus_border_color: Color,
    padding: f32,
    min_width: f32,
    test_id_value: Option<String>,
    bounds: Rect,
    focused: bool,
    cursor: usize,
}

impl Default for SearchField {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchField {
    /// Create an empty search field.
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: String::new(),
            placeholder: "Search field".to_string(),
            text_style: TextStyle::default(),
            placeholder_color: Color::new(0.45, 0.45, 0.45, 1.0),
            background_color: Color::WHITE,
            border_color: Color::new(0.8, 0.8, 0.8, 1.0),
            focus_border_color: Color::new(0.2, 0.6, 1.0, 1.0),
            padding: 8.0,
            min_width: 120.0,
            test_id_value: None,
            bounds: Rect::default(),
            focused: false,
            cursor: 0,
        }
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Set text style.
    #[must_use]
    pub fn text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    /// Set placeholder color.
    #[must_use]
    pub const fn placeholder_color(mut self, color: Color) -> Self {
        self.placeholder_color = color;
        self
    }

    /// Set background color.
    #[must_use]
    pub const fn background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set border colors (idle, focused).
    #[must_use]
    pub const fn border_colors(mut self, idle: Color, focused: Color) -> Self {
        self.border_color = idle;
        self.focus_border_color = focused;
        self
    }

    /// Set padding.
    #[must_use]
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Current search text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    #[must_use]
    pub const fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Whether the field has keyboard focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Give or take keyboard focus.
    pub fn set_focused(&mut self, focused: bool) {
        if focused && !self.focused {
            self.cursor = self.char_len();
        }
        self.focused = focused;
    }

    /// Clear the text. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        self.cursor = 0;
        !std::mem::take(&mut self.text).is_empty()
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn insert_text(&mut self, input: &str) -> bool {
        let mut changed = false;
        for c in input.chars().filter(|c| !c.is_control()) {
            let at = self.byte_index(self.cursor);
            self.text.insert(at, c);
            self.cursor += 1;
            changed = true;
        }
        changed
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    fn changed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(SearchChanged {
            text: self.text.clone(),
        }))
    }
}

impl Widget for SearchField {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let height = 2.0f32.mul_add(self.padding, self.text_style.size);
        let width = self.min_width.max(constraints.min_width);
        constraints.constrain(Size::new(width, height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.bounds, self.background_color);
        let border_color = if self.focused {
            self.focus_border_color
        } else {
            self.border_color
        };
        canvas.stroke_rect(self.bounds, border_color, 1.0);

        let position = Point::new(self.bounds.x + self.padding, self.bounds.y + self.padding);
        if self.text.is_empty() {
            let style = TextStyle {
                color: self.placeholder_color,
                ..self.text_style.clone()
            };
            canvas.draw_text(&self.placeholder, position, &style);
        } else {
            canvas.draw_text(&self.text, position, &self.text_style);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseDown { position, .. } => {
                self.set_focused(self.bounds.contains_point(position));
            }
            Event::FocusIn => self.set_focused(true),
            Event::FocusOut => self.focused = false,
            Event::TextInput { text } if self.focused => {
                if self.insert_text(text) {
                    return self.changed();
                }
            }
            Event::KeyDown { key } if self.focused => match key {
                Key::Backspace if self.backspace() => return self.changed(),
                Key::Delete if self.delete() => return self.changed(),
                Key::Escape if self.clear() => return self.changed(),
                Key::Left => self.cursor = self.cursor.saturating_sub(1),
                Key::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
                Key::Home => self.cursor = 0,
                Key::End => self.cursor = self.char_len(),
                _ => {}
            },
            _ => {}
        }
        None
    }

    fn children(&self) -> &[Box<dyn Widget>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut []
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.placeholder)
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::TextInput
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Brick for SearchField {
    fn brick_name(&self) -> &'static str {
        "SearchField"
    }

    fn assertions(&self) -> &[BrickAssertion] {
        &[BrickAssertion::Focusable, BrickAssertion::MaxLatencyMs(16)]
    }

    fn budget(&self) -> BrickBudget {
        BrickBudget::uniform(16)
    }

    fn verify(&self) -> BrickVerification {
        BrickVerification {
            passed: self.assertions().to_vec(),
            failed: vec![],
            verification_time: Duration::from_micros(10),
        }
    }

    fn to_html(&self) -> String {
        let test_id = self.test_id_value.as_deref().unwrap_or("search");
        format!(
            r#"<input type="search" class="picklist-search" data-testid="{}" placeholder="{}" aria-label="{}" value="{}"/>"#,
            escape_html(test_id),
            escape_html(&self.placeholder),
            escape_html(&self.placeholder),
            escape_html(&self.text),
        )
    }

    fn to_css(&self) -> String {
        ".picklist-search { display: block; margin: 8px 0; }".into()
    }
}
