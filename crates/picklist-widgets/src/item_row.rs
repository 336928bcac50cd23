//! Stateless row renderers for selector entries.
//!
//! A row maps one [`LovEntry`] plus its selection state to draw commands and
//! HTML. Single rows highlight when selected; multiple rows carry a
//! checkbox that mirrors membership and is never a click target of its own.

use crate::html::escape_html;
use crate::props::SelectorStyle;
use picklist_core::{
    widget::TextStyle, Canvas, ListItem, LovEntry, Point, Rect, SelectMode,
};

/// Row renderer for one entry.
#[derive(Debug, Clone, Copy)]
pub struct ItemRow<'a> {
    entry: &'a LovEntry,
    variant: SelectMode,
    selected: bool,
    focused: bool,
}

impl<'a> ItemRow<'a> {
    /// Single-select row.
    #[must_use]
    pub const fn single(entry: &'a LovEntry, selected: bool) -> Self {
        Self {
            entry,
            variant: SelectMode::Single,
            selected,
            focused: false,
        }
    }

    /// Multi-select row with a checkbox.
    #[must_use]
    pub const fn multiple(entry: &'a LovEntry, checked: bool) -> Self {
        Self {
            entry,
            variant: SelectMode::Multiple,
            selected: checked,
            focused: false,
        }
    }

    /// Row for `mode`.
    #[must_use]
    pub const fn for_mode(mode: SelectMode, entry: &'a LovEntry, selected: bool) -> Self {
        match mode {
            SelectMode::Single => Self::single(entry, selected),
            SelectMode::Multiple => Self::multiple(entry, selected),
        }
    }

    /// Mark the row as keyboard-focused.
    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// The entry this row shows.
    #[must_use]
    pub const fn entry(&self) -> &'a LovEntry {
        self.entry
    }

    /// Whether the row is selected (single) or checked (multiple).
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Paint the row into `bounds`.
    pub fn paint(&self, canvas: &mut dyn Canvas, bounds: Rect, style: &SelectorStyle) {
        if self.variant == SelectMode::Single && self.selected {
            canvas.fill_rect(bounds, style.selected_color);
        }
        if self.focused {
            canvas.stroke_rect(bounds, style.focus_color, 1.0);
        }

        let mut content_x = bounds.x + style.padding;
        if self.variant == SelectMode::Multiple {
            self.paint_checkbox(canvas, bounds, style);
            content_x += style.checkbox_size + style.padding;
        }

        match &self.entry.item {
            ListItem::Text(label) => {
                let text_style = TextStyle {
                    size: style.text_size,
                    color: style.text_color,
                    ..TextStyle::default()
                };
                let y = bounds.y + (bounds.height - style.text_size) / 2.0;
                canvas.draw_text(label, Point::new(content_x, y), &text_style);
            }
            ListItem::Image(icon) => {
                let image_rect = Rect::new(
                    content_x,
                    bounds.y + (bounds.height - style.image_size) / 2.0,
                    style.image_size,
                    style.image_size,
                );
                canvas.draw_image(&icon.path, self.entry.display_text(), image_rect);
            }
        }
    }

    fn paint_checkbox(&self, canvas: &mut dyn Canvas, bounds: Rect, style: &SelectorStyle) {
        let size = style.checkbox_size;
        let box_rect = Rect::new(
            bounds.x + style.padding,
            bounds.y + (bounds.height - size) / 2.0,
            size,
            size,
        );
        if self.selected {
            canvas.fill_rect(box_rect, style.checked_color);
            let inner = Rect::new(
                size.mul_add(0.25, box_rect.x),
                size.mul_add(0.25, box_rect.y),
                size * 0.5,
                size * 0.5,
            );
            canvas.fill_rect(inner, style.check_color);
        } else {
            canvas.stroke_rect(box_rect, style.box_color, 2.0);
        }
    }

    /// Render the row as an `<li>` element.
    #[must_use]
    pub fn to_html(&self) -> String {
        let id = escape_html(&self.entry.id);
        let content = match &self.entry.item {
            ListItem::Text(label) => {
                format!(r#"<span class="picklist-text">{}</span>"#, escape_html(label))
            }
            ListItem::Image(icon) => format!(
                r#"<img class="picklist-avatar" src="{}" alt="{}"/>"#,
                escape_html(&icon.path),
                escape_html(self.entry.display_text()),
            ),
        };
        let selected = if self.selected { "true" } else { "false" };
        match self.variant {
            SelectMode::Single => {
                let class = if self.selected {
                    "picklist-item selected"
                } else {
                    "picklist-item"
                };
                format!(
                    r#"<li class="{class}" role="option" data-id="{id}" aria-selected="{selected}">{content}</li>"#
                )
            }
            SelectMode::Multiple => {
                let checked = if self.selected { " checked" } else { "" };
                format!(
                    r#"<li class="picklist-item dense" role="option" data-id="{id}" aria-selected="{selected}"><input type="checkbox" tabindex="-1"{checked}/>{content}</li>"#
                )
            }
        }
    }
}
