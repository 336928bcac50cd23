//! Core types and traits for picklist widgets.
//!
//! This crate provides the foundation the selector widgets are built on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`] with WCAG contrast calculations
//! - Layout constraints: [`Constraints`]
//! - Input events: [`Event`], [`Key`], [`MouseButton`]
//! - The [`Widget`], [`Brick`] and [`Canvas`] traits, plus [`RecordingCanvas`]
//! - The list-of-values model: [`lov`], [`SelectionValue`], [`Selection`],
//!   [`Memo`] and the outward [`UpdateSink`] protocol

pub mod brick;
mod canvas;
mod color;
mod constraints;
pub mod error;
mod event;
mod geometry;
pub mod lov;
mod memo;
mod selection;
pub mod update;
mod value;
pub mod widget;

pub use brick::{Brick, BrickAssertion, BrickBudget, BrickVerification};
pub use canvas::{DrawCommand, RecordingCanvas};
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use error::LovError;
pub use event::{Event, Key, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use lov::{Icon, ListItem, LovEntry, RawLovEntry};
pub use memo::Memo;
pub use selection::{initial_ids, SelectMode, Selection};
pub use update::{ChannelSink, NullSink, RecordingSink, UpdateMessage, UpdateSink};
pub use value::SelectionValue;
pub use widget::{
    AccessibleRole, Canvas, FontWeight, LayoutResult, TextStyle, TypeId, Widget,
};
