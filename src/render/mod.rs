//! Turning an [`crate::output::Output`] into what Alfred displays.

pub mod alfred;
pub mod highlight;
pub mod html;

pub use alfred::{AlfredFeedback, AlfredItem, AlfredText};
pub use highlight::Highlighter;
pub use html::HtmlRenderer;
