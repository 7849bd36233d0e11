//! biomap-render: colour theme and Leaflet HTML output.
//!
//! [`Theme`] supplies the techno palette consumed by
//! [`biomap_core::build_model`]; [`render_html`] turns the finished
//! [`biomap_core::MapModel`] into one self-contained HTML document.

pub mod html;
pub mod theme;

pub use html::{render_html, render_html_at};
pub use theme::Theme;
