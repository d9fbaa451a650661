//! Rendering layer.
//!
//! - `html.rs`: escaping and table building blocks
//! - `sections.rs`: one pure renderer per dashboard section
//! - `targets.rs`: logical slots and injected sinks

pub mod html;
pub mod sections;
pub mod targets;

pub use html::escape_html;
pub use sections::{
    no_expiring_message, render_editions, render_error_banner, render_expiring_licenses,
    render_summary, render_top_clients, render_top_modules, render_trends, NO_DATA_MESSAGE,
};
pub use targets::{OutputTargets, Slot};
