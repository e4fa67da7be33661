//! Helper functions shared by views, templates, and the static generator

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
