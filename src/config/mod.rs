//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::AboutConfig;
pub use site::HighlightConfig;
pub use site::HomeConfig;
pub use site::MenuItem;
pub use site::NewsletterConfig;
