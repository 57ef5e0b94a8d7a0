//! Handler modules, one per resource.

pub mod breeds;
pub mod moderation;
pub mod scans;
