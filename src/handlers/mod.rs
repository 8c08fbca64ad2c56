//! HTTP handlers. `entity` serves every resource generically; the rest add filtered lists,
//! link-aware writes and view analytics.

pub mod blog_posts;
pub mod blog_views;
pub mod entity;
pub mod jobs;
