//! Sitenav: Page-Tree Navigation and Access Control
//!
//! Builds an immutable sitemap of pages from declarative sources, verifies it is
//! free of redirect loops, projects it per session according to what the current
//! subject may see, and drives navigation between pages with cancelable
//! lifecycle notifications.

pub mod access;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod navigation;
pub mod sitemap;
pub mod sort;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod user;
