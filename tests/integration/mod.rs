//! Integration tests for sitemap building, per-session projection and navigation

mod cli_parse;
mod navigation_flow;
mod redirect_chains;
mod sitemap_build;
mod support;
mod user_sitemap;
