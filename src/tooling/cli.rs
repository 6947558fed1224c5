//! CLI Tooling
//!
//! `sitenav check`, `sitenav tree` and `sitenav resolve`. Every command builds
//! the master sitemap from the configured sources first.

use crate::access::SessionSubject;
use crate::concurrency::{BuiltSitemapSummary, SitemapPublisher};
use crate::config::{ConfigLoader, SitenavConfig};
use crate::error::SitemapError;
use crate::i18n::{MapTranslator, UnicodeCollator};
use crate::navigation::{HeadlessViews, NavigationOutcome, Navigator};
use crate::sitemap::{DirectSource, FileSource, MasterSitemap};
use crate::tree::{walk, CaptionCollector, MasterNode, NodeCollector};
use crate::types::{Locale, NodeId};
use crate::user::{UserNode, UserSitemap};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Sitenav CLI - page-tree navigation and access control
#[derive(Parser, Debug)]
#[command(name = "sitenav")]
#[command(about = "Check, print and resolve page sitemaps")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory searched for sitenav.toml
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Declaration file for the file source; may be repeated
    #[arg(long = "sitemap", value_name = "FILE")]
    pub sitemaps: Vec<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the sitemap and report consistency problems
    Check {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print every page of the master sitemap
    Tree {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Navigate to a fragment as a simulated subject
    Resolve(ResolveArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Fragment to navigate to, e.g. `private/customer/id=3`
    pub fragment: String,

    #[arg(long)]
    pub authenticated: bool,

    #[arg(long)]
    pub remembered: bool,

    /// Role held by the subject; may be repeated
    #[arg(long = "role")]
    pub roles: Vec<String>,

    /// Permission pattern held by the subject, e.g. `page:view:private:*`
    #[arg(long = "permission")]
    pub permissions: Vec<String>,

    /// Session locale (defaults to the configured locale)
    #[arg(long)]
    pub locale: Option<String>,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Loaded configuration plus the publisher every command builds into
pub struct CliContext {
    config: SitenavConfig,
    direct: DirectSource,
    publisher: Arc<SitemapPublisher>,
}

impl CliContext {
    pub fn new(dir: PathBuf, config_path: Option<PathBuf>, sitemaps: Vec<PathBuf>) -> Result<Self> {
        let mut config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ConfigLoader::load(&dir).context("Failed to load configuration")?,
        };
        if !sitemaps.is_empty() {
            config.sitemap.files.extend(sitemaps);
            if !config.sitemap.sources.iter().any(|s| s == FileSource::NAME) {
                config.sitemap.sources.push(FileSource::NAME.to_string());
            }
        }
        Ok(Self::with_config(config, DirectSource::new()))
    }

    /// Context over an already loaded configuration and in-code declarations
    pub fn with_config(config: SitenavConfig, direct: DirectSource) -> Self {
        Self {
            config,
            direct,
            publisher: Arc::new(SitemapPublisher::new()),
        }
    }

    pub fn config(&self) -> &SitenavConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Check { format } => self.check(format),
            Commands::Tree { format } => self.tree(format),
            Commands::Resolve(args) => self.resolve(args),
        }
    }

    fn build(&self) -> Result<BuiltSitemapSummary, SitemapError> {
        let service = self.config.sitemap.build_service(self.direct.clone());
        self.publisher.build(&service)
    }

    fn check(&self, format: &str) -> Result<String> {
        let built = match self.build() {
            Ok(built) => built,
            Err(SitemapError::Inconsistent { report, loops }) if format == "json" => {
                let body = json!({ "ok": false, "loops": loops, "report": report });
                bail!(serde_json::to_string_pretty(&body)?);
            }
            Err(e) => return Err(e.into()),
        };

        let sitemap = &built.sitemap;
        info!(pages = sitemap.node_count(), "Sitemap check passed");
        if format == "json" {
            let body = json!({
                "ok": true,
                "pages": sitemap.node_count(),
                "redirects": sitemap.redirects().len(),
                "sources": sitemap.sources(),
                "warnings": built.warnings,
            });
            return Ok(serde_json::to_string_pretty(&body)?);
        }

        let mut out = format!(
            "Sitemap OK: {} pages, {} redirects\nSources: {}",
            sitemap.node_count(),
            sitemap.redirects().len(),
            sitemap.sources().join(", ")
        );
        for warning in &built.warnings {
            out.push_str(&format!("\nwarning: {}", warning));
        }
        Ok(out)
    }

    fn tree(&self, format: &str) -> Result<String> {
        let built = self.build()?;
        let sitemap = built.sitemap.as_ref();
        if format == "json" {
            let pages = sitemap.all_nodes();
            let pages: Vec<&MasterNode> = pages.iter().map(|n| n.as_ref()).collect();
            return Ok(serde_json::to_string_pretty(&json!({
                "pages": pages,
                "redirects": sitemap.redirects(),
            }))?);
        }
        Ok(format_tree(sitemap))
    }

    fn resolve(&self, args: &ResolveArgs) -> Result<String> {
        self.build()?;

        let subject = Arc::new(SessionSubject::new());
        if args.authenticated {
            subject.login();
        }
        subject.set_remembered(args.remembered);
        for role in &args.roles {
            subject.grant_role(role.clone());
        }
        for permission in &args.permissions {
            subject.grant_permission(permission.clone());
        }
        let locale = args
            .locale
            .clone()
            .map(Locale::new)
            .unwrap_or_else(|| self.config.locale.clone());

        let sitemap = Arc::new(UserSitemap::new(
            self.publisher.clone(),
            subject,
            Arc::new(MapTranslator::new()),
            Arc::new(UnicodeCollator),
            locale,
        ));
        let views = Arc::new(HeadlessViews::new());
        let mut navigator = Navigator::new(sitemap.clone(), views.clone(), views)
            .configured(&self.config.navigation);

        let outcome = navigator.navigate_to(args.fragment.as_str())?;
        let route: Vec<UserNode> = navigator.route()?;
        let children = match navigator.current_node() {
            Some(node) => sitemap.sorted_children(node, self.config.navigation.sort_mode()?)?,
            None => Vec::new(),
        };

        if args.format == "json" {
            return Ok(serde_json::to_string_pretty(&json!({
                "outcome": describe_outcome(&outcome),
                "current": navigator.current_fragment(),
                "previous": navigator.previous_state().map(|s| s.to_string()),
                "route": route.iter().map(|n| n.uri()).collect::<Vec<_>>(),
                "children": children.iter().map(|n| json!({"uri": n.uri(), "label": n.label()})).collect::<Vec<_>>(),
            }))?);
        }

        let mut out = describe_outcome(&outcome);
        if let Some(current) = navigator.current_fragment() {
            out.push_str(&format!("\nCurrent: {}", current));
        }
        if let Some(previous) = navigator.previous_state() {
            out.push_str(&format!("\nPrevious: {}", previous));
        }
        if !route.is_empty() {
            let labels: Vec<&str> = route.iter().map(|n| n.label()).collect();
            out.push_str(&format!("\nRoute: {}", labels.join(" > ")));
        }
        for child in &children {
            out.push_str(&format!("\n  - {} ({})", child.label(), child.uri()));
        }
        Ok(out)
    }
}

fn describe_outcome(outcome: &NavigationOutcome) -> String {
    match outcome {
        NavigationOutcome::Navigated { to } => format!("Navigated to {}", to),
        NavigationOutcome::Unchanged => "Already there".to_string(),
        NavigationOutcome::Cancelled => "Navigation cancelled".to_string(),
        NavigationOutcome::InvalidUri(fragment) => format!("No such page: {}", fragment),
        NavigationOutcome::LoginRequired { requested } => {
            format!("Login required for {}", requested)
        }
    }
}

/// One table row per page in depth-first order
pub fn format_tree(sitemap: &MasterSitemap) -> String {
    let mut order = NodeCollector::<NodeId>::default();
    walk(sitemap, &mut order);
    let mut captions = CaptionCollector::new(|id: &NodeId| {
        sitemap
            .node(*id)
            .map(|n| n.segment().to_string())
            .unwrap_or_default()
    });
    walk(sitemap, &mut captions);

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Page", "URI", "Policy", "Position", "View"]);
    for (id, caption) in order.nodes.iter().zip(captions.captions) {
        let Some(node) = sitemap.node(*id) else {
            continue;
        };
        let view = match (&node.view, node.placeholder) {
            (Some(view), _) => view.to_string(),
            (None, true) => "(placeholder)".to_string(),
            (None, false) => "-".to_string(),
        };
        table.add_row(vec![
            caption,
            node.uri.clone(),
            node.policy.name().to_string(),
            node.position_index.to_string(),
            view,
        ]);
    }
    table.to_string()
}
