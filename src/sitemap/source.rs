//! Node-record sources
//!
//! A source feeds declared pages and redirects into a sitemap under
//! construction and reports the module names it drew them from.

use crate::error::{SitemapError, SitemapResult};
use crate::sitemap::MasterSitemap;
use crate::tree::NodeRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loader contract consumed by the build service
pub trait NodeSource: Send + Sync {
    /// Name used in configuration to select this source
    fn name(&self) -> &str;

    /// Add every record this source knows about; returns contributing module names
    fn load_into(&self, sitemap: &mut MasterSitemap) -> SitemapResult<Vec<String>>;
}

/// Declared redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRecord {
    pub from: String,
    pub to: String,
}

/// One module of page declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapDeclaration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pages: Vec<NodeRecord>,
    #[serde(default)]
    pub redirects: Vec<RedirectRecord>,
}

impl SitemapDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn page(mut self, record: NodeRecord) -> Self {
        self.pages.push(record);
        self
    }

    pub fn redirect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.redirects.push(RedirectRecord {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    fn apply(&self, sitemap: &mut MasterSitemap) -> SitemapResult<()> {
        for record in &self.pages {
            sitemap.add_node(record.clone())?;
        }
        for redirect in &self.redirects {
            sitemap.add_redirect(&redirect.from, &redirect.to)?;
        }
        Ok(())
    }
}

/// Declarations supplied directly in code
#[derive(Debug, Clone, Default)]
pub struct DirectSource {
    modules: Vec<SitemapDeclaration>,
}

impl DirectSource {
    pub const NAME: &'static str = "direct";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: SitemapDeclaration) -> Self {
        self.modules.push(module);
        self
    }
}

impl NodeSource for DirectSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn load_into(&self, sitemap: &mut MasterSitemap) -> SitemapResult<Vec<String>> {
        let mut contributed = Vec::new();
        for module in &self.modules {
            module.apply(sitemap)?;
            let name = format!("{}:{}", Self::NAME, module.name);
            sitemap.record_source(name.clone())?;
            debug!(module = %module.name, pages = module.pages.len(), "Loaded direct module");
            contributed.push(name);
        }
        Ok(contributed)
    }
}

/// Declarations read from TOML or YAML files
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    files: Vec<PathBuf>,
}

impl FileSource {
    pub const NAME: &'static str = "file";

    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Parse one declaration file, choosing the format by extension
    pub fn read_declaration(path: &Path) -> SitemapResult<SitemapDeclaration> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SitemapError::declaration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let mut declaration: SitemapDeclaration = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| {
                SitemapError::declaration(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            _ => toml::from_str(&content).map_err(|e| {
                SitemapError::declaration(format!("Failed to parse {}: {}", path.display(), e))
            })?,
        };
        if declaration.name.is_empty() {
            declaration.name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unnamed")
                .to_string();
        }
        Ok(declaration)
    }
}

impl NodeSource for FileSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn load_into(&self, sitemap: &mut MasterSitemap) -> SitemapResult<Vec<String>> {
        let mut contributed = Vec::new();
        for path in &self.files {
            let declaration = Self::read_declaration(path)
                .map_err(|e| SitemapError::source_failed(Self::NAME, e.to_string()))?;
            declaration.apply(sitemap)?;
            let name = format!("{}:{}", Self::NAME, path.display());
            sitemap.record_source(name.clone())?;
            debug!(file = %path.display(), pages = declaration.pages.len(), "Loaded declaration file");
            contributed.push(name);
        }
        Ok(contributed)
    }
}
