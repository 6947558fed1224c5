//! Where to go after the subject logs in or out

use crate::error::SitemapResult;
use crate::navigation::{History, NavigationState};
use crate::tree::StandardPageKey;
use crate::user::UserSitemap;

/// Chooses the destination after a successful login; None stays put
pub trait LoginNavigationRule: Send + Sync {
    fn after_login(
        &self,
        history: &History,
        sitemap: &UserSitemap,
    ) -> SitemapResult<Option<NavigationState>>;
}

/// Chooses the destination after logout; None stays put
pub trait LogoutNavigationRule: Send + Sync {
    fn after_logout(
        &self,
        history: &History,
        sitemap: &UserSitemap,
    ) -> SitemapResult<Option<NavigationState>>;
}

/// State for a standard page, falling back to the public home page
fn standard_page_state(
    sitemap: &UserSitemap,
    key: StandardPageKey,
) -> SitemapResult<Option<NavigationState>> {
    let uri = match sitemap.standard_page_uri(key)? {
        Some(uri) => Some(uri),
        None => sitemap.standard_page_uri(StandardPageKey::PublicHome)?,
    };
    Ok(uri.map(|uri| NavigationState::from_uri(&uri)))
}

/// Leaves the login page for the page that sent the user there.
///
/// If the page before login was the logout page, or there was none, goes to
/// `home` instead. Logging in from any other page does not navigate.
#[derive(Debug, Clone, Copy)]
pub struct DefaultLoginNavigationRule {
    pub home: StandardPageKey,
}

impl DefaultLoginNavigationRule {
    pub fn new(home: StandardPageKey) -> Self {
        Self { home }
    }
}

impl Default for DefaultLoginNavigationRule {
    fn default() -> Self {
        Self::new(StandardPageKey::PrivateHome)
    }
}

impl LoginNavigationRule for DefaultLoginNavigationRule {
    fn after_login(
        &self,
        history: &History,
        sitemap: &UserSitemap,
    ) -> SitemapResult<Option<NavigationState>> {
        let on_login_page = match history.current_state() {
            Some(current) => sitemap.is_login_uri(current)?,
            None => return standard_page_state(sitemap, self.home),
        };
        if !on_login_page {
            return Ok(None);
        }

        let logout_uri = sitemap.standard_page_uri(StandardPageKey::Logout)?;
        match history.previous_state() {
            Some(previous) if logout_uri.as_deref() != Some(previous.virtual_page().as_str()) => {
                Ok(Some(previous.clone()))
            }
            _ => standard_page_state(sitemap, self.home),
        }
    }
}

/// Always goes to `target` after logout
#[derive(Debug, Clone, Copy)]
pub struct DefaultLogoutNavigationRule {
    pub target: StandardPageKey,
}

impl DefaultLogoutNavigationRule {
    pub fn new(target: StandardPageKey) -> Self {
        Self { target }
    }
}

impl Default for DefaultLogoutNavigationRule {
    fn default() -> Self {
        Self::new(StandardPageKey::PublicHome)
    }
}

impl LogoutNavigationRule for DefaultLogoutNavigationRule {
    fn after_logout(
        &self,
        _history: &History,
        sitemap: &UserSitemap,
    ) -> SitemapResult<Option<NavigationState>> {
        standard_page_state(sitemap, self.target)
    }
}
