//! Subject-state capability
//!
//! The authorization truth source lives outside this crate; the engine only
//! asks these four questions of it.

use crate::access::PagePermission;
use parking_lot::RwLock;
use std::collections::BTreeSet;

/// What the engine needs to know about the current subject
pub trait SubjectState: Send + Sync {
    fn is_authenticated(&self) -> bool;
    fn is_remembered(&self) -> bool;
    fn has_all_roles(&self, roles: &BTreeSet<String>) -> bool;
    fn is_permitted(&self, permission: &PagePermission) -> bool;
}

#[derive(Debug, Default)]
struct SubjectData {
    authenticated: bool,
    remembered: bool,
    roles: BTreeSet<String>,
    permissions: Vec<String>,
}

/// In-memory subject for one session.
///
/// Roles and permissions granted while logged in are dropped on logout.
#[derive(Debug, Default)]
pub struct SessionSubject {
    data: RwLock<SubjectData>,
}

impl SessionSubject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self) {
        self.data.write().authenticated = true;
    }

    pub fn logout(&self) {
        let mut data = self.data.write();
        data.authenticated = false;
        data.remembered = false;
        data.roles.clear();
        data.permissions.clear();
    }

    pub fn set_remembered(&self, remembered: bool) {
        self.data.write().remembered = remembered;
    }

    pub fn grant_role(&self, role: impl Into<String>) {
        self.data.write().roles.insert(role.into());
    }

    /// Grant a wildcard permission pattern such as `page:view:private:*`
    pub fn grant_permission(&self, pattern: impl Into<String>) {
        self.data.write().permissions.push(pattern.into());
    }
}

impl SubjectState for SessionSubject {
    fn is_authenticated(&self) -> bool {
        self.data.read().authenticated
    }

    fn is_remembered(&self) -> bool {
        self.data.read().remembered
    }

    fn has_all_roles(&self, roles: &BTreeSet<String>) -> bool {
        let data = self.data.read();
        roles.iter().all(|r| data.roles.contains(r))
    }

    fn is_permitted(&self, permission: &PagePermission) -> bool {
        self.data
            .read()
            .permissions
            .iter()
            .any(|pattern| permission.implied_by(pattern))
    }
}
