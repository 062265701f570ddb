mod handlers;
mod management;

use std::sync::Arc;

pub use handlers::{add_barista, add_manager, remove_barista, remove_manager, update_barista};
#[cfg(test)]
pub use management::MockUserManagement;
pub use management::{ClientCredentials, HttpUserManagement, ManagementError, Role, UserManagement};

/// Identity provider role ids the staff endpoints assign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleIds {
    pub barista: String,
    pub manager: String,
}

/// Shared state of the staff endpoints.
#[derive(Debug)]
pub struct Staff<U> {
    management: Arc<U>,
    roles: RoleIds,
}

impl<U> Clone for Staff<U> {
    fn clone(&self) -> Self {
        Self {
            management: self.management.clone(),
            roles: self.roles.clone(),
        }
    }
}

impl<U> Staff<U> {
    pub fn new(management: U, roles: RoleIds) -> Self {
        Self {
            management: Arc::new(management),
            roles,
        }
    }

    pub fn management(&self) -> &U {
        &self.management
    }

    pub fn roles(&self) -> &RoleIds {
        &self.roles
    }
}
