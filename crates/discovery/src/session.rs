//! The acting user, passed explicitly to every user-scoped operation.

use crate::error::{DiscoveryError, Result};
use store::{Role, Store, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Look up the acting user. A missing or unknown id is not authenticated.
    pub async fn resolve(store: &dyn Store, user_id: Option<UserId>) -> Result<Self> {
        let user_id = user_id.ok_or(DiscoveryError::NotAuthenticated)?;
        let user = store
            .get_user(user_id)
            .await?
            .ok_or(DiscoveryError::NotAuthenticated)?;
        Ok(Self::new(user.id, user.role))
    }

    pub fn require(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(DiscoveryError::Forbidden { required: role })
        }
    }

    pub fn require_gamer(&self) -> Result<()> {
        self.require(Role::Gamer)
    }

    pub fn require_developer(&self) -> Result<()> {
        self.require(Role::Developer)
    }
}
