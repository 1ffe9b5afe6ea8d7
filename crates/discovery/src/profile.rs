//! # Profiles
//!
//! Account rows and the editable profile fields. Registration fixes the
//! role for good; developers must always carry a display name.
//!
//! Input is checked before the store is touched. Blank optional fields are
//! stored as empty (`None`), never as empty strings.

use std::sync::Arc;

use store::{NewUser, ProfileUpdate, Role, Store, User};
use tracing::{info, warn};

use crate::error::{DiscoveryError, Result};
use crate::session::Session;

/// Changes to a profile. `None` keeps the current value; a blank string
/// clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileEdit {
    pub display_name: Option<String>,
    pub studio_name: Option<String>,
    pub bio: Option<String>,
}

/// Trimmed value, or `None` when nothing but whitespace is left.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = matches!(
        email.split_once('@'),
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.contains('@')
    );
    if !valid {
        return Err(DiscoveryError::validation(format!("not an email address: {email}")));
    }
    Ok(email)
}

fn require_developer_name(role: Role, name: &Option<String>) -> Result<()> {
    if role == Role::Developer && name.is_none() {
        return Err(DiscoveryError::validation("developer name is required"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ProfileManager {
    store: Arc<dyn Store>,
}

impl ProfileManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create the account row. A registered email (in any letter case) is a
    /// validation error.
    pub async fn register(&self, account: NewUser) -> Result<User> {
        let email = normalize_email(&account.email)?;
        let display_name = account.display_name.as_deref().and_then(non_blank);
        require_developer_name(account.role, &display_name)?;

        let row = NewUser {
            email,
            role: account.role,
            display_name,
        };
        match self.store.create_user(row).await {
            Ok(user) => {
                info!("Registered {} account {}", user.role, user.id);
                Ok(user)
            }
            Err(err) if err.is_duplicate() => {
                warn!("Registration rejected, email already in use");
                Err(DiscoveryError::validation("this email is already registered"))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// The acting user's account row
    pub async fn current(&self, session: &Session) -> Result<User> {
        self.store
            .get_user(session.user_id)
            .await?
            .ok_or(DiscoveryError::NotAuthenticated)
    }

    /// Apply `edit` on top of the current profile and write all fields back.
    pub async fn update(&self, session: &Session, edit: ProfileEdit) -> Result<User> {
        if let Some(name) = &edit.display_name {
            require_developer_name(session.role, &non_blank(name))?;
        }

        let current = self.current(session).await?;
        let merge = |edited: Option<String>, existing: Option<String>| match edited {
            Some(value) => non_blank(&value),
            None => existing,
        };
        let update = ProfileUpdate {
            display_name: merge(edit.display_name, current.display_name),
            studio_name: merge(edit.studio_name, current.studio_name),
            bio: merge(edit.bio, current.bio),
        };
        require_developer_name(session.role, &update.display_name)?;

        let user = self.store.update_user(session.user_id, update).await?;
        info!("Updated profile of user {}", user.id);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture;

    fn developer(email: &str, name: Option<&str>) -> NewUser {
        NewUser {
            email: email.to_string(),
            role: Role::Developer,
            display_name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_input() {
        let f = fixture();
        let profiles = ProfileManager::new(f.store.clone());

        let user = profiles
            .register(developer("  Moth@Lamp.Games ", Some("  Moth Lamp  ")))
            .await
            .unwrap();
        assert_eq!(user.email, "moth@lamp.games");
        assert_eq!(user.role, Role::Developer);
        assert_eq!(user.display_name.as_deref(), Some("Moth Lamp"));

        let session = Session::resolve(f.store.as_ref(), Some(user.id)).await.unwrap();
        assert_eq!(session.role, Role::Developer);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input_before_writing() {
        let f = fixture();
        let profiles = ProfileManager::new(f.store.clone());

        for account in [
            developer("moth@lamp.games", None),
            developer("moth@lamp.games", Some("   ")),
            developer("not-an-email", Some("Moth Lamp")),
            developer("@lamp.games", Some("Moth Lamp")),
        ] {
            let result = profiles.register(account).await;
            assert!(matches!(result, Err(DiscoveryError::Validation(_))));
        }
        assert_eq!(f.store.counts().await.users, 4);

        // Gamers register without a name
        let gamer = profiles
            .register(NewUser {
                email: "wren@example.com".into(),
                role: Role::Gamer,
                display_name: Some(" ".into()),
            })
            .await
            .unwrap();
        assert_eq!(gamer.display_name, None);
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() {
        let f = fixture();
        let profiles = ProfileManager::new(f.store.clone());
        let taken = format!("{}@example.com", f.gamer).to_uppercase();

        let result = profiles.register(developer(&taken, Some("Copycat"))).await;
        assert!(matches!(result, Err(DiscoveryError::Validation(_))));
        assert_eq!(f.store.counts().await.users, 4);
    }

    #[tokio::test]
    async fn test_update_trims_and_clears_blank_fields() {
        let f = fixture();
        let profiles = ProfileManager::new(f.store.clone());
        let session = f.developer_session();

        profiles
            .update(
                &session,
                ProfileEdit {
                    display_name: Some(" Lantern Team ".into()),
                    studio_name: Some("Lantern Works".into()),
                    bio: Some("Small games about light".into()),
                },
            )
            .await
            .unwrap();

        let user = profiles
            .update(
                &session,
                ProfileEdit {
                    studio_name: Some("   ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Lantern Team"));
        assert_eq!(user.studio_name, None);
        assert_eq!(user.bio.as_deref(), Some("Small games about light"));
        assert!(user.updated_at > user.created_at);
    }

    #[tokio::test]
    async fn test_developer_name_cannot_be_cleared() {
        let f = fixture();
        let profiles = ProfileManager::new(f.store.clone());
        let session = f.developer_session();

        let named = ProfileEdit {
            display_name: Some("Lantern Team".into()),
            ..Default::default()
        };
        profiles.update(&session, named).await.unwrap();

        let blank = ProfileEdit {
            display_name: Some("  ".into()),
            bio: Some("gone".into()),
            ..Default::default()
        };
        let result = profiles.update(&session, blank).await;
        assert!(matches!(result, Err(DiscoveryError::Validation(_))));

        let user = profiles.current(&session).await.unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Lantern Team"));
        assert_eq!(user.bio, None);
    }

    #[tokio::test]
    async fn test_unnamed_developer_must_set_a_name() {
        let f = fixture();
        let profiles = ProfileManager::new(f.store.clone());

        // Fixture developers start without a display name
        let edit = ProfileEdit {
            bio: Some("hello".into()),
            ..Default::default()
        };
        let result = profiles.update(&f.developer_session(), edit).await;
        assert!(matches!(result, Err(DiscoveryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_gamer_may_clear_display_name() {
        let f = fixture();
        let profiles = ProfileManager::new(f.store.clone());
        let session = f.gamer_session();

        let named = ProfileEdit {
            display_name: Some("Wren".into()),
            ..Default::default()
        };
        profiles.update(&session, named).await.unwrap();

        let cleared = ProfileEdit {
            display_name: Some(String::new()),
            ..Default::default()
        };
        let user = profiles.update(&session, cleared).await.unwrap();
        assert_eq!(user.display_name, None);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_authenticated() {
        let f = fixture();
        let profiles = ProfileManager::new(f.store.clone());
        let session = Session::new(uuid::Uuid::new_v4(), Role::Gamer);

        assert!(matches!(profiles.current(&session).await, Err(DiscoveryError::NotAuthenticated)));
        assert!(matches!(
            profiles.update(&session, ProfileEdit::default()).await,
            Err(DiscoveryError::NotAuthenticated)
        ));
    }
}
