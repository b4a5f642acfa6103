//! Cached user list kept in step with the server.
//!
//! [`UserListController`] holds the last list fetched from `/usuarios/` and
//! amends it only after the server confirms a change: a successful update
//! replaces the record, a successful delete removes it, a successful create
//! appends it. Failed calls leave the cache exactly as it was and attach an
//! error [`Notification`] instead.
//!
//! ```text
//! Idle ──load_all──▶ Loading ──ok──▶ Loaded ◀──create/update/remove──┐
//!                       │                └───────────────────────────┘
//!                       └──err──▶ LoadFailed ──load_all──▶ Loading
//! ```

use crate::BusinessConfig;
use crate::auth::AuthContext;
use crate::error::{UsersError, UsersResult};
use crate::notification::Notification;

use super::api;
use super::filter::{UserFilter, apply_filter};
use super::sort::{SortState, sorted_view};
use super::types::{User, UserDraft, UserPatch};

/// Lifecycle of the list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListState {
    /// Nothing fetched yet.
    #[default]
    Idle,

    /// A fetch is in flight.
    Loading,

    /// The cache reflects the last successful fetch plus confirmed changes.
    Loaded,

    /// The first fetch failed; only `load_all` leaves this state.
    LoadFailed(String),
}

#[derive(Debug)]
pub struct UserListController {
    config: BusinessConfig,
    auth: AuthContext,
    state: ListState,
    cache: Vec<User>,
    notification: Option<Notification>,
}

impl UserListController {
    pub fn new(config: BusinessConfig, auth: AuthContext) -> Self {
        Self {
            config,
            auth,
            state: ListState::Idle,
            cache: Vec::new(),
            notification: None,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ListState::Loading
    }

    pub fn is_loaded(&self) -> bool {
        self.state == ListState::Loaded
    }

    /// Cached users in server order.
    pub fn users(&self) -> &[User] {
        &self.cache
    }

    pub fn find(&self, id: u64) -> Option<&User> {
        self.cache.iter().find(|u| u.id == id)
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Swap the authentication context used for subsequent calls.
    pub fn set_auth(&mut self, auth: AuthContext) {
        self.auth = auth;
    }

    /// The most recent notification, cleared on read.
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    /// Filtered, then sorted copy of the cache for display.
    pub fn view(&self, sort: &SortState, criteria: &UserFilter) -> Vec<User> {
        sorted_view(&apply_filter(&self.cache, criteria), sort)
    }

    /// Fetch the whole collection and replace the cache.
    ///
    /// On failure a previously loaded cache is kept (state stays `Loaded`);
    /// without one the state becomes `LoadFailed`.
    pub async fn load_all(&mut self) -> UsersResult<&[User]> {
        let had_cache = self.state == ListState::Loaded;
        self.state = ListState::Loading;

        match api::list_users(&self.config, &self.auth).await {
            Ok(users) => {
                log::info!("Loaded {} users", users.len());
                self.cache = users;
                self.state = ListState::Loaded;
                Ok(&self.cache)
            }
            Err(err) => {
                log::error!("Failed to load users: {err}");
                self.state = if had_cache {
                    ListState::Loaded
                } else {
                    ListState::LoadFailed(err.to_string())
                };
                Err(self.fail(err))
            }
        }
    }

    /// Create a user after checking required fields locally.
    ///
    /// Blank `nome`, `login`, `senha` or `perfil` fail before any request. On
    /// success the server's record is appended to a loaded cache.
    pub async fn create(&mut self, draft: &UserDraft) -> UsersResult<User> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            log::warn!("Refusing to create user, missing fields: {missing:?}");
            return Err(self.fail(UsersError::MissingFields(missing)));
        }

        let draft = draft.normalized();
        match api::create_user(&self.config, &self.auth, &draft).await {
            Ok((user, message)) => {
                log::info!("Created user {} ({})", user.id, user.login);
                if self.is_loaded() && !self.replace_record(&user) {
                    self.cache.push(user.clone());
                }
                self.succeed(message.or_else(|| Some(format!("User '{}' created", user.login))));
                Ok(user)
            }
            Err(err) => {
                log::error!("Failed to create user '{}': {err}", draft.login);
                Err(self.fail(err))
            }
        }
    }

    /// Send the set fields of `patch` and replace the cached record with the
    /// server's answer.
    pub async fn update(&mut self, id: u64, patch: &UserPatch) -> UsersResult<User> {
        if patch.is_empty() {
            return Err(self.fail(UsersError::NothingToUpdate));
        }

        match api::update_user(&self.config, &self.auth, id, patch).await {
            Ok((user, message)) => {
                if !self.replace_record(&user) {
                    log::debug!("Updated user {id} is not in the cache");
                }
                log::info!("Updated user {id}");
                self.succeed(message.or_else(|| Some(format!("User {id} updated"))));
                Ok(user)
            }
            Err(err) => {
                log::error!("Failed to update user {id}: {err}");
                Err(self.fail(err))
            }
        }
    }

    /// Like [`update`](Self::update), but only sends fields that differ from
    /// the cached record.
    pub async fn update_changed(&mut self, id: u64, edited: UserPatch) -> UsersResult<User> {
        let patch = match self.find(id) {
            Some(current) => edited.changes_from(current),
            None => edited,
        };
        self.update(id, &patch).await
    }

    /// Delete on the server, then drop the record locally.
    ///
    /// A 404 from the server is reported as [`UsersError::NotFound`]; a
    /// confirmed delete of an id that is not cached is a no-op success.
    pub async fn remove(&mut self, id: u64) -> UsersResult<()> {
        match api::delete_user(&self.config, &self.auth, id).await {
            Ok(message) => {
                let before = self.cache.len();
                self.cache.retain(|u| u.id != id);
                if self.cache.len() == before {
                    log::debug!("Deleted user {id} was not in the cache");
                }
                log::info!("Deleted user {id}");
                self.succeed(message.or_else(|| Some(format!("User {id} deleted"))));
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to delete user {id}: {err}");
                Err(self.fail(err))
            }
        }
    }

    /// Replace every cached record with `user.id` by `user`, keeping at most one.
    fn replace_record(&mut self, user: &User) -> bool {
        let mut replaced = false;
        self.cache.retain_mut(|cached| {
            if cached.id != user.id {
                return true;
            }
            if replaced {
                return false;
            }
            cached.clone_from(user);
            replaced = true;
            true
        });
        replaced
    }

    fn succeed(&mut self, message: Option<String>) {
        self.notification = Some(Notification::success(message));
    }

    fn fail(&mut self, err: UsersError) -> UsersError {
        self.notification = Some(Notification::from_error(&err));
        err
    }
}
