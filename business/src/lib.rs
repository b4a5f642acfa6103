//! Business layer of the UniWays admin panel: configuration, authentication
//! and the user list kept in step with the `/usuarios` API.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod notification;
pub mod users;

pub use auth::{AuthContext, SessionCheck, SessionUser, login, validate_session};
pub use config::{BusinessConfig, ConfigError, DEFAULT_API_URL};
pub use error::{UsersError, UsersResult};
pub use notification::{Notification, NotificationKind};
pub use users::{
    FieldError, ListState, Profile, SortColumn, SortDirection, SortState, User, UserDraft,
    UserFilter, UserListController, UserPatch,
};
