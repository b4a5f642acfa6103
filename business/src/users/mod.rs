//! User administration domain module.
//!
//! This module is the single home for:
//! - Wire types of the `/usuarios` resource (`types`)
//! - One-request API helpers (`api`)
//! - Pure view derivation over the cached list (`sort`, `filter`)
//! - The cached list and its lifecycle (`controller`)
//!
//! Front ends should only read through [`UserListController`] and never keep
//! their own copy of the list.

pub mod api;
pub mod controller;
pub mod filter;
pub mod sort;
pub mod types;

pub use controller::{ListState, UserListController};
pub use filter::{UserFilter, apply_filter};
pub use sort::{SortColumn, SortDirection, SortState, locale_compare, sorted_view};
pub use types::{ApiEnvelope, FieldError, Profile, User, UserDraft, UserPatch};
