//! Client-side filtering of the cached user list.

use super::types::User;

/// Search criteria. Unset or blank criteria match every record; set ones are
/// combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Exact identifier.
    pub id: Option<u64>,
    /// Case-insensitive substring of the name.
    pub nome: Option<String>,
    /// Exact status (case-insensitive), e.g. `ativo`.
    pub status: Option<String>,
}

impl UserFilter {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && blank(self.nome.as_deref()) && blank(self.status.as_deref())
    }

    pub fn matches(&self, user: &User) -> bool {
        let id_ok = self.id.is_none_or(|id| user.id == id);

        let nome_ok = match non_blank(self.nome.as_deref()) {
            Some(needle) => user.nome.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        };

        let status_ok = match non_blank(self.status.as_deref()) {
            Some(wanted) => user
                .status
                .as_deref()
                .is_some_and(|status| status.trim().eq_ignore_ascii_case(wanted)),
            None => true,
        };

        id_ok && nome_ok && status_ok
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn blank(value: Option<&str>) -> bool {
    non_blank(value).is_none()
}

/// Records of `cache` matching `criteria`, in cache order.
pub fn apply_filter(cache: &[User], criteria: &UserFilter) -> Vec<User> {
    if criteria.is_empty() {
        return cache.to_vec();
    }
    cache
        .iter()
        .filter(|user| criteria.matches(user))
        .cloned()
        .collect()
}
