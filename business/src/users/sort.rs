//! Column sorting for the user table.
//!
//! Sorting never touches the cache: [`sorted_view`] returns a reordered copy.

use std::cmp::Ordering;

use super::types::User;

/// Sortable columns of the user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Id,
    Nome,
    Login,
    Perfil,
}

impl SortColumn {
    pub const ALL: [Self; 4] = [Self::Id, Self::Nome, Self::Login, Self::Perfil];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Nome => "nome",
            Self::Login => "login",
            Self::Perfil => "perfil",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }

    fn key(self, user: &User) -> SortKey<'_> {
        match self {
            Self::Id => SortKey::Number(user.id),
            Self::Nome => SortKey::Text(&user.nome),
            Self::Login => SortKey::Text(&user.login),
            Self::Perfil => SortKey::Text(&user.perfil),
        }
    }
}

impl std::fmt::Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Header marker shown next to the active column.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Active sort column (if any) and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    /// Header click on `column`.
    ///
    /// The active column flips direction; any other column becomes active
    /// in ascending order.
    #[must_use]
    pub fn toggle(self, column: SortColumn) -> Self {
        if self.column == Some(column) {
            Self {
                column: Some(column),
                direction: self.direction.flipped(),
            }
        } else {
            Self::by(column, SortDirection::Ascending)
        }
    }

    /// Header label for `column`, with an arrow when it is the active one.
    pub fn header(&self, column: SortColumn) -> String {
        if self.column == Some(column) {
            format!("{} {}", column.as_str(), self.direction.arrow())
        } else {
            column.as_str().to_owned()
        }
    }
}

enum SortKey<'a> {
    Text(&'a str),
    Number(u64),
}

fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
    match (a, b) {
        (SortKey::Text(a), SortKey::Text(b)) => locale_compare(a, b),
        (SortKey::Number(a), SortKey::Number(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// Ordered copy of `cache` according to `sort`.
///
/// The sort is stable, so equal keys (and no column at all) keep cache order.
pub fn sorted_view(cache: &[User], sort: &SortState) -> Vec<User> {
    let mut view = cache.to_vec();
    let Some(column) = sort.column else {
        return view;
    };

    view.sort_by(|a, b| {
        let ordering = compare_keys(&column.key(a), &column.key(b));
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    view
}

/// Dictionary-style comparison for display names.
///
/// Letters compare by their base form first, ignoring case and Latin
/// diacritics ("Álvaro" sorts with "alvaro", before "Beto"). Ties fall back
/// to the raw strings so the order stays total.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(fold_char);
    let folded_b = b.chars().flat_map(fold_char);
    folded_a.cmp(folded_b).then_with(|| a.cmp(b))
}

fn fold_char(c: char) -> std::char::ToLowercase {
    base_letter(c).to_lowercase()
}

fn base_letter(c: char) -> char {
    match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Ç' => 'C',
        'ç' => 'c',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ñ' => 'N',
        'ñ' => 'n',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ý' => 'Y',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
