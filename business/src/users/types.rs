//! Wire types for the `/usuarios` endpoints.

use serde::{Deserialize, Serialize};

/// A user record as returned by the server.
///
/// The password is write-only and therefore not part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: u64,
    pub nome: String,
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub perfil: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_criacao: Option<String>,
    /// Account status (`ativo` / `inativo`) when the server reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Known role tags for [`User::perfil`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Admin,
    Usuario,
    Financeiro,
}

impl Profile {
    pub const ALL: [Self; 3] = [Self::Admin, Self::Usuario, Self::Financeiro];

    /// Tag sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Usuario => "usuario",
            Self::Financeiro => "financeiro",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Usuario => "Common user",
            Self::Financeiro => "Financial",
        }
    }

    /// Parse a wire tag, case-insensitively. Free text yields `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(tag))
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.as_str())
    }
}

/// Body of `POST /usuarios/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub nome: String,
    pub login: String,
    pub senha: String,
    pub perfil: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserDraft {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("nome", self.nome.as_str()),
            ("login", self.login.as_str()),
            ("senha", self.senha.as_str()),
            ("perfil", self.perfil.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Trimmed copy with an empty email dropped. The password is kept verbatim.
    pub fn normalized(&self) -> Self {
        Self {
            nome: self.nome.trim().to_owned(),
            login: self.login.trim().to_owned(),
            senha: self.senha.clone(),
            perfil: self.perfil.trim().to_owned(),
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_owned),
        }
    }
}

/// Body of `PUT /usuarios/:id`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perfil: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.login.is_none()
            && self.senha.is_none()
            && self.perfil.is_none()
            && self.email.is_none()
    }

    /// Keep only the fields of `self` that differ from `current`.
    ///
    /// A password is always a change since the current one is never known.
    #[must_use]
    pub fn changes_from(self, current: &User) -> Self {
        fn changed(new: Option<String>, old: &str) -> Option<String> {
            new.filter(|v| v != old)
        }

        Self {
            nome: changed(self.nome, &current.nome),
            login: changed(self.login, &current.login),
            senha: self.senha.filter(|s| !s.is_empty()),
            perfil: changed(self.perfil, &current.perfil),
            email: changed(self.email, current.email.as_deref().unwrap_or_default()),
        }
    }
}

/// Standard response envelope: `{status, mensagem, dados}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub mensagem: Option<String>,
    pub dados: Option<T>,
}

/// One server-side validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub campo: String,
    pub mensagem: String,
    #[serde(default)]
    pub tipo: Option<String>,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.campo, self.mensagem)
    }
}
