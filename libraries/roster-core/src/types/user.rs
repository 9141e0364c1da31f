/// User domain types
use crate::error::{Result, RosterError};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";

/// A record in the user directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Contact email
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Avatar image URL
    #[serde(default)]
    pub avatar: String,
}

impl User {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Avatar URL derived from a user's names.
///
/// Used whenever a record is created without an explicit avatar, so the same
/// names always produce the same image.
pub fn avatar_url(first_name: &str, last_name: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("name", &format!("{} {}", first_name.trim(), last_name.trim()))
        .append_pair("background", "random")
        .finish();
    format!("{}?{}", AVATAR_SERVICE, query)
}

/// Payload for creating a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl NewUser {
    /// Create a payload without an explicit avatar
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            avatar: None,
        }
    }

    /// Set an explicit avatar URL
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Fill in the derived avatar when none was supplied.
    #[must_use]
    pub fn with_derived_avatar(mut self) -> Self {
        if !matches!(self.avatar.as_deref(), Some(a) if !a.trim().is_empty()) {
            self.avatar = Some(avatar_url(&self.first_name, &self.last_name));
        }
        self
    }

    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first missing or malformed field.
    pub fn validate(&self) -> Result<()> {
        require("first name", &self.first_name)?;
        require("last name", &self.last_name)?;
        require_email(&self.email)
    }

    /// Build the full record under the given identifier
    pub fn into_user(self, id: UserId) -> User {
        let draft = self.with_derived_avatar();
        User {
            id,
            email: draft.email,
            first_name: draft.first_name,
            last_name: draft.last_name,
            avatar: draft.avatar.unwrap_or_default(),
        }
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserPatch {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.avatar.is_none()
    }

    /// Reject empty patches and blank values for supplied fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when nothing would change or a supplied field is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(RosterError::invalid_input("no fields to update"));
        }
        if let Some(first_name) = &self.first_name {
            require("first name", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            require("last name", last_name)?;
        }
        if let Some(email) = &self.email {
            require_email(email)?;
        }
        Ok(())
    }

    /// Shallow merge over an existing record (last write wins)
    pub fn apply_to(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &self.last_name {
            user.last_name.clone_from(last_name);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(avatar) = &self.avatar {
            user.avatar.clone_from(avatar);
        }
    }
}

/// Body returned by the remote directory after a create.
///
/// The remote echoes whatever it was sent plus its own bookkeeping; every
/// field is optional and the remote `id` is not trusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedUser {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CreatedUser {
    /// Merge the remote echo over the submitted payload under a local identifier
    pub fn into_user(self, id: UserId, submitted: NewUser) -> User {
        let draft = NewUser {
            first_name: self.first_name.unwrap_or(submitted.first_name),
            last_name: self.last_name.unwrap_or(submitted.last_name),
            email: self.email.unwrap_or(submitted.email),
            avatar: self.avatar.or(submitted.avatar),
        };
        draft.into_user(id)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RosterError::invalid_input(format!("{} is required", field)));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<()> {
    require("email", email)?;
    if !email.contains('@') {
        return Err(RosterError::invalid_input(format!(
            "'{}' is not an email address",
            email
        )));
    }
    Ok(())
}
