use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Signed-in user as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(rename = "avatar", default)]
    pub avatar_url: String,
}

/// A profile field the view can send to the update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileField {
    Username,
    Email,
    Password,
    /// Only written by a finished upload.
    Avatar,
}

impl ProfileField {
    /// Maps the `id` of a form input. The avatar has no input.
    pub fn from_input_id(id: &str) -> Option<Self> {
        match id {
            "username" => Some(ProfileField::Username),
            "email" => Some(ProfileField::Email),
            "password" => Some(ProfileField::Password),
            _ => None,
        }
    }

    pub fn input_id(self) -> &'static str {
        match self {
            ProfileField::Username => "username",
            ProfileField::Email => "email",
            ProfileField::Password => "password",
            ProfileField::Avatar => "avatar",
        }
    }
}

/// Fields changed locally and not yet submitted, layered over the stored user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProfileOverlay(BTreeMap<ProfileField, String>);

impl ProfileOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn display_value<'a>(&'a self, field: ProfileField, user: &'a User) -> &'a str {
        if let Some(value) = self.get(field) {
            return value;
        }
        match field {
            ProfileField::Username => &user.username,
            ProfileField::Email => &user.email,
            ProfileField::Avatar => &user.avatar_url,
            ProfileField::Password => "",
        }
    }

    pub fn avatar_src<'a>(&'a self, user: &'a User) -> &'a str {
        self.display_value(ProfileField::Avatar, user)
    }
}
