use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::campus::error::CampusError;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Lecturer,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Lecturer => "lecturer",
            Role::Student => "student",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "lecturer" => Ok(Role::Lecturer),
            "student" => Ok(Role::Student),
            other => Err(format!(
                "unknown role '{}', expected admin, lecturer or student",
                other
            )),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a signed in (or listed) user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub role: Role,
    pub institution: String,
    pub department: Option<String>,
    pub class_section: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Local mirror of a profile change the backend already confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityPatch {
    pub username: Option<String>,
    pub department: Option<String>,
    pub class_section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub class_section: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), CampusError> {
        if self.email.trim().is_empty() {
            return Err(CampusError::Validation("Email is required".to_owned()));
        }
        match self.role {
            Role::Admin => Err(CampusError::Validation(
                "Administrators can only be created through signup".to_owned(),
            )),
            Role::Student if is_blank(&self.department) || is_blank(&self.class_section) => Err(
                CampusError::Validation("Students need both a department and a class".to_owned()),
            ),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), CampusError> {
        if is_blank(&self.username) && is_blank(&self.new_password) {
            return Err(CampusError::Validation("Nothing to update".to_owned()));
        }
        if !is_blank(&self.new_password) && is_blank(&self.current_password) {
            return Err(CampusError::Validation(
                "Current password is required to change password".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    #[serde(deserialize_with = "crate::campus::models::wire_model::loose_string")]
    pub id: String,
    pub name: String,
}

/// Opaque bearer token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
