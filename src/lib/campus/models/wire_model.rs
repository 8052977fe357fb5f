//! Records exactly as the REST backend sends and expects them.
//!
//! Incoming records are snake_case, outgoing payloads camelCase. Ids and flags
//! may arrive as strings or numbers depending on the backend's database
//! driver, so they go through the `loose_*` helpers below.

use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use super::{
    event_model::{EventDraft, MAX_RATING, MIN_RATING},
    user_model::{Institution, NewUser, ProfileUpdate, Role},
};
use crate::campus::error::CampusError;

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Flag(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

pub fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Text(s) => Ok(s),
        LooseScalar::Int(n) => Ok(n.to_string()),
        LooseScalar::Float(f) => Ok(f.to_string()),
        LooseScalar::Flag(_) => Err(D::Error::custom("expected an id, found a boolean")),
    }
}

pub fn loose_string_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Option::<LooseScalar>::deserialize(deserializer)? {
        Some(LooseScalar::Text(s)) => Some(s),
        Some(LooseScalar::Int(n)) => Some(n.to_string()),
        Some(LooseScalar::Float(f)) => Some(f.to_string()),
        Some(LooseScalar::Flag(_)) | None => None,
    })
}

pub fn loose_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<LooseScalar>::deserialize(deserializer)? {
        Some(LooseScalar::Flag(b)) => b,
        Some(LooseScalar::Int(n)) => n != 0,
        Some(LooseScalar::Float(f)) => f != 0.0,
        Some(LooseScalar::Text(s)) => s == "1" || s.eq_ignore_ascii_case("true"),
        None => false,
    })
}

pub fn loose_count<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    Ok(match Option::<LooseScalar>::deserialize(deserializer)? {
        Some(LooseScalar::Int(n)) => u32::try_from(n).ok(),
        Some(LooseScalar::Text(s)) => s.trim().parse().ok(),
        Some(LooseScalar::Float(_)) | Some(LooseScalar::Flag(_)) | None => None,
    })
}

#[derive(Deserialize, Debug, Clone)]
pub struct WireUser {
    #[serde(deserialize_with = "loose_string")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub role: Role,
    #[serde(default, deserialize_with = "loose_string_opt")]
    pub institution: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "classLevel")]
    pub class_level: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WireRegistration {
    #[serde(default, deserialize_with = "loose_string_opt")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "loose_string_opt")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WireEvent {
    #[serde(deserialize_with = "loose_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(deserialize_with = "loose_string")]
    pub creator_id: String,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default, deserialize_with = "loose_string_opt")]
    pub institution: Option<String>,
    pub target_audience_type: String,
    #[serde(default)]
    pub target_audience_value: Option<String>,
    #[serde(default)]
    pub registrations: Option<Vec<WireRegistration>>,
    #[serde(default, deserialize_with = "loose_flag")]
    pub is_registered: bool,
    #[serde(default, deserialize_with = "loose_count")]
    pub registration_count: Option<u32>,
}

/* Response envelopes */

#[derive(Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: WireUser,
}

#[derive(Deserialize, Debug)]
pub struct UserEnvelope {
    pub user: WireUser,
}

#[derive(Deserialize, Debug)]
pub struct UsersEnvelope {
    pub users: Vec<WireUser>,
}

#[derive(Deserialize, Debug)]
pub struct EventEnvelope {
    pub event: WireEvent,
}

#[derive(Deserialize, Debug)]
pub struct EventsEnvelope {
    pub events: Vec<WireEvent>,
}

#[derive(Deserialize, Debug)]
pub struct InstitutionsEnvelope {
    pub institutions: Vec<Institution>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/* Request payloads */

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub institution_name: &'a str,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl From<&ProfileUpdate> for ProfileUpdateRequest {
    fn from(update: &ProfileUpdate) -> Self {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        let new_password = non_empty(&update.new_password);
        ProfileUpdateRequest {
            username: non_empty(&update.username),
            current_password: new_password
                .as_ref()
                .and_then(|_| non_empty(&update.current_password)),
            new_password,
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRequest {
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_level: Option<String>,
}

impl From<&NewUser> for NewUserRequest {
    fn from(user: &NewUser) -> Self {
        NewUserRequest {
            email: user.email.trim().to_owned(),
            role: user.role,
            department: user.department.clone(),
            class_level: user.class_section.clone(),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub target_audience_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience_value: Option<String>,
}

impl From<&EventDraft> for EventPayload {
    fn from(draft: &EventDraft) -> Self {
        EventPayload {
            title: draft.title.clone(),
            description: draft.description.clone(),
            event_date: draft.date,
            location: draft.location.clone(),
            target_audience_type: draft.audience.kind().to_owned(),
            target_audience_value: draft.audience.value().map(str::to_owned),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct FeedbackPayload {
    pub rating: u8,
    pub comment: String,
}

impl FeedbackPayload {
    pub fn new(rating: u8, comment: impl Into<String>) -> Result<Self, CampusError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(CampusError::Validation(format!(
                "Please select a rating between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        Ok(FeedbackPayload {
            rating,
            comment: comment.into(),
        })
    }
}
