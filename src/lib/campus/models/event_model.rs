use chrono::{DateTime, Utc};

use crate::campus::error::CampusError;

/// Which students an event is meant for.
///
/// `Unrecognized` only ever comes from the backend: a tag this client does not
/// know, or a department/class audience without a value. It is never visible
/// to students and cannot be sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    General,
    Department(String),
    Class(String),
    Unrecognized { kind: String },
}

impl Audience {
    pub fn department(name: impl Into<String>) -> Result<Self, CampusError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CampusError::Validation(
                "Department audience needs a department name".to_owned(),
            ));
        }
        Ok(Audience::Department(name))
    }

    pub fn class(name: impl Into<String>) -> Result<Self, CampusError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CampusError::Validation(
                "Class audience needs a class name".to_owned(),
            ));
        }
        Ok(Audience::Class(name))
    }

    /// Builds an audience out of the two flat wire fields. Total.
    pub fn from_wire(kind: &str, value: Option<String>) -> Self {
        let value = value.filter(|v| !v.is_empty());
        match (kind, value) {
            ("general", _) => Audience::General,
            ("department", Some(v)) => Audience::Department(v),
            ("class", Some(v)) => Audience::Class(v),
            (other, _) => Audience::Unrecognized {
                kind: other.to_owned(),
            },
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Audience::General => "general",
            Audience::Department(_) => "department",
            Audience::Class(_) => "class",
            Audience::Unrecognized { kind } => kind,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Audience::Department(v) | Audience::Class(v) => Some(v),
            Audience::General | Audience::Unrecognized { .. } => None,
        }
    }

    /// Parses the `general` / `department` / `class` keyword used on the command line.
    pub fn parse(kind: &str, value: Option<String>) -> Result<Self, CampusError> {
        match kind {
            "general" => Ok(Audience::General),
            "department" => Audience::department(value.unwrap_or_default()),
            "class" => Audience::class(value.unwrap_or_default()),
            other => Err(CampusError::Validation(format!(
                "Unknown audience type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub registered_at: DateTime<Utc>,
}

/// Feedback as it was submitted. Never read back from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub event_id: String,
    pub student_id: String,
    pub student_name: String,
    pub rating: u8,
    pub comment: String,
    pub submitted_at: DateTime<Utc>,
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub creator_id: String,
    pub creator_name: String,
    pub institution: String,
    pub audience: Audience,
    pub registrations: Vec<Registration>,
    pub feedback: Vec<Feedback>,
    /// Whether the viewing student is registered, as reported by the list endpoint.
    pub registered: bool,
    pub reported_registrations: Option<u32>,
}

impl Event {
    pub fn registration_count(&self) -> usize {
        if !self.registrations.is_empty() {
            return self.registrations.len();
        }
        self.reported_registrations.unwrap_or(0) as usize
    }
}

/// Everything needed to create or edit an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub audience: Audience,
}

impl EventDraft {
    pub fn validate(&self) -> Result<(), CampusError> {
        for (field, value) in [
            ("Title", &self.title),
            ("Description", &self.description),
            ("Location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(CampusError::Validation(format!("{} is required", field)));
            }
        }
        if let Audience::Unrecognized { kind } = &self.audience {
            return Err(CampusError::Validation(format!(
                "Unknown audience type '{}'",
                kind
            )));
        }
        Ok(())
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        EventDraft {
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            location: event.location.clone(),
            audience: event.audience.clone(),
        }
    }
}
