use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use log::debug;

use super::models::{
    wire_model::{ErrorBody, WireEvent, WireRegistration, WireUser},
    Audience, Event, Registration, User,
};

pub fn log_all_events(events: &[Event]) -> () {
    for event in events.iter() {
        debug!(
            "Holding event {} '{}' on {} for {:?}",
            event.id, event.title, event.date, event.audience
        );
    }
}

/// Maps a backend user. The users list omits the institution, so the caller
/// passes the one the records belong to.
pub fn user_from_wire(wire: WireUser, home_institution: Option<&str>) -> User {
    User {
        id: wire.id,
        email: wire.email,
        username: wire.username,
        role: wire.role,
        institution: wire
            .institution
            .or_else(|| home_institution.map(str::to_owned))
            .unwrap_or_default(),
        department: wire.department,
        class_section: wire.class_level,
    }
}

pub fn registration_from_wire(wire: WireRegistration) -> Registration {
    let student_name = match wire.username.filter(|name| !name.is_empty()) {
        Some(name) => name,
        None => wire
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_owned(),
    };
    Registration {
        student_id: wire.student_id.or(wire.id).unwrap_or_default(),
        student_name,
        student_email: wire.email,
        registered_at: wire.registered_at,
    }
}

pub fn event_from_wire(wire: WireEvent) -> Event {
    Event {
        id: wire.id,
        title: wire.title,
        description: wire.description,
        location: wire.location,
        date: wire.event_date,
        creator_id: wire.creator_id,
        creator_name: wire.creator_name.unwrap_or_default(),
        institution: wire.institution.unwrap_or_default(),
        audience: Audience::from_wire(&wire.target_audience_type, wire.target_audience_value),
        registrations: wire
            .registrations
            .unwrap_or_default()
            .into_iter()
            .map(registration_from_wire)
            .collect(),
        feedback: Vec::new(),
        registered: wire.is_registered,
        reported_registrations: wire.registration_count,
    }
}

/// Whether a student from `department`/`class` may see an event for `audience`.
pub fn is_visible(audience: &Audience, department: Option<&str>, class: Option<&str>) -> bool {
    match audience {
        Audience::General => true,
        Audience::Department(name) => department == Some(name.as_str()),
        Audience::Class(name) => class == Some(name.as_str()),
        Audience::Unrecognized { .. } => false,
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct TimeSplit<'a> {
    pub upcoming: Vec<&'a Event>,
    pub past: Vec<&'a Event>,
}

impl<'a> TimeSplit<'a> {
    pub fn len(&self) -> usize {
        self.upcoming.len() + self.past.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits events around `now`; an event is upcoming iff it starts strictly after `now`.
pub fn partition_by_time<'a, I>(events: I, now: DateTime<Utc>) -> TimeSplit<'a>
where
    I: IntoIterator<Item = &'a Event>,
{
    let (upcoming, past) = events.into_iter().partition(|event| event.date > now);
    TimeSplit { upcoming, past }
}

/// Message for a failed reply: the body's `error` field, else `HTTP <status>`.
pub fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// Accepts an RFC 3339 instant or a local `YYYY-MM-DDTHH:MM[:SS]` (also with a space).
pub fn parse_event_date(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc))
                .ok_or_else(|| format!("'{}' does not exist in the local time zone", input));
        }
    }
    Err(format!(
        "'{}' is not a date, expected e.g. 2025-03-14T15:00 or 2025-03-14T15:00:00Z",
        input
    ))
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
