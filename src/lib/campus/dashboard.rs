use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{
    collections::Collections,
    helpers::{is_visible, partition_by_time, TimeSplit},
    models::{Event, Role, User},
};

/// How many events the analytics chart shows.
pub const ANALYTICS_TOP_EVENTS: usize = 5;

/// What one signed in user gets to see, resolved once from their role.
#[derive(Debug, PartialEq)]
pub enum Dashboard<'a> {
    /// Every event of the institution, plus its users.
    Admin {
        events: TimeSplit<'a>,
        users: &'a [User],
        analytics: Analytics,
    },
    /// Only the events this lecturer created.
    Lecturer { events: TimeSplit<'a> },
    /// Events whose audience includes the student.
    Student { events: TimeSplit<'a> },
}

impl<'a> Dashboard<'a> {
    pub fn build(viewer: &User, collections: &'a Collections, now: DateTime<Utc>) -> Self {
        let all = collections.events();
        match viewer.role {
            Role::Admin => Dashboard::Admin {
                events: partition_by_time(all, now),
                users: collections.users(),
                analytics: Analytics::summarize(all, collections.users()),
            },
            Role::Lecturer => Dashboard::Lecturer {
                events: partition_by_time(
                    all.iter().filter(|event| event.creator_id == viewer.id),
                    now,
                ),
            },
            Role::Student => Dashboard::Student {
                events: partition_by_time(
                    all.iter().filter(|event| {
                        is_visible(
                            &event.audience,
                            viewer.department.as_deref(),
                            viewer.class_section.as_deref(),
                        )
                    }),
                    now,
                ),
            },
        }
    }

    pub fn events(&self) -> &TimeSplit<'a> {
        match self {
            Dashboard::Admin { events, .. }
            | Dashboard::Lecturer { events }
            | Dashboard::Student { events } => events,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStat {
    pub title: String,
    pub registrations: usize,
}

/// Figures for the administrator's analytics tab, computed from loaded lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Analytics {
    pub total_events: usize,
    pub total_users: usize,
    pub total_registrations: usize,
    pub users_by_role: BTreeMap<Role, usize>,
    pub top_events: Vec<EventStat>,
}

impl Analytics {
    pub fn summarize(events: &[Event], users: &[User]) -> Self {
        let mut users_by_role = BTreeMap::new();
        for user in users {
            *users_by_role.entry(user.role).or_insert(0) += 1;
        }
        Analytics {
            total_events: events.len(),
            total_users: users.len(),
            total_registrations: events.iter().map(Event::registration_count).sum(),
            users_by_role,
            top_events: events
                .iter()
                .take(ANALYTICS_TOP_EVENTS)
                .map(|event| EventStat {
                    title: event.title.clone(),
                    registrations: event.registration_count(),
                })
                .collect(),
        }
    }
}
