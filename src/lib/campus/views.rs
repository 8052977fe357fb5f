//! Plain text presentation of what the stores hold.

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};

use super::{
    dashboard::{Analytics, Dashboard},
    helpers::TimeSplit,
    models::{Audience, Event, Feedback, Institution, Registration, User},
};

fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_audience(audience: &Audience) -> String {
    match audience {
        Audience::General => "General".to_owned(),
        Audience::Department(name) => format!("Dept: {}", name),
        Audience::Class(name) => format!("Class: {}", name),
        Audience::Unrecognized { kind } => format!("Unknown ({})", kind),
    }
}

pub fn format_event_line(event: &Event) -> String {
    let mut line = format!(
        "[{}] {} | {} | {} | {} | by {}",
        event.id,
        event.title,
        format_date(&event.date),
        event.location,
        format_audience(&event.audience),
        event.creator_name
    );
    if event.registered {
        line.push_str(" | registered");
    }
    line
}

pub fn render_event(event: &Event, registrations: Option<&[Registration]>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", event.title);
    let _ = writeln!(out, "  When:     {}", format_date(&event.date));
    let _ = writeln!(out, "  Where:    {}", event.location);
    let _ = writeln!(out, "  Audience: {}", format_audience(&event.audience));
    let _ = writeln!(out, "  Creator:  {}", event.creator_name);
    let _ = writeln!(out, "  {}", event.description);
    if let Some(registrations) = registrations {
        let _ = writeln!(out, "Registrations ({}):", registrations.len());
        if registrations.is_empty() {
            let _ = writeln!(out, "  No students have registered yet.");
        }
        for registration in registrations {
            let _ = writeln!(
                out,
                "  {} <{}> at {}",
                registration.student_name,
                registration.student_email,
                format_date(&registration.registered_at)
            );
        }
    }
    out
}

fn render_split(out: &mut String, events: &TimeSplit<'_>) {
    let _ = writeln!(out, "Upcoming events ({}):", events.upcoming.len());
    for event in &events.upcoming {
        let _ = writeln!(out, "  {}", format_event_line(event));
    }
    let _ = writeln!(out, "Past events ({}):", events.past.len());
    for event in &events.past {
        let _ = writeln!(out, "  {}", format_event_line(event));
    }
}

pub fn render_users(users: &[User]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Users ({}):", users.len());
    for user in users {
        let mut line = format!(
            "  [{}] {} <{}> {}",
            user.id,
            user.display_name(),
            user.email,
            user.role
        );
        if let Some(department) = &user.department {
            let _ = write!(line, " | {}", department);
        }
        if let Some(class_section) = &user.class_section {
            let _ = write!(line, " | {}", class_section);
        }
        let _ = writeln!(out, "{}", line);
    }
    out
}

pub fn render_analytics(analytics: &Analytics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total events:        {}", analytics.total_events);
    let _ = writeln!(out, "Total users:         {}", analytics.total_users);
    let _ = writeln!(out, "Total registrations: {}", analytics.total_registrations);
    for (role, count) in &analytics.users_by_role {
        let _ = writeln!(out, "  {}s: {}", role, count);
    }
    if !analytics.top_events.is_empty() {
        let _ = writeln!(out, "Registrations per event:");
        for stat in &analytics.top_events {
            let _ = writeln!(out, "  {}: {}", stat.title, stat.registrations);
        }
    }
    out
}

pub fn render_dashboard(viewer: &User, dashboard: &Dashboard<'_>) -> String {
    let mut out = String::new();
    match dashboard {
        Dashboard::Admin {
            events,
            users,
            analytics,
        } => {
            let _ = writeln!(out, "Administrator dashboard for {}", viewer.institution);
            render_split(&mut out, events);
            out.push_str(&render_users(users));
            out.push_str(&render_analytics(analytics));
        }
        Dashboard::Lecturer { events } => {
            let _ = writeln!(out, "Lecturer dashboard for {}", viewer.display_name());
            render_split(&mut out, events);
        }
        Dashboard::Student { events } => {
            let _ = writeln!(out, "Student dashboard for {}", viewer.display_name());
            render_split(&mut out, events);
        }
    }
    out
}

pub fn render_identity(user: &User) -> String {
    let mut out = format!(
        "{} <{}>, {} at {}",
        user.display_name(),
        user.email,
        user.role,
        user.institution
    );
    if let Some(department) = &user.department {
        let _ = write!(out, ", {}", department);
    }
    if let Some(class_section) = &user.class_section {
        let _ = write!(out, ", {}", class_section);
    }
    out
}

pub fn render_institutions(institutions: &[Institution]) -> String {
    institutions
        .iter()
        .map(|institution| format!("[{}] {}", institution.id, institution.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_feedback(feedback: &Feedback) -> String {
    let stars = if feedback.rating == 1 { "star" } else { "stars" };
    format!(
        "Thank you for your feedback! {} {} for event {}",
        feedback.rating, stars, feedback.event_id
    )
}
