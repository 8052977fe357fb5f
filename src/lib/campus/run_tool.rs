use chrono::{DateTime, Utc};
use log::info;

use super::{
    app::App,
    backend::Backend,
    dashboard::Analytics,
    error::CampusError,
    models::{
        Audience, Command, EventArgs, EventChanges, EventDraft, EventsCommand, NewUser,
        ProfileUpdate, Role, UsersCommand,
    },
    token_store::TokenStore,
    views,
};

/// Carries out one command against an already started `App` and returns what to print.
pub async fn run<B: Backend, S: TokenStore>(
    app: &mut App<B, S>,
    command: Command,
    now: DateTime<Utc>,
) -> Result<String, CampusError> {
    match command {
        Command::Institutions => Ok(views::render_institutions(&app.institutions().await?)),
        Command::Signup(auth) => {
            app.signup(&auth.email, &auth.password, &auth.institution)
                .await?;
            Ok(signed_in_message(app))
        }
        Command::Login(auth) => {
            app.login(&auth.email, &auth.password, &auth.institution)
                .await?;
            Ok(signed_in_message(app))
        }
        Command::Logout => {
            app.logout();
            Ok("Signed out".to_owned())
        }
        Command::Whoami => match app.identity() {
            Some(user) => Ok(views::render_identity(user)),
            None => Ok("Not signed in".to_owned()),
        },
        Command::Profile {
            username,
            current_password,
            new_password,
        } => {
            app.update_profile(&ProfileUpdate {
                username,
                current_password,
                new_password,
            })
            .await?;
            Ok("Profile updated successfully!".to_owned())
        }
        Command::Dashboard => {
            let dashboard = app.dashboard(now)?;
            let viewer = app.identity().ok_or(CampusError::NotAuthenticated)?;
            Ok(views::render_dashboard(viewer, &dashboard))
        }
        Command::Events(events) => run_events(app, events).await,
        Command::Users(users) => run_users(app, users).await,
        Command::Analytics => {
            let viewer = app.identity().ok_or(CampusError::NotAuthenticated)?;
            if viewer.role != Role::Admin {
                return Err(CampusError::Forbidden(
                    "Only administrators can view analytics".to_owned(),
                ));
            }
            let collections = app.collections();
            let analytics = Analytics::summarize(collections.events(), collections.users());
            Ok(views::render_analytics(&analytics))
        }
    }
}

async fn run_events<B: Backend, S: TokenStore>(
    app: &mut App<B, S>,
    command: EventsCommand,
) -> Result<String, CampusError> {
    match command {
        EventsCommand::List { filter } => {
            let events = app.query_events(filter.as_deref()).await?;
            Ok(events
                .iter()
                .map(views::format_event_line)
                .collect::<Vec<_>>()
                .join("\n"))
        }
        EventsCommand::Show { id } => {
            let event = app.event_details(&id).await?;
            let registrations = app
                .can_view_registrations(&id)
                .then_some(event.registrations.as_slice());
            Ok(views::render_event(&event, registrations))
        }
        EventsCommand::Create(args) => {
            let draft = draft_from_args(args)?;
            app.create_event(&draft).await?;
            info!("Created event '{}'", draft.title);
            Ok(format!("Created event '{}'", draft.title))
        }
        EventsCommand::Update { id, changes } => {
            let current = app
                .collections()
                .event(&id)
                .ok_or_else(|| CampusError::Validation(format!("No event with id {}", id)))?;
            let draft = apply_changes(EventDraft::from(current), changes)?;
            app.update_event(&id, &draft).await?;
            Ok(format!("Updated event '{}'", draft.title))
        }
        EventsCommand::Delete { id } => {
            app.delete_event(&id).await?;
            Ok(format!("Deleted event {}", id))
        }
        EventsCommand::Register { id } => {
            app.register(&id).await?;
            Ok("Successfully registered for the event! Check your email for confirmation."
                .to_owned())
        }
        EventsCommand::Feedback {
            id,
            rating,
            comment,
        } => {
            let feedback = app.submit_feedback(&id, rating, &comment).await?;
            Ok(views::render_feedback(&feedback))
        }
    }
}

async fn run_users<B: Backend, S: TokenStore>(
    app: &mut App<B, S>,
    command: UsersCommand,
) -> Result<String, CampusError> {
    match command {
        UsersCommand::List => {
            app.refresh_users().await?;
            Ok(views::render_users(app.collections().users()))
        }
        UsersCommand::Create {
            email,
            role,
            department,
            class_section,
        } => {
            let new_user = NewUser {
                email,
                role,
                department,
                class_section,
            };
            app.create_user(&new_user).await?;
            Ok(format!("Created {} {}", new_user.role, new_user.email))
        }
        UsersCommand::Delete { id } => {
            app.delete_user(&id).await?;
            Ok(format!("Deleted user {}", id))
        }
    }
}

fn signed_in_message<B: Backend, S: TokenStore>(app: &App<B, S>) -> String {
    match app.identity() {
        Some(user) => format!("Signed in as {}", views::render_identity(user)),
        None => "Signed in".to_owned(),
    }
}

pub fn draft_from_args(args: EventArgs) -> Result<EventDraft, CampusError> {
    let draft = EventDraft {
        title: args.title,
        description: args.description,
        date: args.date,
        location: args.location,
        audience: Audience::parse(&args.audience, args.audience_value)?,
    };
    draft.validate()?;
    Ok(draft)
}

/// Overlays the given changes on an existing event's draft.
pub fn apply_changes(
    mut draft: EventDraft,
    changes: EventChanges,
) -> Result<EventDraft, CampusError> {
    if let Some(title) = changes.title {
        draft.title = title;
    }
    if let Some(description) = changes.description {
        draft.description = description;
    }
    if let Some(date) = changes.date {
        draft.date = date;
    }
    if let Some(location) = changes.location {
        draft.location = location;
    }
    match (changes.audience, changes.audience_value) {
        (Some(kind), value) => draft.audience = Audience::parse(&kind, value)?,
        (None, Some(value)) => {
            draft.audience = Audience::parse(draft.audience.kind(), Some(value))?
        }
        (None, None) => {}
    }
    draft.validate()?;
    Ok(draft)
}
