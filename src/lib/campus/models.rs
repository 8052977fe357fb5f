use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use super::helpers::parse_event_date;

pub mod event_model;
pub mod user_model;
pub mod wire_model;

pub use event_model::{Audience, Event, EventDraft, Feedback, Registration};
pub use user_model::{
    Credential, IdentityPatch, Institution, NewUser, ProfileUpdate, Role, User,
};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TOKEN_PATH: &str = ".campus_token.json";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

/// Model for `config.json`, overridable with `CAMPUS_*` variables.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub token_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_owned(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List institutions known to the backend
    Institutions,
    /// Register a new institution administrator
    Signup(AuthArgs),
    Login(AuthArgs),
    Logout,
    /// Show the signed in identity
    Whoami,
    /// Change display name or password
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        current_password: Option<String>,
        #[arg(long)]
        new_password: Option<String>,
    },
    /// Show the dashboard for the signed in role
    Dashboard,
    #[command(subcommand)]
    Events(EventsCommand),
    #[command(subcommand)]
    Users(UsersCommand),
    /// Registration and user statistics (administrators)
    Analytics,
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct AuthArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub institution: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum EventsCommand {
    /// Ask the backend for events, optionally with its `filter` parameter
    List {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show one event, with registrations for its organisers
    Show { id: String },
    Create(EventArgs),
    Update {
        id: String,
        #[command(flatten)]
        changes: EventChanges,
    },
    Delete { id: String },
    Register { id: String },
    Feedback {
        id: String,
        #[arg(long)]
        rating: u8,
        #[arg(long, default_value = "")]
        comment: String,
    },
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct EventArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    /// RFC 3339 instant or local `YYYY-MM-DDTHH:MM`
    #[arg(long, value_parser = parse_event_date)]
    pub date: DateTime<Utc>,
    #[arg(long)]
    pub location: String,
    /// general, department or class
    #[arg(long, default_value = "general")]
    pub audience: String,
    #[arg(long)]
    pub audience_value: Option<String>,
}

#[derive(clap::Args, Debug, Clone, PartialEq, Default)]
pub struct EventChanges {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_parser = parse_event_date)]
    pub date: Option<DateTime<Utc>>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub audience: Option<String>,
    #[arg(long)]
    pub audience_value: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum UsersCommand {
    List,
    /// Onboard a lecturer or student
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        department: Option<String>,
        #[arg(long = "class")]
        class_section: Option<String>,
    },
    Delete { id: String },
}
