use chrono::{DateTime, Utc};
use log::{info, warn};

use super::{
    backend::Backend,
    collections::Collections,
    dashboard::Dashboard,
    error::CampusError,
    helpers::{event_from_wire, registration_from_wire},
    models::{
        wire_model::{FeedbackPayload, ProfileUpdateRequest},
        Event, EventDraft, Feedback, IdentityPatch, Institution, NewUser, ProfileUpdate,
        Registration, Role, User,
    },
    session::Session,
    token_store::TokenStore,
};

/// The client, wired once at start-up and handed to whatever presents it.
///
/// Owns the backend, the session and the collections; every user action goes
/// through here so role checks and the refresh protocol live in one place.
pub struct App<B: Backend, S: TokenStore> {
    backend: B,
    session: Session<S>,
    collections: Collections,
}

impl<B: Backend, S: TokenStore> App<B, S> {
    pub fn new(backend: B, store: S) -> Self {
        App {
            backend,
            session: Session::new(store),
            collections: Collections::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    /// Restores a stored session and, when that works, loads the collections.
    pub async fn start(&mut self) {
        self.session.restore(&self.backend).await;
        self.load_collections().await;
    }

    async fn load_collections(&mut self) {
        let Ok((viewer, credential)) = self.session.require() else {
            return;
        };
        if let Err(err) = self
            .collections
            .refresh_all(&self.backend, credential, viewer)
            .await
        {
            warn!("Could not load collections: {}", err);
        }
    }

    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        institution: &str,
    ) -> Result<(), CampusError> {
        self.session
            .login(&self.backend, email, password, institution)
            .await?;
        self.collections.clear();
        self.load_collections().await;
        Ok(())
    }

    pub async fn signup(
        &mut self,
        email: &str,
        password: &str,
        institution: &str,
    ) -> Result<(), CampusError> {
        self.session
            .signup(&self.backend, email, password, institution)
            .await?;
        self.collections.clear();
        self.load_collections().await;
        Ok(())
    }

    /// Signs out and drops every loaded list so nothing leaks into the next session.
    pub fn logout(&mut self) {
        self.session.logout();
        self.collections.clear();
    }

    pub async fn institutions(&self) -> Result<Vec<Institution>, CampusError> {
        self.backend.list_institutions().await
    }

    /// Sends a profile change and mirrors the confirmed name locally.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<(), CampusError> {
        update.validate()?;
        let request = ProfileUpdateRequest::from(update);
        let (_, credential) = self.session.require()?;
        let confirmed = self.backend.update_profile(credential, &request).await?;
        info!("Profile of {} updated", confirmed.email);
        if request.username.is_some() {
            self.session.update_identity(IdentityPatch {
                username: confirmed.username.or(request.username),
                ..IdentityPatch::default()
            });
        }
        Ok(())
    }

    pub async fn create_event(&mut self, draft: &EventDraft) -> Result<(), CampusError> {
        let (viewer, credential) = self.session.require()?;
        require_organiser(viewer)?;
        self.collections
            .create_event(&self.backend, credential, draft)
            .await
    }

    pub async fn update_event(&mut self, id: &str, draft: &EventDraft) -> Result<(), CampusError> {
        let (viewer, credential) = self.session.require()?;
        require_owner(viewer, &self.collections, id)?;
        self.collections
            .update_event(&self.backend, credential, id, draft)
            .await
    }

    pub async fn delete_event(&mut self, id: &str) -> Result<(), CampusError> {
        let (viewer, credential) = self.session.require()?;
        require_owner(viewer, &self.collections, id)?;
        self.collections
            .delete_event(&self.backend, credential, id)
            .await
    }

    pub async fn refresh_events(&mut self) -> Result<(), CampusError> {
        let (_, credential) = self.session.require()?;
        self.collections
            .refresh_events(&self.backend, credential)
            .await
    }

    pub async fn refresh_users(&mut self) -> Result<(), CampusError> {
        let (viewer, credential) = self.session.require()?;
        self.collections
            .refresh_users(&self.backend, credential, viewer)
            .await
    }

    pub async fn create_user(&mut self, new_user: &NewUser) -> Result<(), CampusError> {
        let (viewer, credential) = self.session.require()?;
        self.collections
            .create_user(&self.backend, credential, viewer, new_user)
            .await
    }

    pub async fn delete_user(&mut self, id: &str) -> Result<(), CampusError> {
        let (viewer, credential) = self.session.require()?;
        self.collections
            .delete_user(&self.backend, credential, viewer, id)
            .await
    }

    /// Registers the signed in student, then reloads events so the flag comes from the backend.
    pub async fn register(&mut self, event_id: &str) -> Result<(), CampusError> {
        let (viewer, credential) = self.session.require()?;
        require_role(viewer, Role::Student, "register for events")?;
        self.backend.register(credential, event_id).await?;
        info!("{} registered for event {}", viewer.email, event_id);
        self.collections
            .refresh_events(&self.backend, credential)
            .await
    }

    pub async fn submit_feedback(
        &self,
        event_id: &str,
        rating: u8,
        comment: &str,
    ) -> Result<Feedback, CampusError> {
        let (viewer, credential) = self.session.require()?;
        require_role(viewer, Role::Student, "leave feedback")?;
        let payload = FeedbackPayload::new(rating, comment)?;
        self.backend
            .submit_feedback(credential, event_id, &payload)
            .await?;
        info!("{} left feedback on event {}", viewer.email, event_id);
        Ok(Feedback {
            event_id: event_id.to_owned(),
            student_id: viewer.id.clone(),
            student_name: viewer.display_name().to_owned(),
            rating: payload.rating,
            comment: payload.comment,
            submitted_at: Utc::now(),
        })
    }

    /// Fetches one event with its registrations. Nothing is stored.
    pub async fn event_details(&self, event_id: &str) -> Result<Event, CampusError> {
        let (_, credential) = self.session.require()?;
        let event = event_from_wire(self.backend.get_event(credential, event_id).await?);
        Ok(event)
    }

    /// Whether the signed in user may see who registered for an event.
    pub fn can_view_registrations(&self, event_id: &str) -> bool {
        self.session
            .identity()
            .is_some_and(|viewer| require_owner(viewer, &self.collections, event_id).is_ok())
    }

    /// Registrations of one event, fetched on demand for its organisers.
    pub async fn registrations(&self, event_id: &str) -> Result<Vec<Registration>, CampusError> {
        let (viewer, credential) = self.session.require()?;
        require_owner(viewer, &self.collections, event_id)?;
        let event = self.backend.get_event(credential, event_id).await?;
        Ok(event
            .registrations
            .unwrap_or_default()
            .into_iter()
            .map(registration_from_wire)
            .collect())
    }

    /// Backend-side filtered read; leaves the stored lists alone.
    pub async fn query_events(&self, filter: Option<&str>) -> Result<Vec<Event>, CampusError> {
        let (_, credential) = self.session.require()?;
        Ok(self
            .backend
            .list_events(credential, filter)
            .await?
            .into_iter()
            .map(event_from_wire)
            .collect())
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> Result<Dashboard<'_>, CampusError> {
        let (viewer, _) = self.session.require()?;
        Ok(Dashboard::build(viewer, &self.collections, now))
    }

    pub fn identity(&self) -> Option<&User> {
        self.session.identity()
    }
}

fn require_role(viewer: &User, role: Role, action: &str) -> Result<(), CampusError> {
    if viewer.role == role {
        Ok(())
    } else {
        Err(CampusError::Forbidden(format!(
            "Only a {} can {}",
            role, action
        )))
    }
}

fn require_organiser(viewer: &User) -> Result<(), CampusError> {
    match viewer.role {
        Role::Admin | Role::Lecturer => Ok(()),
        Role::Student => Err(CampusError::Forbidden(
            "Only administrators and lecturers can manage events".to_owned(),
        )),
    }
}

/// Lecturers may only manage events they created; administrators any.
fn require_owner(viewer: &User, collections: &Collections, id: &str) -> Result<(), CampusError> {
    require_organiser(viewer)?;
    if viewer.role == Role::Lecturer {
        match collections.event(id) {
            Some(event) if event.creator_id == viewer.id => {}
            _ => {
                return Err(CampusError::Forbidden(
                    "You can only manage events you created".to_owned(),
                ))
            }
        }
    }
    Ok(())
}
