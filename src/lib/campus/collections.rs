use futures::future;
use log::{debug, info, warn};

use super::{
    backend::Backend,
    error::CampusError,
    helpers::{event_from_wire, log_all_events, user_from_wire},
    models::{
        wire_model::{EventPayload, NewUserRequest},
        Credential, Event, EventDraft, NewUser, Role, User,
    },
};

/// Client side snapshot of the institution's events and (for administrators) users.
///
/// Lists are only ever replaced wholesale from a fresh backend read, or
/// cleared. A write is never applied locally: after it succeeds the matching
/// list is fetched again, and after it fails nothing changes. Every operation
/// borrows the store mutably, so two refreshes can not interleave.
#[derive(Debug, Default)]
pub struct Collections {
    events: Vec<Event>,
    users: Vec<User>,
}

impl Collections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.users.clear();
    }

    #[cfg(test)]
    pub(crate) fn replace_events_for_test(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    pub async fn refresh_events<B: Backend>(
        &mut self,
        backend: &B,
        credential: &Credential,
    ) -> Result<(), CampusError> {
        let events = backend
            .list_events(credential, None)
            .await?
            .into_iter()
            .map(event_from_wire)
            .collect::<Vec<_>>();
        info!("Loaded {} events", events.len());
        log_all_events(&events);
        self.events = events;
        Ok(())
    }

    pub async fn refresh_users<B: Backend>(
        &mut self,
        backend: &B,
        credential: &Credential,
        viewer: &User,
    ) -> Result<(), CampusError> {
        require_admin(viewer)?;
        let users = backend
            .list_users(credential)
            .await?
            .into_iter()
            .map(|wire| user_from_wire(wire, Some(&viewer.institution)))
            .collect::<Vec<_>>();
        info!("Loaded {} users", users.len());
        self.users = users;
        Ok(())
    }

    /// Loads everything the viewer's role is entitled to, with both reads in flight at once.
    ///
    /// Each list is applied on its own: a failed users read does not discard
    /// the events, and the other way round. The first error is returned.
    pub async fn refresh_all<B: Backend>(
        &mut self,
        backend: &B,
        credential: &Credential,
        viewer: &User,
    ) -> Result<(), CampusError> {
        let users = async {
            match viewer.role {
                Role::Admin => backend.list_users(credential).await.map(Some),
                _ => Ok(None),
            }
        };
        let (events, users) = future::join(backend.list_events(credential, None), users).await;

        let events = match events {
            Ok(events) => {
                self.events = events.into_iter().map(event_from_wire).collect();
                info!("Loaded {} events", self.events.len());
                log_all_events(&self.events);
                Ok(())
            }
            Err(err) => {
                warn!("Could not load events: {}", err);
                Err(err)
            }
        };
        let users = match users {
            Ok(Some(users)) => {
                self.users = users
                    .into_iter()
                    .map(|wire| user_from_wire(wire, Some(&viewer.institution)))
                    .collect();
                info!("Loaded {} users", self.users.len());
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                warn!("Could not load users: {}", err);
                Err(err)
            }
        };
        events.and(users)
    }

    pub async fn create_event<B: Backend>(
        &mut self,
        backend: &B,
        credential: &Credential,
        draft: &EventDraft,
    ) -> Result<(), CampusError> {
        draft.validate()?;
        let created = backend
            .create_event(credential, &EventPayload::from(draft))
            .await?;
        debug!("Backend created event {}", created.id);
        self.refresh_events(backend, credential).await
    }

    pub async fn update_event<B: Backend>(
        &mut self,
        backend: &B,
        credential: &Credential,
        id: &str,
        draft: &EventDraft,
    ) -> Result<(), CampusError> {
        draft.validate()?;
        backend
            .update_event(credential, id, &EventPayload::from(draft))
            .await?;
        debug!("Backend updated event {}", id);
        self.refresh_events(backend, credential).await
    }

    pub async fn delete_event<B: Backend>(
        &mut self,
        backend: &B,
        credential: &Credential,
        id: &str,
    ) -> Result<(), CampusError> {
        backend.delete_event(credential, id).await?;
        debug!("Backend deleted event {}", id);
        self.refresh_events(backend, credential).await
    }

    pub async fn create_user<B: Backend>(
        &mut self,
        backend: &B,
        credential: &Credential,
        viewer: &User,
        new_user: &NewUser,
    ) -> Result<(), CampusError> {
        require_admin(viewer)?;
        new_user.validate()?;
        let created = backend
            .create_user(credential, &NewUserRequest::from(new_user))
            .await?;
        debug!("Backend created user {}", created.id);
        self.refresh_users(backend, credential, viewer).await
    }

    pub async fn delete_user<B: Backend>(
        &mut self,
        backend: &B,
        credential: &Credential,
        viewer: &User,
        id: &str,
    ) -> Result<(), CampusError> {
        require_admin(viewer)?;
        if viewer.id == id {
            return Err(CampusError::Forbidden(
                "You cannot delete your own account.".to_owned(),
            ));
        }
        backend.delete_user(credential, id).await?;
        debug!("Backend deleted user {}", id);
        self.refresh_users(backend, credential, viewer).await
    }
}

fn require_admin(viewer: &User) -> Result<(), CampusError> {
    match viewer.role {
        Role::Admin => Ok(()),
        role => Err(CampusError::Forbidden(format!(
            "A {} cannot manage users",
            role
        ))),
    }
}
