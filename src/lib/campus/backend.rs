use log::{debug, info};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use super::{
    error::CampusError,
    helpers::error_message,
    models::{
        wire_model::{
            AuthRequest, AuthResponse, EventEnvelope, EventPayload, EventsEnvelope,
            FeedbackPayload, InstitutionsEnvelope, NewUserRequest, ProfileUpdateRequest,
            UserEnvelope, UsersEnvelope, WireEvent, WireUser,
        },
        Credential, Institution,
    },
};

/// A trait, necessary for every entity that talks to the event backend.
///
/// One method per REST operation. Replies are returned as wire records;
/// mapping into domain shapes happens in the stores.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn signup(&self, request: &AuthRequest<'_>) -> Result<AuthResponse, CampusError>;
    async fn login(&self, request: &AuthRequest<'_>) -> Result<AuthResponse, CampusError>;
    async fn get_profile(&self, credential: &Credential) -> Result<WireUser, CampusError>;
    async fn update_profile(
        &self,
        credential: &Credential,
        request: &ProfileUpdateRequest,
    ) -> Result<WireUser, CampusError>;
    async fn list_institutions(&self) -> Result<Vec<Institution>, CampusError>;

    async fn list_users(&self, credential: &Credential) -> Result<Vec<WireUser>, CampusError>;
    async fn create_user(
        &self,
        credential: &Credential,
        request: &NewUserRequest,
    ) -> Result<WireUser, CampusError>;
    async fn delete_user(&self, credential: &Credential, id: &str) -> Result<(), CampusError>;

    async fn list_events(
        &self,
        credential: &Credential,
        filter: Option<&str>,
    ) -> Result<Vec<WireEvent>, CampusError>;
    async fn get_event(&self, credential: &Credential, id: &str) -> Result<WireEvent, CampusError>;
    async fn create_event(
        &self,
        credential: &Credential,
        payload: &EventPayload,
    ) -> Result<WireEvent, CampusError>;
    async fn update_event(
        &self,
        credential: &Credential,
        id: &str,
        payload: &EventPayload,
    ) -> Result<WireEvent, CampusError>;
    async fn delete_event(&self, credential: &Credential, id: &str) -> Result<(), CampusError>;
    async fn register(&self, credential: &Credential, id: &str) -> Result<(), CampusError>;
    async fn submit_feedback(
        &self,
        credential: &Credential,
        id: &str,
        payload: &FeedbackPayload,
    ) -> Result<(), CampusError>;
}

/// Talks JSON over HTTP to the backend rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        info!("Using backend at {}", base_url);
        HttpBackend { client, base_url }
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        credential: Option<&Credential>,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match credential {
            Some(credential) => builder.bearer_auth(credential.as_str()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, CampusError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(status.as_u16(), &body);
        debug!("Backend answered {}: {}", status, message);
        Err(CampusError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, CampusError> {
        Ok(self.send(builder).await?.json().await?)
    }
}

impl Backend for HttpBackend {
    async fn signup(&self, request: &AuthRequest<'_>) -> Result<AuthResponse, CampusError> {
        self.send_json(self.request(Method::POST, "/auth/signup", None).json(request))
            .await
    }

    async fn login(&self, request: &AuthRequest<'_>) -> Result<AuthResponse, CampusError> {
        self.send_json(self.request(Method::POST, "/auth/login", None).json(request))
            .await
    }

    async fn get_profile(&self, credential: &Credential) -> Result<WireUser, CampusError> {
        let envelope: UserEnvelope = self
            .send_json(self.request(Method::GET, "/auth/profile", Some(credential)))
            .await?;
        Ok(envelope.user)
    }

    async fn update_profile(
        &self,
        credential: &Credential,
        request: &ProfileUpdateRequest,
    ) -> Result<WireUser, CampusError> {
        let envelope: UserEnvelope = self
            .send_json(
                self.request(Method::PUT, "/auth/profile", Some(credential))
                    .json(request),
            )
            .await?;
        Ok(envelope.user)
    }

    async fn list_institutions(&self) -> Result<Vec<Institution>, CampusError> {
        let envelope: InstitutionsEnvelope = self
            .send_json(self.request(Method::GET, "/institutions", None))
            .await?;
        Ok(envelope.institutions)
    }

    async fn list_users(&self, credential: &Credential) -> Result<Vec<WireUser>, CampusError> {
        let envelope: UsersEnvelope = self
            .send_json(self.request(Method::GET, "/users", Some(credential)))
            .await?;
        Ok(envelope.users)
    }

    async fn create_user(
        &self,
        credential: &Credential,
        request: &NewUserRequest,
    ) -> Result<WireUser, CampusError> {
        let envelope: UserEnvelope = self
            .send_json(
                self.request(Method::POST, "/users", Some(credential))
                    .json(request),
            )
            .await?;
        Ok(envelope.user)
    }

    async fn delete_user(&self, credential: &Credential, id: &str) -> Result<(), CampusError> {
        let path = format!("/users/{}", id);
        self.send(self.request(Method::DELETE, &path, Some(credential)))
            .await?;
        Ok(())
    }

    async fn list_events(
        &self,
        credential: &Credential,
        filter: Option<&str>,
    ) -> Result<Vec<WireEvent>, CampusError> {
        let mut builder = self.request(Method::GET, "/events", Some(credential));
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            builder = builder.query(&[("filter", filter)]);
        }
        let envelope: EventsEnvelope = self.send_json(builder).await?;
        Ok(envelope.events)
    }

    async fn get_event(&self, credential: &Credential, id: &str) -> Result<WireEvent, CampusError> {
        let path = format!("/events/{}", id);
        let envelope: EventEnvelope = self
            .send_json(self.request(Method::GET, &path, Some(credential)))
            .await?;
        Ok(envelope.event)
    }

    async fn create_event(
        &self,
        credential: &Credential,
        payload: &EventPayload,
    ) -> Result<WireEvent, CampusError> {
        let envelope: EventEnvelope = self
            .send_json(
                self.request(Method::POST, "/events", Some(credential))
                    .json(payload),
            )
            .await?;
        Ok(envelope.event)
    }

    async fn update_event(
        &self,
        credential: &Credential,
        id: &str,
        payload: &EventPayload,
    ) -> Result<WireEvent, CampusError> {
        let path = format!("/events/{}", id);
        let envelope: EventEnvelope = self
            .send_json(
                self.request(Method::PUT, &path, Some(credential))
                    .json(payload),
            )
            .await?;
        Ok(envelope.event)
    }

    async fn delete_event(&self, credential: &Credential, id: &str) -> Result<(), CampusError> {
        let path = format!("/events/{}", id);
        self.send(self.request(Method::DELETE, &path, Some(credential)))
            .await?;
        Ok(())
    }

    async fn register(&self, credential: &Credential, id: &str) -> Result<(), CampusError> {
        let path = format!("/events/{}/register", id);
        self.send(self.request(Method::POST, &path, Some(credential)))
            .await?;
        Ok(())
    }

    async fn submit_feedback(
        &self,
        credential: &Credential,
        id: &str,
        payload: &FeedbackPayload,
    ) -> Result<(), CampusError> {
        let path = format!("/events/{}/feedback", id);
        self.send(
            self.request(Method::POST, &path, Some(credential))
                .json(payload),
        )
        .await?;
        Ok(())
    }
}
