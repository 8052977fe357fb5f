use log::{info, warn};

use super::{
    backend::Backend,
    error::CampusError,
    helpers::user_from_wire,
    models::{wire_model::AuthRequest, Credential, IdentityPatch, User},
    token_store::TokenStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Restoring,
    Anonymous,
    Authenticated,
}

/// An accepted credential together with the identity it proved.
#[derive(Debug, Clone)]
struct SignedIn {
    credential: Credential,
    identity: User,
}

/// Current identity of this client, and the token behind it.
///
/// Identity and credential are only ever set together, after the backend
/// accepted the credential.
pub struct Session<S: TokenStore> {
    store: S,
    signed_in: Option<SignedIn>,
    loading: bool,
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S) -> Self {
        Session {
            store,
            signed_in: None,
            loading: true,
        }
    }

    pub fn state(&self) -> SessionState {
        match (&self.signed_in, self.loading) {
            (_, true) => SessionState::Restoring,
            (Some(_), false) => SessionState::Authenticated,
            (None, false) => SessionState::Anonymous,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn identity(&self) -> Option<&User> {
        self.signed_in.as_ref().map(|s| &s.identity)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.signed_in.as_ref().map(|s| &s.credential)
    }

    /// Identity and credential of the signed in user, or `NotAuthenticated`.
    pub fn require(&self) -> Result<(&User, &Credential), CampusError> {
        self.signed_in
            .as_ref()
            .map(|s| (&s.identity, &s.credential))
            .ok_or(CampusError::NotAuthenticated)
    }

    /// Brings back the identity behind a persisted token, if any.
    ///
    /// Never fails: a missing, unreadable or rejected token ends anonymous,
    /// and a rejected one is removed from the store.
    pub async fn restore<B: Backend>(&mut self, backend: &B) {
        self.signed_in = None;
        self.loading = true;
        let credential = match self.store.load() {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                info!("No stored token, starting anonymous");
                self.loading = false;
                return;
            }
            Err(err) => {
                warn!("Could not read stored token: {}", err);
                self.loading = false;
                return;
            }
        };

        match backend.get_profile(&credential).await {
            Ok(wire) => {
                let identity = user_from_wire(wire, None);
                info!("Restored session of {} ({})", identity.email, identity.role);
                self.signed_in = Some(SignedIn {
                    credential,
                    identity,
                });
            }
            Err(err) => {
                warn!("Stored token was not accepted: {}", err);
                if let Err(err) = self.store.clear() {
                    warn!("Could not remove rejected token: {}", err);
                }
            }
        }
        self.loading = false;
    }

    pub async fn login<B: Backend>(
        &mut self,
        backend: &B,
        email: &str,
        password: &str,
        institution: &str,
    ) -> Result<(), CampusError> {
        let request = auth_request(email, password, institution)?;
        let response = backend.login(&request).await?;
        let identity = user_from_wire(response.user, Some(institution.trim()));
        self.accept(Credential::new(response.token), identity)
    }

    /// Administrator onboarding; the only self-service signup.
    pub async fn signup<B: Backend>(
        &mut self,
        backend: &B,
        email: &str,
        password: &str,
        institution: &str,
    ) -> Result<(), CampusError> {
        let request = auth_request(email, password, institution)?;
        let response = backend.signup(&request).await?;
        let identity = user_from_wire(response.user, Some(institution.trim()));
        self.accept(Credential::new(response.token), identity)
    }

    fn accept(&mut self, credential: Credential, identity: User) -> Result<(), CampusError> {
        self.store.save(&credential)?;
        info!("Signed in as {} ({})", identity.email, identity.role);
        self.signed_in = Some(SignedIn {
            credential,
            identity,
        });
        self.loading = false;
        Ok(())
    }

    /// Forgets the identity and the stored token. Always succeeds.
    pub fn logout(&mut self) {
        if let Some(signed_in) = self.signed_in.take() {
            info!("Signed out {}", signed_in.identity.email);
        }
        if let Err(err) = self.store.clear() {
            warn!("Could not remove stored token: {}", err);
        }
        self.loading = false;
    }

    /// Mirrors an already confirmed profile change locally. No backend call.
    pub fn update_identity(&mut self, patch: IdentityPatch) {
        let Some(signed_in) = self.signed_in.as_mut() else {
            return;
        };
        let identity = &mut signed_in.identity;
        if let Some(username) = patch.username {
            identity.username = Some(username);
        }
        if let Some(department) = patch.department {
            identity.department = Some(department);
        }
        if let Some(class_section) = patch.class_section {
            identity.class_section = Some(class_section);
        }
    }
}

fn auth_request<'a>(
    email: &'a str,
    password: &'a str,
    institution: &'a str,
) -> Result<AuthRequest<'a>, CampusError> {
    for (field, value) in [
        ("Email", email),
        ("Password", password),
        ("Institution", institution),
    ] {
        if value.trim().is_empty() {
            return Err(CampusError::Validation(format!("{} is required", field)));
        }
    }
    Ok(AuthRequest {
        email: email.trim(),
        password,
        institution_name: institution.trim(),
    })
}
