//! Authentication boundary. The rest of the crate only ever sees an
//! [`IdentityProvider`] handing back a `{name, email}` pair or a failure
//! message; tokens, refresh flows, and everything else the hosted provider
//! does stay behind this trait.

use healthyspine_core::{CompanionError, UserIdentity};
use serde_json::json;

pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com";

pub trait IdentityProvider {
    /// # Errors
    ///
    /// Returns an auth error carrying the provider's message verbatim.
    fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, CompanionError>;

    /// # Errors
    ///
    /// Returns an auth error carrying the provider's message verbatim.
    fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, CompanionError>;

    /// # Errors
    ///
    /// Returns an auth error carrying the provider's message verbatim.
    fn sign_in_with_google(&self) -> Result<UserIdentity, CompanionError>;
}

/// Identity Toolkit REST client.
///
/// Federated sign-in has no browser popup here, so the Google flow requires
/// an ID token obtained out of band; without one it fails like any other
/// provider rejection.
pub struct HttpIdentityProvider {
    base_url: String,
    api_key: String,
    google_id_token: Option<String>,
}

impl HttpIdentityProvider {
    #[must_use]
    pub fn new(base_url: String, api_key: String, google_id_token: Option<String>) -> Self {
        Self { base_url, api_key, google_id_token }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/v1/accounts:{action}?key={}", self.base_url, self.api_key)
    }

    fn post(&self, action: &str, body: &serde_json::Value) -> Result<serde_json::Value, CompanionError> {
        let response = ureq::post(&self.endpoint(action)).send_json(body);
        match response {
            Ok(response) => response
                .into_json()
                .map_err(|err| CompanionError::Auth(format!("unreadable provider response: {err}"))),
            Err(ureq::Error::Status(_, response)) => {
                Err(CompanionError::Auth(provider_message(response)))
            }
            Err(err) => Err(CompanionError::Auth(err.to_string())),
        }
    }
}

/// The provider encodes failures as `{"error": {"message": ...}}`; that
/// message is what the user sees.
fn provider_message(response: ureq::Response) -> String {
    let status = response.status();
    match response.into_json::<serde_json::Value>() {
        Ok(body) => body["error"]["message"]
            .as_str()
            .map_or_else(|| format!("provider returned status {status}"), ToString::to_string),
        Err(_) => format!("provider returned status {status}"),
    }
}

fn identity_from(body: &serde_json::Value, fallback_name: Option<&str>) -> UserIdentity {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let name = body["displayName"]
        .as_str()
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .or_else(|| fallback_name.map(ToString::to_string))
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
    UserIdentity { name, email }
}

impl IdentityProvider for HttpIdentityProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, CompanionError> {
        let body = self.post(
            "signInWithPassword",
            &json!({ "email": email, "password": password, "returnSecureToken": true }),
        )?;
        Ok(identity_from(&body, None))
    }

    fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, CompanionError> {
        let body = self.post(
            "signUp",
            &json!({ "email": email, "password": password, "returnSecureToken": true }),
        )?;
        Ok(identity_from(&body, Some(name)))
    }

    fn sign_in_with_google(&self) -> Result<UserIdentity, CompanionError> {
        let Some(id_token) = &self.google_id_token else {
            return Err(CompanionError::Auth(
                "google sign-in requires an ID token; pass one with --google-id-token".to_string(),
            ));
        };
        let body = self.post(
            "signInWithIdp",
            &json!({
                "postBody": format!("id_token={id_token}&providerId=google.com"),
                "requestUri": "http://localhost",
                "returnSecureToken": true,
            }),
        )?;
        Ok(identity_from(&body, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_falls_back_to_the_email_local_part() {
        let body = json!({ "email": "jane@example.com", "displayName": "" });
        let identity = identity_from(&body, None);
        assert_eq!(identity.name, "jane");
        assert_eq!(identity.email, "jane@example.com");
    }

    #[test]
    fn sign_up_keeps_the_requested_name() {
        let body = json!({ "email": "jane@example.com" });
        let identity = identity_from(&body, Some("Jane Doe"));
        assert_eq!(identity.name, "Jane Doe");
    }

    #[test]
    fn google_without_a_token_fails_like_a_provider_rejection() {
        let provider =
            HttpIdentityProvider::new(DEFAULT_AUTH_URL.to_string(), "key".to_string(), None);
        match provider.sign_in_with_google() {
            Err(CompanionError::Auth(message)) => assert!(message.contains("ID token")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }
}
