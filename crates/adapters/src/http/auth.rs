//! `Authorization` header for the HTTP client.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use esbridge_config::{ApiKey, AuthDescriptor};
use esbridge_shared::SecretString;

/// Build the `Authorization` header value.
///
/// An API key wins over basic credentials. A pre-encoded token is sent as is;
/// an id/key pair is encoded as `base64(id:key)`. Basic auth needs both a
/// username and a password.
#[must_use]
pub fn build_auth_header(auth: &AuthDescriptor) -> Option<SecretString> {
    if let Some(api_key) = &auth.api_key {
        let token = match api_key {
            ApiKey::Token(token) => token.expose().to_owned(),
            ApiKey::Credentials { id, api_key } => {
                STANDARD.encode(format!("{id}:{}", api_key.expose()))
            },
        };
        return Some(SecretString::new(format!("ApiKey {token}")));
    }

    match (&auth.username, &auth.password) {
        (Some(username), Some(password)) => {
            let encoded = STANDARD.encode(format!("{username}:{}", password.expose()));
            Some(SecretString::new(format!("Basic {encoded}")))
        },
        (Some(_), None) | (None, Some(_)) => {
            tracing::warn!("basic auth needs both username and password; sending no credentials");
            None
        },
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(auth: &AuthDescriptor) -> Option<String> {
        build_auth_header(auth).map(|value| value.expose().to_owned())
    }

    #[test]
    fn token_api_key_is_sent_unchanged() {
        let auth = AuthDescriptor {
            api_key: Some(ApiKey::Token("abc123==".into())),
            ..AuthDescriptor::default()
        };
        assert_eq!(header(&auth).as_deref(), Some("ApiKey abc123=="));
    }

    #[test]
    fn id_and_key_are_base64_encoded() {
        let auth = AuthDescriptor {
            api_key: Some(ApiKey::Credentials {
                id: "key-id".to_owned(),
                api_key: "key-secret".into(),
            }),
            username: Some("ignored".to_owned()),
            password: Some("ignored".into()),
        };
        // base64("key-id:key-secret")
        assert_eq!(
            header(&auth).as_deref(),
            Some("ApiKey a2V5LWlkOmtleS1zZWNyZXQ=")
        );
    }

    #[test]
    fn basic_auth_needs_both_halves() {
        let full = AuthDescriptor {
            username: Some("elastic".to_owned()),
            password: Some("changeme".into()),
            ..AuthDescriptor::default()
        };
        // base64("elastic:changeme")
        assert_eq!(
            header(&full).as_deref(),
            Some("Basic ZWxhc3RpYzpjaGFuZ2VtZQ==")
        );

        let partial = AuthDescriptor {
            username: Some("elastic".to_owned()),
            ..AuthDescriptor::default()
        };
        assert_eq!(header(&partial), None);
        assert_eq!(header(&AuthDescriptor::default()), None);
    }
}
