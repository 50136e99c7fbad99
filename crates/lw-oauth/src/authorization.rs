//! Authorization endpoint URL construction

use urlencoding::encode;

/// LinkedIn's OAuth 2.0 authorization endpoint.
pub const AUTHORIZATION_ENDPOINT: &str = "https://www.linkedin.com/oauth/v2/authorization";

/// Parameters for one authorization request, immutable per flow.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub client_id: String,
    pub redirect_uri: String,
    pub permissions: Vec<String>,
    pub auth_state: String,
}

impl AuthorizationRequest {
    /// Build the authorization URL.
    ///
    /// Parameter order and encoding are part of the wire contract; the scope
    /// joins permissions with a single space, preserving their order.
    pub fn authorization_url(&self) -> String {
        let scope = self.permissions.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            AUTHORIZATION_ENDPOINT,
            encode(&self.client_id),
            encode(&self.redirect_uri),
            encode(&scope),
            encode(&self.auth_state),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url() {
        let request = AuthorizationRequest {
            client_id: "clientID".to_string(),
            redirect_uri: "https://xaviercarpentier.com".to_string(),
            permissions: vec![
                "r_basicprofile".to_string(),
                "r_emailaddress".to_string(),
            ],
            auth_state: "authState".to_string(),
        };

        assert_eq!(
            request.authorization_url(),
            "https://www.linkedin.com/oauth/v2/authorization?\
             client_id=clientID&redirect_uri=https%3A%2F%2Fxaviercarpentier.com&\
             response_type=code&scope=r_basicprofile%20r_emailaddress&\
             state=authState"
        );
    }

    #[test]
    fn test_authorization_url_preserves_permission_order() {
        let request = AuthorizationRequest {
            client_id: "id".to_string(),
            redirect_uri: "https://example.com".to_string(),
            permissions: vec!["w_member_social".to_string(), "r_liteprofile".to_string()],
            auth_state: "s".to_string(),
        };

        assert!(request
            .authorization_url()
            .contains("scope=w_member_social%20r_liteprofile"));
    }

    #[test]
    fn test_authorization_url_empty_permissions() {
        let request = AuthorizationRequest {
            client_id: "id".to_string(),
            redirect_uri: "https://example.com".to_string(),
            permissions: vec![],
            auth_state: "s".to_string(),
        };

        assert!(request.authorization_url().contains("&scope=&state=s"));
    }
}
