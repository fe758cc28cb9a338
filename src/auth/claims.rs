use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by tokens from the identity provider. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub aud: String,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(user_id: &str, email: Option<&str>, audience: &str, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            aud: audience.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("user-1", Some("jane@example.com"), "authenticated", 24);

        assert_eq!(claims.user_id(), "user-1");
        assert_eq!(claims.email.as_deref(), Some("jane@example.com"));
        assert_eq!(claims.aud, "authenticated");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_claims_tolerate_missing_optional_fields() {
        let json = r#"{"sub":"user-1","aud":"authenticated","role":"authenticated","exp":10,"iat":1}"#;
        let claims: Claims = serde_json::from_str(json).expect("claims should parse");

        assert!(claims.email.is_none());
    }
}
