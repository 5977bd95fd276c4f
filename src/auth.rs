use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use thiserror::Error;
use tracing::warn;

use crate::models::CurrentUser;
use crate::store::{StoreError, UserProvider};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("sign in to book a class")]
    MissingToken,
    #[error("could not verify the signed-in user")]
    Rejected(#[source] StoreError),
}

/// Bearer header wins over the `token` query parameter.
pub fn provided_token(
    auth: Option<Authorization<Bearer>>,
    query_token: Option<&str>,
) -> Option<String> {
    auth.map(|a| a.token().to_string())
        .or_else(|| query_token.map(|s| s.to_string()))
        .filter(|token| !token.trim().is_empty())
}

pub async fn current_user<U: UserProvider + ?Sized>(
    provider: &U,
    token: Option<&str>,
) -> Result<CurrentUser, AuthError> {
    let token = token.ok_or(AuthError::MissingToken)?;
    provider.current_user(token).await.map_err(|err| {
        warn!(error = %err, "current user lookup failed");
        AuthError::Rejected(err)
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct FixedUser;

    #[async_trait]
    impl UserProvider for FixedUser {
        async fn current_user(&self, token: &str) -> Result<CurrentUser, StoreError> {
            if token == "secret" {
                Ok(CurrentUser {
                    email: "ann@example.com".to_string(),
                    full_name: "Ann Smith".to_string(),
                })
            } else {
                Err(StoreError::Unauthorized)
            }
        }
    }

    #[test]
    fn test_provided_token_header() {
        let auth = Authorization::bearer("secret").unwrap();
        assert_eq!(
            provided_token(Some(auth), Some("other")),
            Some("secret".to_string())
        );
    }

    #[test]
    fn test_provided_token_query() {
        assert_eq!(provided_token(None, Some("secret")), Some("secret".to_string()));
        assert_eq!(provided_token(None, Some("  ")), None);
        assert_eq!(provided_token(None, None), None);
    }

    #[tokio::test]
    async fn test_current_user_resolves() {
        let user = current_user(&FixedUser, Some("secret")).await.unwrap();
        assert_eq!(user.email, "ann@example.com");
    }

    #[tokio::test]
    async fn test_current_user_missing_or_rejected() {
        assert!(matches!(
            current_user(&FixedUser, None).await,
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            current_user(&FixedUser, Some("bad")).await,
            Err(AuthError::Rejected(StoreError::Unauthorized))
        ));
    }
}
