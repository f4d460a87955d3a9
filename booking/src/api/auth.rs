//! Sign-in and sign-out.

use super::{ApiClient, ApiError};
use crate::session::Session;
use crate::types::User;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: User,
}

impl ApiClient {
    /// Sign in and make the returned token the active session.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] with status 401 for wrong credentials
    /// - [`ApiError::Session`] if the token cannot be read or persisted
    /// - any other request failure
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let response: LoginResponse = self
            .post("auth/login", &LoginRequest { email, password })
            .await
            .map_err(|error| match error {
                ApiError::Unauthorized | ApiError::Forbidden => ApiError::Status {
                    status: 401,
                    message: "Invalid e-mail or password.".to_string(),
                },
                other => other,
            })?;

        let user = response.user.clone();
        self.session()
            .set(Session {
                token: response.token,
                user: response.user,
            })
            .await?;
        Ok(user)
    }

    /// Drop the active session. Only local state is touched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] if the persisted session cannot be removed.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session().clear().await?;
        tracing::info!("Signed out");
        Ok(())
    }
}
