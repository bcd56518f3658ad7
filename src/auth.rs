use crate::api::{bearer, ApiClient};
use crate::errors::ApiError;
use crate::models::{ChangePasswordRequest, LoginForm, LoginResponse, RegisterRequest};
use crate::storage::TokenStore;
use reqwest::header::AUTHORIZATION;
use tracing::{info, warn};

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const CHANGE_PASSWORD_PATH: &str = "/api/v1/auth/change-password";

pub const REGISTERED_MESSAGE: &str = "Registration successful! Please log in.";
pub const PASSWORD_CHANGED_MESSAGE: &str = "Password changed successfully!";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "New passwords do not match";

#[derive(Clone, Debug)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchanges credentials for an access token and stores it. The store is
    /// left untouched when the backend refuses.
    pub async fn login(
        &self,
        tokens: &dyn TokenStore,
        identifier: &str,
        secret: &str,
    ) -> Result<LoginResponse, ApiError> {
        let request = self.api.post(LOGIN_PATH).form(&LoginForm {
            username: identifier,
            password: secret,
        });

        match self.api.send_json::<LoginResponse>(request).await {
            Ok(response) => {
                tokens.set_token(&response.access_token);
                info!("login succeeded");
                Ok(response)
            }
            Err(err) => {
                warn!("login failed: {err}");
                Err(err)
            }
        }
    }

    pub async fn register(&self, email: &str, username: &str, secret: &str) -> Result<(), ApiError> {
        let request = self.api.post(REGISTER_PATH).json(&RegisterRequest {
            email,
            username,
            password: secret,
        });

        self.api.send(request).await.inspect_err(|err| {
            warn!("registration failed: {err}");
        })?;
        info!("registration succeeded");
        Ok(())
    }

    /// The caller checks that the new password was confirmed before calling.
    pub async fn change_password(
        &self,
        tokens: &dyn TokenStore,
        current: &str,
        new: &str,
    ) -> Result<(), ApiError> {
        let authorization = bearer(tokens)?;
        let request = self
            .api
            .post(CHANGE_PASSWORD_PATH)
            .header(AUTHORIZATION, authorization)
            .json(&ChangePasswordRequest {
                current_password: current,
                new_password: new,
            });

        self.api.send(request).await.inspect_err(|err| {
            warn!("password change failed: {err}");
        })?;
        info!("password changed");
        Ok(())
    }
}
