//! Login, signup, password and email-verification calls.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::paths;
use crate::auth::Credential;
use crate::client::http::CSRF_HEADER;
use crate::client::{LumoClient, RequestOptions};
use crate::error::{LumoError, Result};
use crate::types::{AuthResponse, AuthUser, VerificationOutcome};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    token: &'a str,
    email: &'a str,
    new_password: &'a str,
}

#[derive(Deserialize)]
struct MeResponse {
    user: AuthUser,
}

/// Account calls. The credential-less forms never go through refresh.
pub struct AuthApi<'a> {
    client: &'a LumoClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a LumoClient) -> Self {
        Self { client }
    }

    /// Sign in and store the issued credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let csrf = self.client.csrf_token().await?;
        let url = self.client.url(paths::LOGIN);
        let body = LoginRequest { email, password };
        let response: AuthResponse = self
            .client
            .pipeline()
            .execute(
                || {
                    self.client
                        .http()
                        .post(&url)
                        .header(CSRF_HEADER, csrf.as_str())
                        .json(&body)
                },
                RequestOptions::skip_refresh(),
            )
            .await?;

        if let Some(token) = &response.access_token {
            self.client.store().set(Credential::new(token.clone()));
            debug!("login issued a new credential");
        }
        Ok(response)
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse> {
        let body = SignupRequest {
            username,
            email,
            password,
        };
        self.post_form(paths::SIGNUP, &body).await
    }

    /// End the session. The local credential is cleared even if the backend
    /// call fails.
    pub async fn logout(&self) {
        let url = self.client.url(paths::LOGOUT);
        let result: Result<IgnoredAny> = self
            .client
            .pipeline()
            .execute(|| self.client.http().post(&url), RequestOptions::skip_refresh())
            .await;
        if let Err(err) = result {
            warn!(error = %err, "backend logout failed; clearing local session anyway");
        }
        self.client.store().clear();
    }

    /// The signed-in user.
    pub async fn me(&self) -> Result<AuthUser> {
        let url = self.client.url(paths::ME);
        let response: MeResponse = self
            .client
            .pipeline()
            .execute(|| self.client.http().get(&url), RequestOptions::default())
            .await?;
        Ok(response.user)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<AuthResponse> {
        self.post_form(paths::FORGOT_PASSWORD, &EmailRequest { email })
            .await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        email: &str,
        new_password: &str,
    ) -> Result<AuthResponse> {
        let body = ResetPasswordRequest {
            token,
            email,
            new_password,
        };
        self.post_form(paths::RESET_PASSWORD, &body).await
    }

    /// Follow an email verification link.
    ///
    /// A link missing its token or email is `Invalid` without a backend call.
    pub async fn verify_email(&self, token: Option<&str>, email: Option<&str>) -> VerificationOutcome {
        let (Some(token), Some(email)) = (non_blank(token), non_blank(email)) else {
            return VerificationOutcome::Invalid;
        };
        let url = self.client.url(paths::VERIFY_EMAIL);
        let result: Result<IgnoredAny> = self
            .client
            .pipeline()
            .execute(
                || {
                    self.client
                        .http()
                        .get(&url)
                        .query(&[("token", token), ("email", email)])
                },
                RequestOptions::skip_refresh(),
            )
            .await;
        match result {
            Ok(_) => VerificationOutcome::Verified,
            Err(LumoError::RequestFailed { message, .. }) => {
                VerificationOutcome::from_failure(&message)
            }
            Err(err) => VerificationOutcome::Failed(err.to_string()),
        }
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let url = self.client.url(paths::RESEND_VERIFICATION);
        let body = EmailRequest { email };
        let _: IgnoredAny = self
            .client
            .pipeline()
            .execute(
                || self.client.http().post(&url).json(&body),
                RequestOptions::skip_refresh(),
            )
            .await?;
        Ok(())
    }

    async fn post_form<B: Serialize>(&self, path: &str, body: &B) -> Result<AuthResponse> {
        let csrf = self.client.csrf_token().await?;
        let url = self.client.url(path);
        self.client
            .pipeline()
            .execute(
                || {
                    self.client
                        .http()
                        .post(&url)
                        .header(CSRF_HEADER, csrf.as_str())
                        .json(body)
                },
                RequestOptions::skip_refresh(),
            )
            .await
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
