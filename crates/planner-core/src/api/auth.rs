use planner_types::{
    auth::{
        AuthResponse, ForgotPasswordRequest, LoginCredentials, RegisterRequest,
        ResendVerificationRequest, ResetPasswordRequest, VerifyEmailRequest,
    },
    user::{UserProfile, UserSummary},
    PlannerError, Result,
};

use super::endpoint;
use crate::client::{ApiClient, RequestOptions};
use crate::ports::Method;

/// Exchange credentials for a token. The backend expects an OAuth2-style
/// form body with `username`/`password`.
pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> Result<AuthResponse> {
    let opts = RequestOptions::new(Method::Post).form(vec![
        ("username".to_string(), credentials.email.trim().to_string()),
        ("password".to_string(), credentials.password.clone()),
    ]);
    client.request(&endpoint("/auth/login"), opts).await
}

pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<AuthResponse> {
    client.post(&endpoint("/auth/register"), request).await
}

pub async fn verify_email(client: &ApiClient, token: &str) -> Result<AuthResponse> {
    let body = VerifyEmailRequest {
        token: token.to_string(),
    };
    client.post(&endpoint("/auth/verify-email"), &body).await
}

pub async fn forgot_password(client: &ApiClient, email: &str) -> Result<()> {
    let body = ForgotPasswordRequest {
        email: email.trim().to_string(),
    };
    let opts = RequestOptions::new(Method::Post).json(serde_json::to_value(&body)?);
    client.execute(&endpoint("/auth/forgot-password"), opts).await?;
    Ok(())
}

pub async fn reset_password(client: &ApiClient, token: &str, new_password: &str) -> Result<()> {
    let body = ResetPasswordRequest {
        token: token.to_string(),
        new_password: new_password.to_string(),
    };
    let opts = RequestOptions::new(Method::Post).json(serde_json::to_value(&body)?);
    client.execute(&endpoint("/auth/reset-password"), opts).await?;
    Ok(())
}

pub async fn resend_verification(client: &ApiClient, email: &str) -> Result<()> {
    let body = ResendVerificationRequest {
        email: email.trim().to_string(),
    };
    let opts = RequestOptions::new(Method::Post).json(serde_json::to_value(&body)?);
    client.execute(&endpoint("/auth/resend-verification"), opts).await?;
    Ok(())
}

/// Trade the current token for a fresh one and store it.
pub async fn refresh(client: &ApiClient) -> Result<()> {
    let opts = RequestOptions::new(Method::Post);
    let response: AuthResponse = client.request(&endpoint("/auth/refresh"), opts).await?;
    match response.access_token {
        Some(token) => client.session().set_token(token).await,
        None => Err(PlannerError::Other("refresh returned no token".into())),
    }
}

/// Finish any flow that yields a token: store it, load the profile, then
/// establish the session.
pub async fn establish_session(client: &ApiClient, response: AuthResponse) -> Result<UserSummary> {
    let token = response
        .access_token
        .ok_or_else(|| PlannerError::Other("no access token in response".into()))?;
    client.session().set_token(token.clone()).await?;
    let user = match response.user {
        Some(user) => user,
        None => match client.get::<UserProfile>(&endpoint("/users/me")).await {
            Ok(profile) => UserSummary::from(&profile),
            Err(e) => {
                log::warn!("Profile fetch after sign-in failed: {}", e);
                client.session().discard().await;
                return Err(e);
            }
        },
    };
    client.session().login(token, user.clone()).await?;
    Ok(user)
}

pub async fn sign_in(client: &ApiClient, credentials: &LoginCredentials) -> Result<UserSummary> {
    let response = login(client, credentials).await?;
    establish_session(client, response).await
}
