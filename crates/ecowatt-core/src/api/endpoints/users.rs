use tracing::info;

use crate::api::{ApiClient, ApiError, RequestContext};
use crate::models::{TokenResponse, User, UserRegistration, UserUpdate};
use crate::router::LOGIN_ROUTE;

impl ApiClient {
    pub async fn register_user(&self, registration: &UserRegistration) -> Result<User, ApiError> {
        self.fetch(RequestContext::post("/users/register").json(registration)?)
            .await
    }

    /// Exchange credentials for a token. Sent form-encoded, not as JSON.
    pub async fn login_user(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let context = RequestContext::post("/users/login")
            .form(&[("username", username), ("password", password)]);
        self.fetch(context).await
    }

    pub async fn get_current_user(&self) -> Result<User, ApiError> {
        self.fetch(RequestContext::get("/users/me")).await
    }

    pub async fn update_current_user(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.fetch(RequestContext::put("/users/me").json(update)?).await
    }

    /// Log in and store the resulting credential and user id.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let response = self.login_user(username, password).await?;

        self.session().set_token(response.access_token);
        self.session().set_current_user_id(response.user.id);
        info!(user_id = response.user.id, "Signed in");

        Ok(response.user)
    }

    /// Drop the local credential and go to the login view.
    pub fn sign_out(&self) {
        self.session().remove_token();
        self.navigate(LOGIN_ROUTE);
        info!("Signed out");
    }
}
