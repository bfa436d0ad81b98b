use crate::kredenco::{handlers::error_response, AuthState};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct UserLogin {
    username: String,
    #[schema(value_type = String)]
    password: SecretString,
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Login successful"),
        (status = 400, description = "Missing or empty username or password"),
        (status = 401, description = "Password does not match"),
        (status = 404, description = "No account for the username"),
    ),
    tag= "login"
)]
// axum handler for login
#[instrument(skip(auth, payload))]
pub async fn login(
    auth: Extension<AuthState>,
    payload: Option<Json<UserLogin>>,
) -> impl IntoResponse {
    let user: UserLogin = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()),
    };

    debug!("user: {:?}", user);

    match auth.login(&user.username, user.password).await {
        Ok(()) => (StatusCode::OK, "Login successful".to_string()),
        Err(err) => error_response(&err),
    }
}
