use crate::kredenco::{handlers::error_response, AuthState};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct UserRegister {
    username: String,
    #[schema(value_type = String)]
    password: SecretString,
}

#[utoipa::path(
    post,
    path= "/register",
    request_body = UserRegister,
    responses (
        (status = 201, description = "Registration successful"),
        (status = 400, description = "Missing or empty username or password"),
        (status = 409, description = "User with the specified username already exists"),
    ),
    tag= "register"
)]
// axum handler for register
#[instrument(skip(auth, payload))]
pub async fn register(
    auth: Extension<AuthState>,
    payload: Option<Json<UserRegister>>,
) -> impl IntoResponse {
    let user: UserRegister = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()),
    };

    // SecretString keeps the password out of the debug output
    debug!("user: {:?}", user);

    match auth.register(&user.username, user.password).await {
        Ok(()) => (StatusCode::CREATED, "User created".to_string()),
        Err(err) => error_response(&err),
    }
}
