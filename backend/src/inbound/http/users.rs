//! User API handlers.
//!
//! ```text
//! POST /api/v1/users            {"displayName":"Ada","email":"ada@x.com","password":"pw"}
//! POST /api/v1/login            {"email":"ada@x.com","password":"pw"}
//! POST /api/v1/logout
//! GET  /api/v1/me               (protected)
//! PUT  /api/v1/me/password      (protected) {"password":"new-pw"}
//! ```
//!
//! Handlers do request/response mapping only; every decision belongs to the
//! user model behind them.

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use zeroize::Zeroizing;

use crate::domain::{
    CredentialValidationError, Credentials, DisplayName, EmailAddress, Error, User,
    UserValidationError,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::middleware::CurrentIdentity;

/// Registration request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password change request body for `PUT /api/v1/me/password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub password: String,
}

/// Public view of a user; the credential hash never leaves the domain.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub display_name: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            display_name: user.display_name().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Register a new user.
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        display_name,
        email,
        password,
    } = payload.into_inner();
    let password = Zeroizing::new(password);
    let display_name = DisplayName::new(display_name)
        .map_err(|err| map_user_validation_error(&err, "displayName"))?;
    let email =
        EmailAddress::new(&email).map_err(|err| map_user_validation_error(&err, "email"))?;
    let user = state.users.create(display_name, email, &password).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Authenticate and establish a session.
///
/// A credential mismatch is reported as 401 without distinguishing unknown
/// emails from wrong passwords.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        Credentials::try_from_parts(&email, &password).map_err(map_credential_validation_error)?;
    let Some(user) = state
        .users
        .authenticate(credentials.email(), credentials.password())
        .await?
    else {
        return Err(Error::unauthorized("invalid credentials"));
    };
    session.persist_identity(user.id())?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// Drop the caller's session.
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The authenticated caller's own record, mounted under the protected
/// `/me` scope.
#[get("")]
pub async fn current_user(identity: CurrentIdentity) -> ApiResult<web::Json<UserResponse>> {
    Ok(web::Json(UserResponse::from(identity.user())))
}

/// Rotate the authenticated caller's password.
#[put("/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    identity: CurrentIdentity,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let password = Zeroizing::new(payload.into_inner().password);
    state
        .users
        .change_password(identity.user().id(), &password)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

fn map_user_validation_error(err: &UserValidationError, field: &str) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_credential_validation_error(err: CredentialValidationError) -> Error {
    let field = match err {
        CredentialValidationError::Email(_) => "email",
        CredentialValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}
