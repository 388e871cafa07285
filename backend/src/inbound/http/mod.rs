//! HTTP inbound adapter exposing REST endpoints.

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use crate::middleware::{RequireIdentity, ResolveIdentity};

pub mod comments;
pub mod error;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Assemble the `/api/v1` scope with the full request pipeline.
///
/// This is the single place encoding the stage ordering invariant: the
/// session middleware wraps [`ResolveIdentity`], which runs for every API
/// request, and [`RequireIdentity`] wraps only the protected `/me` scope.
/// Unprotected routes still pass through the resolver so "who is making
/// this request" is available to them when a session is present.
pub fn api_scope(
    state: state::HttpState,
    session: SessionMiddleware<CookieSessionStore>,
) -> impl HttpServiceFactory {
    let users = state.users.clone();
    web::scope("/api/v1")
        .app_data(web::Data::new(state))
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(comments::list_comments)
        .service(comments::get_comment)
        .service(
            web::scope("/me")
                .wrap(RequireIdentity)
                .service(users::current_user)
                .service(users::change_password)
                .service(comments::create_comment),
        )
        .wrap(ResolveIdentity::new(users))
        .wrap(session)
}
