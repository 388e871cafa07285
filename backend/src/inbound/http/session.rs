//! Session helpers to keep handlers and pipeline stages free of
//! framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so the rest of the crate
//! only deals with the identity-key operations the pipeline needs: read,
//! persist, clear, purge. Session lifecycle and expiry belong to the cookie
//! session middleware, not to this wrapper.

use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId};

pub(crate) const IDENTITY_KEY: &str = "identity";

/// Newtype wrapper exposing identity-key operations over the session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_identity(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(IDENTITY_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current identity key from the session, if present.
    ///
    /// A malformed stored value is discarded on sight so the resolver only
    /// ever sees a well-formed key or nothing.
    pub fn identity_key(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(IDENTITY_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(raw) => match UserId::new(&raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!(%error, "discarding malformed identity key from session");
                    self.clear_identity();
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Remove the identity key, keeping the rest of the session intact.
    pub fn clear_identity(&self) {
        self.0.remove(IDENTITY_KEY);
    }

    /// Drop the whole session, identity key included.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Cookie session middleware with the settings every binary and test shares.
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    use crate::inbound::http::test_utils::test_session_middleware;

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(test_session_middleware())
    }

    #[actix_web::test]
    async fn round_trips_the_identity_key() {
        let id = UserId::random();
        let expected = id.to_string();
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(move |session: SessionContext| {
                        let id = id.clone();
                        async move {
                            session.persist_identity(&id)?;
                            Ok::<_, Error>(HttpResponse::Ok())
                        }
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let key = session.identity_key()?;
                        let body = key.map_or_else(|| "none".to_owned(), |id| id.to_string());
                        Ok::<_, Error>(HttpResponse::Ok().body(body))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, expected.as_bytes());
    }

    #[actix_web::test]
    async fn tampered_identity_keys_are_discarded() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-invalid",
                    web::get().to(|session: actix_session::Session| async move {
                        session
                            .insert(IDENTITY_KEY, "not-a-uuid")
                            .expect("set invalid identity key");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let key = session.identity_key()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(match key {
                            Some(_) => "some",
                            None => "none",
                        }))
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, "none");
    }

    #[actix_web::test]
    async fn clear_identity_removes_only_the_key() {
        let id = UserId::random();
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(move |session: SessionContext| {
                        let id = id.clone();
                        async move {
                            session.persist_identity(&id)?;
                            Ok::<_, Error>(HttpResponse::Ok())
                        }
                    }),
                )
                .route(
                    "/clear",
                    web::get().to(|session: SessionContext| async move {
                        session.clear_identity();
                        let key = session.identity_key()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(match key {
                            Some(_) => "some",
                            None => "none",
                        }))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/clear")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(res).await;
        assert_eq!(body, "none");
    }
}
