//! Identity resolution middleware.
//!
//! For every request passing through, the session's identity key (if any) is
//! resolved against the user model and the resulting [`CurrentIdentity`] is
//! attached to the request extensions. A key that no longer resolves is a
//! stale session: the key is cleared and the request continues anonymously,
//! without surfacing the condition to the client. Control always moves to
//! the next stage exactly once; only genuine model failures (store outages)
//! abort the request.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::domain::{Error, ErrorCode, User, UserService};
use crate::inbound::http::session::SessionContext;

/// Request-scoped resolved identity.
///
/// Written by [`ResolveIdentity`], read by the access gate and by handlers.
/// Created per request and dropped with it; nothing is shared across
/// requests.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(User);

impl CurrentIdentity {
    /// The resolved user.
    pub fn user(&self) -> &User {
        &self.0
    }

    /// Consume the wrapper and take the user.
    pub fn into_user(self) -> User {
        self.0
    }
}

impl FromRequest for CurrentIdentity {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Self>()
                .cloned()
                .ok_or_else(|| Error::unauthorized("login required").into()),
        )
    }
}

/// Middleware resolving the session's identity key into a [`CurrentIdentity`].
///
/// Must wrap every route interested in "who is making this request",
/// protected or not, and must sit inside the session middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::middleware::ResolveIdentity;
/// # use std::sync::Arc;
/// # use backend::domain::UserService;
/// # use backend::outbound::hashing::Argon2CredentialHasher;
/// # use backend::outbound::persistence::MemoryUserStore;
///
/// # let users = UserService::new(
/// #     Arc::new(MemoryUserStore::default()),
/// #     Arc::new(Argon2CredentialHasher),
/// # );
/// let app = App::new().wrap(ResolveIdentity::new(users));
/// ```
#[derive(Clone)]
pub struct ResolveIdentity {
    users: UserService,
}

impl ResolveIdentity {
    /// Create the middleware over the user model it resolves against.
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ResolveIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = ResolveIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResolveIdentityMiddleware {
            service: Rc::new(service),
            users: self.users.clone(),
        }))
    }
}

/// Service wrapper produced by [`ResolveIdentity`].
///
/// Applications should not use this type directly.
pub struct ResolveIdentityMiddleware<S> {
    service: Rc<S>,
    users: UserService,
}

impl<S, B> Service<ServiceRequest> for ResolveIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let users = self.users.clone();
        Box::pin(async move {
            resolve(&users, &req).await?;
            service.call(req).await
        })
    }
}

/// Resolve the session's identity key, attaching the identity on success and
/// clearing the key when it is stale.
async fn resolve(users: &UserService, req: &ServiceRequest) -> Result<(), Error> {
    let session = SessionContext::new(req.get_session());
    let Some(id) = session.identity_key()? else {
        return Ok(());
    };
    match users.get(&id).await {
        Ok(user) => {
            req.extensions_mut().insert(CurrentIdentity(user));
        }
        Err(err) if err.code() == ErrorCode::NotFound => {
            debug!(user_id = %id, "clearing stale identity key from session");
            session.clear_identity();
        }
        Err(err) => return Err(err),
    }
    Ok(())
}
