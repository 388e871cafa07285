//! Access gate middleware.
//!
//! Inspects the request-scoped identity context and halts the pipeline with
//! an unauthorised response when no identity is attached. The gate is
//! read-only with respect to the context and never suspends; its only
//! ordering requirement is that it runs after [`ResolveIdentity`] and before
//! any protected handler.
//!
//! [`ResolveIdentity`]: super::ResolveIdentity

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error as ActixError, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::domain::Error;
use crate::middleware::CurrentIdentity;

/// Middleware rejecting requests that carry no resolved identity.
///
/// Wrap protected scopes with this gate; when it rejects, the inner service
/// is never called and no downstream stage or handler runs.
///
/// # Examples
/// ```
/// use actix_web::{web, App};
/// use backend::middleware::RequireIdentity;
///
/// let app = App::new().service(web::scope("/private").wrap(RequireIdentity));
/// ```
#[derive(Clone)]
pub struct RequireIdentity;

impl<S, B> Transform<S, ServiceRequest> for RequireIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type InitError = ();
    type Transform = RequireIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireIdentityMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequireIdentity`].
///
/// Applications should not use this type directly.
pub struct RequireIdentityMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.extensions().get::<CurrentIdentity>().is_none() {
            debug!(path = %req.path(), "unauthenticated request halted at the access gate");
            let response = Error::unauthorized("login required")
                .error_response()
                .map_into_right_body();
            let (request, _payload) = req.into_parts();
            return Box::pin(ready(Ok(ServiceResponse::new(request, response))));
        }
        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}
