use std::future::{Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use actix_web::{Error, HttpResponse, web};

use crate::auth::{AUTH_COOKIE, AuthenticatedUser};
use crate::config::ServerConfig;

/// Sends anonymous requests to the auth service instead of returning 401.
///
/// Wraps the session-gated UI scope; the automation API authenticates with a
/// bearer token and stays outside this middleware.
pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let config = req.app_data::<web::Data<ServerConfig>>().cloned();

        let authenticated = config
            .as_ref()
            .and_then(|config| {
                req.cookie(AUTH_COOKIE)
                    .and_then(|cookie| AuthenticatedUser::from_token(cookie.value(), &config.secret))
            })
            .is_some();

        if authenticated {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let location = config
            .map(|config| config.auth_service_url.clone())
            .unwrap_or_else(|| "/".to_string());

        Box::pin(async move {
            let (request, _payload) = req.into_parts();
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish()
                .map_into_right_body();

            Ok(ServiceResponse::new(request, response))
        })
    }
}
