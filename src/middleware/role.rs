use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::{database::Store, models::Role, services::Claims, utils::AppError};

/// Lets a request through only when the token's email belongs to an active user
/// holding one of the accepted roles. Must run after `JwtAuth`.
pub struct RequireRole {
    roles: Rc<[Role]>,
}

impl RequireRole {
    pub fn any_of(roles: &[Role]) -> Self {
        assert!(!roles.is_empty(), "RequireRole needs at least one role");
        Self { roles: roles.into() }
    }

    pub fn hr() -> Self {
        Self::any_of(&[Role::Hr])
    }

    pub fn employee() -> Self {
        Self::any_of(&[Role::Employee])
    }

    pub fn admin() -> Self {
        Self::any_of(&[Role::Admin])
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            roles: Rc::clone(&self.roles),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    roles: Rc<[Role]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let roles = Rc::clone(&self.roles);

        Box::pin(async move {
            let verdict = authorize(&req, &roles).await;
            match verdict {
                Ok(()) => service.call(req).await.map(ServiceResponse::map_into_left_body),
                Err(e) => Ok(req.error_response(e).map_into_right_body()),
            }
        })
    }
}

async fn authorize(req: &ServiceRequest, roles: &[Role]) -> Result<(), AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("no token".to_string()))?;

    let store = req
        .app_data::<web::Data<dyn Store>>()
        .cloned()
        .ok_or_else(|| AppError::Config("store not registered".to_string()))?;

    match store.find_user_with_roles(&claims.email, roles).await? {
        Some(user) if !user.is_fired => Ok(()),
        Some(_) => {
            log::warn!("🚫 {} is fired, {} denied", claims.email, req.path());
            Err(AppError::forbidden())
        }
        None => {
            log::warn!("🚫 {} lacks role {:?} for {}", claims.email, roles, req.path());
            Err(AppError::forbidden())
        }
    }
}
