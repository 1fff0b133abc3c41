use std::future::{ready, Ready};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;

use crate::context::UserInfo;
use crate::core::models::user::Role;
use crate::error::Error;

/// Uniform role gate. Wrap a scope with the minimum role it requires; the
/// `Jwt` middleware must run before this one.
pub struct RequireRole {
    min: Role,
}

impl RequireRole {
    pub fn admin() -> Self {
        Self { min: Role::Admin }
    }

    pub fn super_admin() -> Self {
        Self { min: Role::SuperAdmin }
    }
}

impl<S> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = ActixError>,
    S::Future: 'static,
{
    type Response = S::Response;
    type Error = ActixError;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService { min: self.min, service }))
    }
}

pub struct RequireRoleService<S> {
    min: Role,
    service: S,
}

impl<S> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = ActixError>,
    S::Future: 'static,
{
    type Response = S::Response;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let user = req.extensions().get::<UserInfo>().cloned();
        match user {
            None => Box::pin(async move { Err(Error::Unauthorized.into()) }),
            Some(user) if user.role < self.min => Box::pin(async move { Err(Error::Forbidden.into()) }),
            Some(_) => Box::pin(self.service.call(req)),
        }
    }
}
