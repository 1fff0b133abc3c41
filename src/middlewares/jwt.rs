use std::future::{ready, Ready};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::context::UserInfo;
use crate::core::models::user::Role;
use crate::core::tokener::{Payload, Tokener};
use crate::impls::tokener::jwt::JWT;

pub static JWT_SECRET: &str = "JWT_SECRET";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub sub: i32,
    pub role: Role,
    pub exp: i64,
}

impl Payload for Claim {
    fn user_id(&self) -> i32 {
        self.sub
    }
}

/// Verifies the bearer token and stashes `UserInfo` for the handlers and the
/// role gate downstream.
pub struct Jwt;

impl<S> Transform<S, ServiceRequest> for Jwt
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error>,
    S::Future: 'static,
{
    type Response = S::Response;
    type Error = Error;
    type Transform = JwtService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtService { service }))
    }
}

pub struct JwtService<S> {
    service: S,
}

impl<S> Service<ServiceRequest> for JwtService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error>,
    S::Future: 'static,
{
    type Response = S::Response;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(|h| h.strip_prefix("Bearer ").unwrap_or(h).to_owned());
        let token = match token {
            Some(token) => token,
            None => return Box::pin(async move { Err(ErrorUnauthorized("no token in header")) }),
        };
        let secret = match dotenv::var(JWT_SECRET) {
            Ok(secret) => secret,
            Err(_) => return Box::pin(async move { Err(actix_web::error::ErrorInternalServerError("missing jwt secret")) }),
        };
        let tokener = JWT::new(secret.into_bytes());
        match <JWT as Tokener<Claim>>::verify_token(&tokener, &token) {
            Ok(claim) => {
                req.extensions_mut().insert(UserInfo {
                    id: claim.sub,
                    role: claim.role,
                });
            }
            Err(e) => {
                log::debug!("token rejected: {}", e);
                return Box::pin(async move { Err(ErrorUnauthorized("invalid token")) });
            }
        }
        let res_fut = self.service.call(req);
        Box::pin(res_fut)
    }
}
