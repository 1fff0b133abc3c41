pub mod analytics;
pub mod audit;
pub mod department;
pub mod option;
pub mod question;
pub mod section;
pub mod submission;
pub mod survey;
pub mod user;

use std::ops::Add;

use actix_web::http::StatusCode;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use hex::ToHex;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{query, query_as, PgPool};

use crate::core::models::user::{Role, User};
use crate::core::tokener::Tokener;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::jwt::{Claim, JWT_SECRET};

fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

fn random_salt() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn login(Json(Login { username, password }): Json<Login>, db: Data<PgPool>) -> Result<Json<TokenResponse>, Error> {
    let user: Option<User> = query_as("SELECT * FROM users WHERE email = $1 OR nickname = $1")
        .bind(&username)
        .fetch_optional(db.get_ref())
        .await?;
    if let Some(user) = user {
        if hash_password(&password, &user.salt) != user.password {
            return Err(Error::Unauthorized);
        }
        let claim = Claim {
            sub: user.id,
            role: user.role,
            exp: chrono::Utc::now().add(chrono::Duration::days(30)).timestamp(),
        };
        let secret = dotenv::var(JWT_SECRET)?;
        let tokener = JWT::new(secret.into_bytes());
        let token = tokener.gen_token(&claim)?;
        return Ok(Json(TokenResponse { token }));
    }
    Err(Error::Unauthorized)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signup {
    nickname: String,
    email: String,
    password: String,
}

pub async fn signup(Json(Signup { nickname, email, password }): Json<Signup>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    if nickname.is_empty() || email.is_empty() || password.is_empty() {
        return Err(Error::Validation("nickname, email and password are required".into()));
    }
    let slt = random_salt();
    query("INSERT INTO users (nickname, email, password, salt, role) VALUES ($1, $2, $3, $4, $5)")
        .bind(nickname)
        .bind(email)
        .bind(hash_password(&password, &slt))
        .bind(slt)
        .bind(Role::Employee)
        .execute(db.get_ref())
        .await?;
    Ok(HttpResponse::build(StatusCode::OK).finish())
}
