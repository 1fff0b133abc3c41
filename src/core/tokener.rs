use serde::{Deserialize, Serialize};

use crate::error::Error;

pub trait Payload: Serialize + for<'d> Deserialize<'d> {
    fn user_id(&self) -> i32;
}

pub trait Tokener<P: Payload> {
    fn gen_token(&self, payload: &P) -> Result<String, Error>;
    fn verify_token(&self, token: &str) -> Result<P, Error>;
}
