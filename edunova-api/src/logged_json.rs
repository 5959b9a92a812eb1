//! A drop-in replacement for `Json<T>` as a data guard that logs payloads
//! that fail to deserialize. Malformed request bodies otherwise surface
//! only as bare 422 responses, which makes client bugs hard to chase.

use std::ops::Deref;

use rocket::data::{Data, FromData, Outcome};
use rocket::request::Request;
use rocket::serde::json::{self, Json};
use serde::Deserialize;

pub struct LoggedJson<T>(pub T);

#[rocket::async_trait]
impl<'r, T: Deserialize<'r>> FromData<'r> for LoggedJson<T> {
    type Error = json::Error<'r>;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> Outcome<'r, Self> {
        match Json::<T>::from_data(req, data).await {
            Outcome::Success(value) => Outcome::Success(LoggedJson(value.into_inner())),
            Outcome::Error((status, err)) => {
                eprintln!("Rejected JSON payload on {}: {:?}", req.uri().path(), err);
                Outcome::Error((status, err))
            }
            Outcome::Forward(forward) => Outcome::Forward(forward),
        }
    }
}

impl<T> Deref for LoggedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
