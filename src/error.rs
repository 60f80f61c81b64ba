//! The error type handlers and guards return.
//!
//! Anything convertible into [`anyhow::Error`] becomes a 500. Client mistakes,
//! such as an unknown form value, carry their own status. Either way the
//! response is the bare status, rendered by the app's catcher.

use std::fmt;

use rocket::http::Status;
use rocket::request::Request;
use rocket::response;
use rocket::response::Responder;

#[derive(Debug)]
pub struct Error {
    pub error: anyhow::Error,
    pub status: Status,
}

pub type Result<T = ()> = std::result::Result<T, Error>;

impl<E> From<E> for Error
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        Error::with_status(error, Status::InternalServerError)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.status.code)
    }
}

impl Error {
    pub fn with_status<E: Into<anyhow::Error>>(error: E, status: Status) -> Self {
        Self {
            error: error.into(),
            status,
        }
    }

    /// A request the app understood but cannot act on, e.g. an unknown
    /// `message_type`.
    pub fn unprocessable<E: Into<anyhow::Error>>(error: E) -> Self {
        Self::with_status(error, Status::UnprocessableEntity)
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        if self.status.code >= 500 {
            log::error!("{} {}: {:#}", req.method(), req.uri(), self.error);
        } else {
            log::warn!("{} {}: {:#}", req.method(), req.uri(), self.error);
        }

        Err(self.status)
    }
}
