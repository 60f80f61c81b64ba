//! Request lifecycle glue between the browser session and the message store.
//!
//! Before routing, pending messages are pulled from the store and stashed in
//! a private session cookie, where they wait until a page renders them.
//! Handlers queue outgoing messages on a request-local [`Outbox`], which is
//! flushed to the store once the response is built.
//!
//! Rocket discards cookie changes when a request ends in a catcher, so the
//! fetched messages are also kept on the request and stashed again by
//! [`restash_fetched`] from the app's catcher.

use std::sync::Mutex;

use anyhow::anyhow;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{CookieJar, Status};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::{Build, Data, Response, Rocket};

use crate::config::FlashScopeConfig;
use crate::error;
use crate::models::FlashMessage;
use crate::store::MessageStore;

/// Private cookie holding fetched notices not yet shown.
pub const SESSION_COOKIE: &str = "_flashes";

/// Encoded stash size past which browsers may drop the cookie. Encryption
/// and base64 add roughly a third on top of the JSON.
pub const STASH_WARN_BYTES: usize = 3000;

/// What the pre-request fetch did, cached on the request.
#[derive(Debug)]
enum FetchOutcome {
    Fetched(Vec<FlashMessage>),
    Failed(String),
    Skipped,
}

/// Messages queued while handling a single request.
#[derive(Debug, Default)]
pub struct Outbox(Mutex<Vec<FlashMessage>>);

impl Outbox {
    pub fn push(&self, message: FlashMessage) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).push(message);
    }

    pub fn drain(&self) -> Vec<FlashMessage> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

fn stashed(cookies: &CookieJar<'_>) -> Vec<FlashMessage> {
    match cookies.get_private_pending(SESSION_COOKIE) {
        Some(cookie) => serde_json::from_str(cookie.value()).unwrap_or_else(|e| {
            log::warn!("dropping corrupt {} cookie: {}", SESSION_COOKIE, e);
            Vec::new()
        }),
        None => Vec::new(),
    }
}

fn oversized(value: &str) -> bool {
    value.len() > STASH_WARN_BYTES
}

fn stash(cookies: &CookieJar<'_>, messages: Vec<FlashMessage>) -> error::Result<()> {
    let mut pending = stashed(cookies);
    pending.extend(messages);
    let value = serde_json::to_string(&pending)?;
    if oversized(&value) {
        log::warn!(
            "{} cookie holds {} notice(s) in {} bytes; browsers may drop it",
            SESSION_COOKIE,
            pending.len(),
            value.len()
        );
    }
    cookies.add_private((SESSION_COOKIE, value));
    Ok(())
}

/// Stashes this request's fetched messages again. Meant for catchers, since
/// the cookie written before routing does not survive an error response.
pub fn restash_fetched(req: &Request<'_>) {
    if let FetchOutcome::Fetched(messages) = req.local_cache(|| FetchOutcome::Skipped) {
        if messages.is_empty() {
            return;
        }
        if let Err(e) = stash(req.cookies(), messages.clone()) {
            log::error!("re-stashing {} flash message(s): {}", messages.len(), e);
        }
    }
}

/// Request guard for handlers: reads the session notices and queues new
/// messages. Fails with a 500 when the pre-request fetch failed.
pub struct FlashScope<'r> {
    cookies: &'r CookieJar<'r>,
    outbox: &'r Outbox,
}

impl<'r> FlashScope<'r> {
    /// Takes every notice waiting in the session. They are gone afterwards.
    pub fn take_notices(&self) -> Vec<FlashMessage> {
        let notices = stashed(self.cookies);
        if self.cookies.get_private_pending(SESSION_COOKIE).is_some() {
            self.cookies.remove_private(SESSION_COOKIE);
        }
        notices
    }

    /// Queues `message` for the store; sent after the response is built.
    pub fn push(&self, message: FlashMessage) {
        self.outbox.push(message);
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for FlashScope<'r> {
    type Error = error::Error;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.local_cache(|| FetchOutcome::Skipped) {
            FetchOutcome::Failed(reason) => Outcome::Error((
                Status::InternalServerError,
                error::Error::from(anyhow!("could not fetch flash messages: {}", reason)),
            )),
            _ => Outcome::Success(FlashScope {
                cookies: req.cookies(),
                outbox: req.local_cache(Outbox::default),
            }),
        }
    }
}

#[derive(Default)]
pub struct FlashRelay;

impl FlashRelay {
    pub fn fairing() -> impl Fairing {
        FlashRelay::default()
    }
}

#[rocket::async_trait]
impl Fairing for FlashRelay {
    fn info(&self) -> Info {
        Info {
            name: "Flash Message Relay",
            kind: Kind::Ignite | Kind::Request | Kind::Response,
        }
    }

    /// Reads the `flash_scope` configuration and manages the store client.
    /// Ignition is aborted if either step fails.
    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match FlashScopeConfig::extract(rocket.figment()) {
            Ok(config) => config,
            Err(e) => {
                log::error!("flash relay misconfigured: {}", e);
                return Err(rocket);
            }
        };

        match MessageStore::new(&config) {
            Ok(store) => {
                log::info!("relaying flash messages via {}", store.url());
                Ok(rocket.manage(store))
            }
            Err(e) => {
                log::error!("flash relay failed to build store client: {}", e);
                Err(rocket)
            }
        }
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        let outcome = match req.rocket().state::<MessageStore>() {
            Some(store) => match store.fetch().await {
                Ok(messages) if messages.is_empty() => FetchOutcome::Fetched(messages),
                Ok(messages) => match stash(req.cookies(), messages.clone()) {
                    Ok(()) => {
                        rocket::info!("stashed {} flash message(s)", messages.len());
                        FetchOutcome::Fetched(messages)
                    }
                    Err(e) => FetchOutcome::Failed(e.to_string()),
                },
                Err(e) => {
                    rocket::error!("fetching flash messages: {}", e);
                    FetchOutcome::Failed(e.to_string())
                }
            },
            None => {
                log::error!("could not fetch message store");
                FetchOutcome::Skipped
            }
        };

        req.local_cache(|| outcome);
    }

    /// Flushes the outbox. A failed flush replaces the response with a 500
    /// that keeps the cookies already set on it.
    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let queued = req.local_cache(Outbox::default).drain();
        if queued.is_empty() {
            return;
        }

        let Some(store) = req.rocket().state::<MessageStore>() else {
            log::error!("could not fetch message store");
            return;
        };

        if let Err(e) = store.push(&queued).await {
            rocket::error!("sending {} flash message(s): {}", queued.len(), e);
            let cookies: Vec<String> = res
                .headers()
                .get("Set-Cookie")
                .map(String::from)
                .collect();
            let mut failed = Response::build()
                .status(Status::InternalServerError)
                .finalize();
            for cookie in cookies {
                failed.adjoin_raw_header("Set-Cookie", cookie);
            }
            *res = failed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlashCategory;

    #[test]
    fn outbox_drains_in_queue_order() {
        let outbox = Outbox::default();
        outbox.push(FlashMessage::new(FlashCategory::Info, "first"));
        outbox.push(FlashMessage::new(FlashCategory::Error, "second"));

        let drained = outbox.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].content, "first");
        assert_eq!(drained[1].content, "second");
        assert!(outbox.drain().is_empty());
    }

    #[test]
    fn large_stash_is_flagged() {
        let few = vec![FlashMessage::new(FlashCategory::Success, "Saved"); 3];
        assert!(!oversized(&serde_json::to_string(&few).unwrap()));

        let many = vec![FlashMessage::new(FlashCategory::Warn, "x".repeat(100)); 40];
        assert!(oversized(&serde_json::to_string(&many).unwrap()));
    }
}
