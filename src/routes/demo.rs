//! Test form routes, mounted at "/"

use anyhow::anyhow;
use rocket::form::{Form, FromForm};
use rocket::response::Redirect;
use rocket::uri;
use rocket::{get, post};
use rocket_dyn_templates::Template;

use crate::error;
use crate::flash::FlashScope;
use crate::models::FlashMessage;
use crate::response::form_context;

#[derive(Debug, FromForm)]
pub struct MessageTypeSubmit<'v> {
    pub message_type: &'v str,
}

/// Show the form for queueing a canned notice.
#[get("/test")]
pub async fn test_form(flash: FlashScope<'_>) -> Template {
    let context = form_context(flash.take_notices());
    Template::render("test", &context.into_json())
}

/// POST-handler queueing the canned notice for `message_type`. The notice
/// reaches the store after this response is built.
#[post("/test", data = "<form>")]
pub async fn queue_message<'a>(
    flash: FlashScope<'_>,
    form: Form<MessageTypeSubmit<'a>>,
) -> error::Result<Redirect> {
    let message = FlashMessage::canned(form.message_type).ok_or_else(|| {
        error::Error::unprocessable(anyhow!("unknown message type {:?}", form.message_type))
    })?;

    log::debug!("queueing {} notice", message.category);
    flash.push(message);
    Ok(Redirect::to(uri!("/")))
}
