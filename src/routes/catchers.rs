//! Error pages, registered at "/"

use rocket::catch;
use rocket::http::Status;
use rocket::request::Request;
use rocket_dyn_templates::Template;

use crate::flash;
use crate::response::flash_context;

/// Renders every error status. Notices fetched for the failed request are
/// stashed again so the next page still shows them.
#[catch(default)]
pub fn default_catcher(status: Status, req: &Request<'_>) -> (Status, Template) {
    flash::restash_fetched(req);

    let mut context = flash_context(Vec::new());
    context.insert("code", &status.code);
    context.insert("reason", status.reason().unwrap_or("Error"));
    (status, Template::render("error", &context.into_json()))
}
