//! Home routes, mounted at "/"

use rocket::get;
use rocket_dyn_templates::Template;

use crate::flash::FlashScope;
use crate::response::flash_context;

#[get("/")]
pub async fn index(flash: FlashScope<'_>) -> Template {
    let context = flash_context(flash.take_notices());
    Template::render("index", &context.into_json())
}
