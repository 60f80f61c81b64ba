use rocket::figment::Figment;
use rocket::{catchers, routes, Build, Rocket};
use rocket_dyn_templates::Template;

pub mod config;
pub mod error;
pub mod flash;
pub mod models;
pub mod response;
pub mod routes;
pub mod store;

/// The app, configured from `Rocket.toml`, `ROCKET_*` and `JWT_TOKEN`.
pub fn rocket() -> Rocket<Build> {
    build(config::figment())
}

/// The app, configured from `figment`.
pub fn build(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(Template::fairing())
        .attach(flash::FlashRelay::fairing())
        .mount("/", routes![
            routes::home::index,
            routes::demo::test_form,
            routes::demo::queue_message,
        ])
        .register("/", catchers![routes::catchers::default_catcher])
}
