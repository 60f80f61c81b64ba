use std::process;

use flashlib::config::{Configurable, FlashScopeConfig};

#[rocket::main]
async fn main() {
    // Load .env files
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    if let Err(e) = FlashScopeConfig::check_conf() {
        println!("{}", e);
        process::exit(1);
    }

    if let Err(e) = flashlib::rocket().launch().await {
        println!("Whoops! Rocket didn't launch!");
        // We drop the error to get a Rocket-formatted panic.
        drop(e);
    };
}
