pub mod catchers;
pub mod demo;
pub mod home;
