pub mod health_handler;
pub mod play_handler;

pub use health_handler::health_check;
pub use play_handler::configure as configure_play_routes;
