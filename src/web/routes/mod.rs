pub mod monitor_routes;
pub mod settings_routes;
pub mod source_routes;
