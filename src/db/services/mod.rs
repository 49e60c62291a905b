pub mod settings_service;
pub mod source_service;
pub mod version_service;
