pub mod dashboard;
pub mod grant_callback;
pub mod messages;
pub mod settings;
