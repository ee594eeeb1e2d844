pub mod project_handler;
pub mod quote_handler;
