pub mod project_service;
pub mod quote_number;
pub mod quote_service;
