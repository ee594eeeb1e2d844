pub mod project_router;
pub mod quote_router;
