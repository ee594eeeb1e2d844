pub mod activity_log;
pub mod lot;
pub mod project;
pub mod quote;
pub mod user;
