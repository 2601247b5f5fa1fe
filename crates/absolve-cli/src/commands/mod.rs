pub mod resolve;
pub mod schema_check;
