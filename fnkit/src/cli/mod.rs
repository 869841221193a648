pub mod env;
pub mod invoke;
