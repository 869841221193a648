mod body;
mod error;
mod headers;
mod query;

pub use error::BodyError;
