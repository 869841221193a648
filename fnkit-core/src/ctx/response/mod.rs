mod envelope;
mod error;
mod sink;
mod writers;

pub use envelope::*;
pub use error::FatalError;
pub use sink::*;
pub use writers::JSON_CONTENT_TYPE;
