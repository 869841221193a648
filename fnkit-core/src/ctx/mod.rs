mod correlation_id;
mod function_ctx;
mod request;
mod response;
#[cfg(test)]
mod tests;

pub use correlation_id::*;
pub use function_ctx::FunctionCtx;
pub use request::BodyError;
pub use response::*;
