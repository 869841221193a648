pub mod config;
pub mod ctx;
pub mod logging;

#[cfg(test)]
mod test_helpers;
