mod encoding;
mod error;
pub mod log;

pub use encoding::{expect_len, to_hex};
pub use error::Error;
