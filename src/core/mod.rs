pub mod errors;
pub mod refined;

pub use errors::{Error, Result, ResultExt};
