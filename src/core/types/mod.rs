pub mod config;
mod category;
mod error;
mod result;
mod summary;

pub use category::*;
pub use error::*;
pub use result::*;
pub use summary::*;
