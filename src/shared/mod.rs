pub mod errors;
pub mod retry;

pub use errors::*;
pub use retry::*;
