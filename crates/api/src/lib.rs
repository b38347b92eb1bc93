pub mod endpoints;
pub mod error;
pub mod session;
pub mod types;

pub use error::*;
pub use session::*;
pub use types::*;
