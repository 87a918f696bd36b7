pub mod body;
pub mod error;
pub mod identity;

pub use body::*;
pub use error::*;
pub use identity::*;
