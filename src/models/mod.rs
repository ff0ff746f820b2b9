pub mod authorization;
pub mod org;

pub use authorization::*;
pub use org::*;
