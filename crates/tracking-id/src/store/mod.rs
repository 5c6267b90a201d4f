mod error;
mod interface;
mod memory;

pub use error::*;
pub use interface::*;
pub use memory::*;
