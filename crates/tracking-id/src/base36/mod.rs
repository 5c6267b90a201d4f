mod codec;
mod error;
mod number;

pub use codec::*;
pub use error::*;
pub use number::*;
