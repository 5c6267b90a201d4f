mod error;
mod interface;
mod lock;
mod mutex;
mod status;
#[cfg(test)]
mod tests;

pub use error::*;
pub use interface::*;
pub use lock::*;
pub use mutex::*;
pub use status::*;
