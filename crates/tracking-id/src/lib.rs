#![doc = include_str!("../README.md")]

mod base36;
mod futures;
mod generator;
mod id;
mod record;
mod store;
mod time;
mod workflow;

pub use crate::base36::*;
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::record::*;
pub use crate::store::*;
pub use crate::time::*;
pub use crate::workflow::*;
