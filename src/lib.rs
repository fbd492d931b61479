#![cfg_attr(not(any(test, doctest, feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

mod clocked;
pub use clocked::*;
mod width;
pub use width::*;
mod edge;
pub use edge::*;
mod error;
pub use error::*;
mod cic;
pub use cic::*;
mod pdm;
pub use pdm::*;
mod config;
pub use config::*;
mod rate;
pub use rate::*;
mod framer;
pub use framer::*;
mod converter;
pub use converter::*;

#[cfg(test)]
pub mod testing;
