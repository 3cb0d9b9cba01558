#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]

extern crate alloc;

pub mod adapter;
pub mod buffer;
pub(crate) mod commands;
pub mod packet;
pub(crate) mod responses;
pub mod scan;
pub mod tcp;
pub mod wifi;

#[cfg(feature = "examples")]
pub mod example;

#[cfg(test)]
mod tests;
