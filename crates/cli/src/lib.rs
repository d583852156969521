//! Shared building blocks of the `defiguard` binary: error reporting, command line options and
//! terminal rendering.

#[macro_use]
extern crate tracing;

pub mod handler;
pub mod opts;
pub mod render;
pub mod utils;
