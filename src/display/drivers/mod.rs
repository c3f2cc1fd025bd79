// src/display/drivers/mod.rs
//! Native pump implementations.

pub mod headless;

pub use headless::{HeadlessPump, PresentRecord};
