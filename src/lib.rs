// ABOUTME: Library crate for devmux exposing the public API for testing

pub mod cli;
pub mod detect;
pub mod models;
pub mod mux;
