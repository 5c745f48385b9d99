// src/lib.rs - Library root for Drop & See

pub mod api;
pub mod cli;
pub mod infra;
pub mod pages;
pub mod router;
pub mod tui;
pub mod upload;
pub mod util;
