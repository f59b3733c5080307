// src/app/mod.rs

pub mod input;
pub mod state;
