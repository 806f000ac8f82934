// commands/mod.rs

pub mod apply;
pub mod base;
pub mod common_args;
pub mod destroy;
pub mod plan;
