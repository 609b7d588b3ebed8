//! CLI commands

pub mod category;
pub mod check;
pub mod export;
pub mod list;
pub mod new;
pub mod preview;
pub mod publish;
