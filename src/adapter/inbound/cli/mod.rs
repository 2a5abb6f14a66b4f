//! CLI module graph.

pub mod admin;
pub mod check;
pub mod command;
pub mod cycle;
pub mod dispatch;
pub mod output;
pub mod report;
pub mod run;
pub mod status;
