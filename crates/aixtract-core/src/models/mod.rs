//! Data models shared by the pipeline stages.

pub mod config;
pub mod document;
pub mod generated;
pub mod score;
pub mod segments;
