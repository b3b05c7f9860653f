//! Fontfall CLI - thin inspection surface over the fallback engine.

pub mod cli;
