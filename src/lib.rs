//! Skirmish - Deterministic Turn-Based Squad Combat

pub mod core;
pub mod events;
pub mod game;
pub mod report;
pub mod scenario;
pub mod unit;
