// Calendar Gestures Library
// Exports all modules for testing and reuse

pub mod coordinator;
pub mod geometry;
pub mod gestures;
pub mod models;
pub mod utils;
