//! Ferrous Named Infrastructure Layer
pub mod dns;
pub mod system;
