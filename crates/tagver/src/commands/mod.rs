//! Command implementations

pub mod bump;

pub mod describe;

pub mod version;
