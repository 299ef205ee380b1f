//! External services the drivers call out to.

pub mod geocode;
