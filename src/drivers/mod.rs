//! Session drivers: one per cell side, each owning its host connection.

pub mod form;
pub mod map;
