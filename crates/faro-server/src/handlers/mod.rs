//! Request handlers, grouped by surface.

pub mod admin;
pub mod categories;
pub mod incidents;
pub mod kml;
