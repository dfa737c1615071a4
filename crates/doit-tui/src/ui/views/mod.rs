//! Views selected by the current route.

pub mod detail;
pub mod list;
