//! Reusable pieces drawn on every chart screen.

pub mod header;
pub mod logo;
