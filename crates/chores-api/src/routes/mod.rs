//! # API Route Modules
//!
//! - `week`: the current week's assignments and the completion toggles.
//! - `rotation`: manual rotation trigger.
//! - `web`: the HTML page and its static assets.

pub mod rotation;
pub mod web;
pub mod week;
