//! Informational - cached, display-ready breakdowns and what-if previews

pub mod cache;
pub mod display;
