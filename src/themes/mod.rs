//! Theme system for color management
//!
//! Semantic color system: colors are organized by purpose, not by
//! color name. See theme.rs for the full Theme struct.

pub mod theme;

pub use theme::Theme;
