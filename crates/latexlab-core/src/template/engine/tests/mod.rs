//! Tests for template engine
//!
//! Organized into focused submodules.

use super::*;

// Test helper functions
mod helpers;


mod render_blocks;

// Error and edge case tests
mod errors;
