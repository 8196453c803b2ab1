//! Consolidated test utilities for food-directory
//!
//! This module provides a counting mock backend for library-level scenarios and
//! on-disk data directories for CLI tests.

pub mod assertions;
pub mod backend;
pub mod data_dir;
pub mod fixtures;
