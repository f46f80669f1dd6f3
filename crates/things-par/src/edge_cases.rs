//! Edge case tests for things-par
