//! Edge case tests for things-eval
