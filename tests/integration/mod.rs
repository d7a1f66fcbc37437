//! Integration Tests Module
//!
//! End-to-end tests of the intent layer: pattern parsing, parameter
//! extraction, the generative fallback against a mock provider, and
//! configuration loading.

// Pattern table and parser behavior
mod intent_parser_test;

// Second-stage parameter validation
mod extractor_test;

// Fallback resolution with a mock provider
mod fallback_test;

// Configuration loading and provider selection
mod config_test;
