//! Integration tests for the parameter system
