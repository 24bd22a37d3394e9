//! Sample inputs shared by the integration tests.

#![allow(dead_code)]

pub const FARMER_PHONE: &str = "9876543210";
pub const OTHER_PHONE: &str = "9123456780";

/// Codes the session manager must accept.
pub const WELL_FORMED_CODES: &[&str] = &["1234", "0000", "9999", "0420"];

/// Codes the session manager must reject before reaching the provider.
pub const MALFORMED_CODES: &[&str] = &[
    "", "1", "12", "123", "12345", "12a4", "abcd", " 123", "12.4", "-123",
];

pub const SAMPLE_PHONES: &[&str] = &[
    "9876543210",
    "+919876543210",
    "0",
    "",
    "not-a-phone",
];
