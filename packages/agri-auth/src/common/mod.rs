// Common types and utilities shared across the crate

pub mod phone;

pub use phone::{hash_phone_number, mask_phone_number};
