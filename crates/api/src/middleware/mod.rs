//! Request middleware.

pub mod origin;
