//! Imaging adapter. Sniffs uploads and prepares them for the completion request.
//!
//! Decoding and encoding are delegated to the `image` crate.

pub mod jpeg_encoder;

pub use jpeg_encoder::{encode_for_upload, inspect_upload};
