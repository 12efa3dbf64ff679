//! Model persistence
//!
//! Trained models serialize to a checked binary encoding: a small envelope
//! (magic bytes, format version, learner-type tag, payload checksum) around
//! a bincode payload of parallel per-feature arrays. Loading verifies the
//! envelope before reconstructing a model through the validating
//! constructors; any failure is a format error and nothing partial escapes.

mod serializer;

pub use serializer::{load_classifier, load_model, model_from_bytes, model_to_bytes, save_model};
