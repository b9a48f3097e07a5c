//! Codec module for the persisted list file format.

pub mod list_file;

pub use list_file::{decode_list, encode_list, CodecError};
