//! # Static Huffman compression
//!
//! Each input gets a single Huffman tree built from its own byte frequencies.
//! The frequency table travels in a preamble so the output can be expanded
//! without any external dictionary.
//!
//! * `encode` and `decode` transform whole buffers
//! * `static_huff::compress` and `static_huff::expand` work on seekable streams
//! * all header integers are big endian

mod tools;
pub mod header;
pub mod static_huff;

pub use static_huff::{encode,decode};
pub use tools::freq_table::FreqTable;

type DYNERR = Box<dyn std::error::Error>;

/// Codec Errors
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("header is truncated or inconsistent")]
    HeaderFormat,
    #[error("payload ended before all symbols were decoded")]
    TruncatedPayload,
    #[error("file too large")]
    FileTooLarge,
    #[error(transparent)]
    Io(#[from] std::io::Error)
}

/// Options controlling compression
#[derive(Clone)]
pub struct Options {
    /// starting position in the input file
    pub in_offset: u64,
    /// starting position in the output file
    pub out_offset: u64,
    /// return error if the data to be compressed is larger
    pub max_file_size: u64
}

pub const STD_OPTIONS: Options = Options {
    in_offset: 0,
    out_offset: 0,
    max_file_size: u32::MAX as u64
};
