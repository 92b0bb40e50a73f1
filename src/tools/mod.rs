//! Building blocks shared by the encoder and decoder

pub mod bit_stream;
pub mod freq_table;
pub mod huff_tree;
pub mod code_table;
