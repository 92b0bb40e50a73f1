//! Static Huffman Compression
//!
//! A single Huffman tree is built from the byte frequencies of the whole input.
//! The compressed data is the header (see `crate::header`) followed immediately by
//! the packed codes, MSB first, with the last byte padded out with zeros.
//!
//! * This transforms buffers, the whole input is held in memory
//! * Expanded data is limited to `u32::MAX` bytes by the header format
//! * There is no checksum, corrupt payload bits decode to wrong symbols rather than errors

use std::io::{Cursor,Read,Write,Seek,SeekFrom,ErrorKind};
use crate::header::Header;
use crate::tools::bit_stream::{BitReader,BitWriter};
use crate::tools::code_table::CodeTable;
use crate::tools::huff_tree::{self,Node};
use crate::{DYNERR,Error,Options};

/// Compress `dat` into header plus payload.
pub fn encode(dat: &[u8]) -> Result<Vec<u8>,Error> {
    let header = Header::from_bytes(dat)?;
    let mut ans = Vec::with_capacity(header.encoded_len() + dat.len()/2);
    header.write(&mut ans)?;
    log::debug!("header has {} entries, {} bytes",header.freq.distinct(),ans.len());
    let root = match huff_tree::build(&header.freq) {
        Some(root) => root,
        None => {
            log::debug!("empty input, no payload");
            return Ok(ans);
        }
    };
    let table = CodeTable::from_tree(&root);
    let mut writer = BitWriter::new(&mut ans);
    for by in dat {
        match table.get(*by) {
            Some(code) => writer.put_code(code)?,
            None => unreachable!("symbol {:02X} was counted but has no code",by)
        }
    }
    log::trace!("{} full bytes before the last",writer.bytes_written());
    writer.finish()?;
    log::debug!("payload has {} bytes",ans.len() - header.encoded_len());
    Ok(ans)
}

/// Expand data produced by `encode`.
/// Anything following the padded payload is ignored.
pub fn decode(dat: &[u8]) -> Result<Vec<u8>,Error> {
    let mut cursor = Cursor::new(dat);
    let header = Header::read(&mut cursor)?;
    let textsize = header.original_length as usize;
    log::debug!("header declares {} bytes from {} symbols",textsize,header.freq.distinct());
    if textsize == 0 {
        return Ok(Vec::new());
    }
    let root = huff_tree::build(&header.freq).ok_or(Error::HeaderFormat)?;
    if let Node::Leaf { symbol, .. } = &root {
        // nothing to disambiguate, no bits were written
        log::debug!("single symbol {:02X} repeated",symbol);
        return Ok(vec![*symbol;textsize]);
    }
    // every symbol takes at least one bit, so do not trust the header for the allocation
    let remaining = dat.len() - cursor.position() as usize;
    let mut ans = Vec::with_capacity(textsize.min(remaining.saturating_mul(8)));
    let mut reader = BitReader::new(cursor);
    while ans.len() < textsize {
        let mut node = &root;
        // travel from root to leaf, left on 0, right on 1
        loop {
            match node {
                Node::Leaf { symbol, .. } => {
                    ans.push(*symbol);
                    break;
                },
                Node::Branch { left, right, .. } => {
                    node = match reader.get_bit()? {
                        Some(false) => left,
                        Some(true) => right,
                        None => return Err(Error::TruncatedPayload)
                    };
                }
            }
        }
    }
    let cursor = reader.into_inner();
    log::debug!("payload ended at byte {} of {}",cursor.position(),dat.len());
    Ok(ans)
}

/// Length of the region to be processed, checked against the options
fn region_length<S: Seek>(stream: &mut S,opt: &Options) -> Result<u64,DYNERR> {
    let end = stream.seek(SeekFrom::End(0))?;
    if opt.in_offset > end {
        return Err(Box::new(std::io::Error::new(ErrorKind::InvalidInput,"offset is beyond end of input")));
    }
    let len = end - opt.in_offset;
    if len > opt.max_file_size {
        return Err(Box::new(Error::FileTooLarge));
    }
    stream.seek(SeekFrom::Start(opt.in_offset))?;
    Ok(len)
}

/// Main compression function.
/// `expanded_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `compressed_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn compress<R,W>(expanded_in: &mut R, compressed_out: &mut W, opt: &Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let expanded_length = region_length(expanded_in,opt)?;
    let mut ibuf = Vec::with_capacity(expanded_length as usize);
    expanded_in.read_to_end(&mut ibuf)?;
    let obuf = encode(&ibuf)?;
    compressed_out.seek(SeekFrom::Start(opt.out_offset))?;
    compressed_out.write_all(&obuf)?;
    compressed_out.flush()?;
    Ok((expanded_length,obuf.len() as u64))
}

/// Main decompression function.
/// `compressed_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `expanded_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn expand<R,W>(compressed_in: &mut R, expanded_out: &mut W, opt: &Options) -> Result<(u64,u64),DYNERR>
where R: Read + Seek, W: Write + Seek {
    let compressed_length = region_length(compressed_in,opt)?;
    let mut ibuf = Vec::with_capacity(compressed_length as usize);
    compressed_in.read_to_end(&mut ibuf)?;
    let obuf = decode(&ibuf)?;
    expanded_out.seek(SeekFrom::Start(opt.out_offset))?;
    expanded_out.write_all(&obuf)?;
    expanded_out.flush()?;
    Ok((compressed_length,obuf.len() as u64))
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

// *************** TESTS *****************

#[cfg(test)]
use crate::STD_OPTIONS;

/// deterministic pseudo-random bytes (xorshift)
#[cfg(test)]
fn noise(n: usize,mut state: u32) -> Vec<u8> {
    let mut ans = Vec::with_capacity(n);
    for _i in 0..n {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        ans.push((state >> 24) as u8);
    }
    ans
}

#[test]
fn compression_works() {
    let compressed = encode("aaaab".as_bytes()).expect("compression failed");
    // b gets code 0, a gets code 1, so the payload is 11110 padded
    let expected = "00000005 00000002 6100000004 6200000001 F0";
    assert_eq!(compressed,hex::decode(expected.replace(" ","")).unwrap());
}

#[test]
fn expansion_works() {
    let compressed = hex::decode("00000005 00000002 6100000004 6200000001 F0".replace(" ","")).unwrap();
    assert_eq!(decode(&compressed).expect("expansion failed"),"aaaab".as_bytes().to_vec());
    // padding bits are not interpreted
    let compressed = hex::decode("00000005 00000002 6100000004 6200000001 F7".replace(" ","")).unwrap();
    assert_eq!(decode(&compressed).expect("expansion failed"),"aaaab".as_bytes().to_vec());
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = encode(test_data).expect("compression failed");
    assert!(compressed.len() < test_data.len() + Header::from_bytes(test_data).unwrap().encoded_len());
    let expanded = decode(&compressed).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
}

#[test]
fn invertibility_random() {
    let test_data = noise(1000,0x2545f491);
    let compressed = encode(&test_data).expect("compression failed");
    let expanded = decode(&compressed).expect("expansion failed");
    assert_eq!(expanded.len(),1000);
    assert_eq!(test_data,expanded);
}

#[test]
fn invertibility_all_symbols() {
    // skewed distribution over every byte value gives long codes
    let mut test_data = Vec::new();
    for i in 0..=255u8 {
        let reps = 1 + (i as usize % 17) * (i as usize % 5);
        test_data.extend(std::iter::repeat(i).take(reps));
    }
    test_data.extend(noise(500,7));
    let compressed = encode(&test_data).expect("compression failed");
    assert_eq!(decode(&compressed).expect("expansion failed"),test_data);
}

#[test]
fn empty_input() {
    let compressed = encode(&[]).expect("compression failed");
    assert_eq!(compressed,vec![0;8]);
    assert_eq!(decode(&compressed).expect("expansion failed"),Vec::<u8>::new());
}

#[test]
fn single_symbol() {
    let test_data = vec![b'q';777];
    let compressed = encode(&test_data).expect("compression failed");
    // header only, the lone leaf has an empty code
    assert_eq!(compressed,hex::decode("00000309 00000001 7100000309".replace(" ","")).unwrap());
    assert_eq!(decode(&compressed).expect("expansion failed"),test_data);
    let compressed = encode(&[0]).expect("compression failed");
    assert_eq!(decode(&compressed).expect("expansion failed"),vec![0]);
}

#[test]
fn deterministic() {
    let test_data = noise(4096,99);
    assert_eq!(encode(&test_data).unwrap(),encode(&test_data).unwrap());
}

#[test]
fn truncated_payload() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = encode(test_data).expect("compression failed");
    let header_len = Header::from_bytes(test_data).unwrap().encoded_len();
    let res = decode(&compressed[0..compressed.len()-2]);
    assert!(matches!(res,Err(Error::TruncatedPayload)));
    let res = decode(&compressed[0..header_len]);
    assert!(matches!(res,Err(Error::TruncatedPayload)));
    let res = decode(&compressed[0..header_len-1]);
    assert!(matches!(res,Err(Error::HeaderFormat)));
}

#[test]
fn trailing_bytes_ignored() {
    let test_data = "abracadabra".as_bytes();
    let mut compressed = encode(test_data).expect("compression failed");
    compressed.extend_from_slice(&[0xde,0xad,0xbe,0xef]);
    assert_eq!(decode(&compressed).expect("expansion failed"),test_data.to_vec());
}

#[test]
fn stream_offsets() {
    let test_data = [b"HEAD".to_vec(),noise(300,5)].concat();
    let mut opt = STD_OPTIONS;
    opt.in_offset = 4;
    opt.out_offset = 2;
    let mut src = Cursor::new(test_data.as_slice());
    let mut dst: Cursor<Vec<u8>> = Cursor::new(vec![0xaa,0xbb]);
    let (in_size,out_size) = compress(&mut src,&mut dst,&opt).expect("compression failed");
    assert_eq!(in_size,300);
    let compressed = dst.into_inner();
    assert_eq!(compressed.len() as u64,out_size + 2);
    assert_eq!(compressed[0..2].to_vec(),vec![0xaa,0xbb]);
    opt.in_offset = 2;
    opt.out_offset = 0;
    let expanded = expand_slice(&compressed,&opt).expect("expansion failed");
    assert_eq!(expanded,test_data[4..].to_vec());
}

#[test]
fn size_limit() {
    let mut opt = STD_OPTIONS;
    opt.max_file_size = 10;
    assert!(compress_slice(&noise(11,1),&opt).is_err());
    let compressed = compress_slice(&noise(10,1),&opt).expect("compression failed");
    assert!(expand_slice(&compressed,&STD_OPTIONS).is_ok());
}
