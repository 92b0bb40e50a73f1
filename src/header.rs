//! Preamble of the compressed data
//!
//! The header lets the decoder rebuild the same tree the encoder used:
//!
//! * original length (u32 big endian)
//! * number of table entries (u32 big endian)
//! * for each entry, the symbol (1 byte) then its count (u32 big endian)
//!
//! Only symbols with nonzero count are listed, in ascending order.

use std::io::{Read,Write,ErrorKind};
use crate::tools::freq_table::FreqTable;
use crate::Error;

/// Decoded preamble
#[derive(Clone,PartialEq,Eq,Debug)]
pub struct Header {
    /// number of bytes in the expanded data
    pub original_length: u32,
    /// occurrence count of each symbol
    pub freq: FreqTable
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32,Error> {
    let mut buf: [u8;4] = [0;4];
    read_or_format_err(reader,&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_or_format_err<R: Read>(reader: &mut R,buf: &mut [u8]) -> Result<(),Error> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind()==ErrorKind::UnexpectedEof => Err(Error::HeaderFormat),
        Err(e) => Err(Error::Io(e))
    }
}

impl Header {
    /// Header for `dat`, fails if the length does not fit the 32 bit field
    pub fn from_bytes(dat: &[u8]) -> Result<Self,Error> {
        let original_length = u32::try_from(dat.len()).map_err(|_| Error::FileTooLarge)?;
        Ok(Self {
            original_length,
            freq: FreqTable::from_bytes(dat)
        })
    }
    /// number of bytes `write` will produce
    pub fn encoded_len(&self) -> usize {
        8 + 5*self.freq.distinct()
    }
    pub fn write<W: Write>(&self,writer: &mut W) -> Result<(),std::io::Error> {
        writer.write_all(&self.original_length.to_be_bytes())?;
        writer.write_all(&(self.freq.distinct() as u32).to_be_bytes())?;
        for (symbol,count) in self.freq.iter_present() {
            writer.write_all(&[symbol])?;
            writer.write_all(&count.to_be_bytes())?;
        }
        Ok(())
    }
    /// Read the header, leaving `reader` at the start of the payload.
    /// The table has to be consistent with the length, i.e., no symbol listed twice,
    /// no zero counts, and counts summing to the original length.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self,Error> {
        let original_length = read_u32(reader)?;
        let table_size = read_u32(reader)?;
        if table_size > 256 {
            return Err(Error::HeaderFormat);
        }
        let mut freq = FreqTable::new();
        for _i in 0..table_size {
            let mut symbol: [u8;1] = [0];
            read_or_format_err(reader,&mut symbol)?;
            let count = read_u32(reader)?;
            if count == 0 || freq.get(symbol[0]) > 0 {
                return Err(Error::HeaderFormat);
            }
            freq.set(symbol[0],count);
        }
        if freq.total() != original_length as u64 {
            return Err(Error::HeaderFormat);
        }
        Ok(Self {
            original_length,
            freq
        })
    }
}

#[test]
fn header_bytes() {
    let header = Header::from_bytes("aaaab".as_bytes()).expect("header failed");
    let mut buf = Vec::new();
    header.write(&mut buf).expect("write failed");
    assert_eq!(buf,hex::decode("00000005 00000002 6100000004 6200000001".replace(" ","")).unwrap());
    assert_eq!(header.encoded_len(),buf.len());
}

#[test]
fn header_invertibility() {
    let dat: Vec<u8> = (0..3000u32).map(|i| (i % 256) as u8 ^ (i / 7) as u8).collect();
    let header = Header::from_bytes(&dat).expect("header failed");
    let mut buf = Vec::new();
    header.write(&mut buf).expect("write failed");
    let mut cursor = std::io::Cursor::new(buf);
    assert_eq!(Header::read(&mut cursor).expect("read failed"),header);
    assert_eq!(cursor.position(),header.encoded_len() as u64);
}

#[test]
fn empty_header() {
    let header = Header::from_bytes(&[]).expect("header failed");
    let mut buf = Vec::new();
    header.write(&mut buf).expect("write failed");
    assert_eq!(buf,vec![0;8]);
    assert_eq!(Header::read(&mut &buf[..]).expect("read failed"),header);
}

#[test]
fn truncated_header() {
    let full = hex::decode("000000050000000261000000046200000001").unwrap();
    for end in 0..full.len() {
        let res = Header::read(&mut &full[0..end]);
        assert!(matches!(res,Err(Error::HeaderFormat)),"accepted header cut at {}",end);
    }
}

#[test]
fn inconsistent_header() {
    // counts sum to 4, length says 5
    let bad_sum = hex::decode("000000050000000261000000036200000001").unwrap();
    assert!(matches!(Header::read(&mut &bad_sum[..]),Err(Error::HeaderFormat)));
    // symbol listed twice
    let dup = hex::decode("000000050000000261000000046100000001").unwrap();
    assert!(matches!(Header::read(&mut &dup[..]),Err(Error::HeaderFormat)));
    // zero count
    let zero = hex::decode("000000050000000261000000056200000000").unwrap();
    assert!(matches!(Header::read(&mut &zero[..]),Err(Error::HeaderFormat)));
    // table larger than the symbol space
    let big = hex::decode("0000000500000101").unwrap();
    assert!(matches!(Header::read(&mut &big[..]),Err(Error::HeaderFormat)));
}
