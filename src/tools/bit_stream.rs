//! Bit level access to byte streams.
//! Bits are always taken MSB first within each byte.

use bit_vec::BitVec;
use std::io::{Read,Write,ErrorKind};

/// Pulls bits from a byte source, one byte is read for every 8 bits consumed.
pub struct BitReader<R: Read> {
    reader: R,
    bits: BitVec,
    ptr: usize
}

impl <R: Read> BitReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            bits: BitVec::new(),
            ptr: 0
        }
    }
    /// Get the next bit, reading another byte from the source as needed.
    /// Returns `None` once the source is exhausted.
    pub fn get_bit(&mut self) -> Result<Option<bool>,std::io::Error> {
        if let Some(bit) = self.bits.get(self.ptr) {
            self.ptr += 1;
            return Ok(Some(bit));
        }
        let mut by: [u8;1] = [0];
        match self.reader.read_exact(&mut by) {
            Ok(()) => {
                self.bits = BitVec::from_bytes(&by);
                self.ptr = 1;
                Ok(self.bits.get(0))
            },
            Err(e) if e.kind()==ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e)
        }
    }
    /// release the underlying source
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Packs bits into bytes and pushes each byte to the sink as soon as it is full.
/// A partially filled byte is zero padded and written by `finish`, or by `drop`
/// if `finish` was never reached.
pub struct BitWriter<W: Write> {
    writer: Option<W>,
    bits: BitVec,
    count: u64
}

impl <W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
            bits: BitVec::with_capacity(8),
            count: 0
        }
    }
    fn write_pending(&mut self) -> Result<(),std::io::Error> {
        if self.bits.is_empty() {
            return Ok(());
        }
        if let Some(writer) = self.writer.as_mut() {
            // to_bytes fills the unused low bits with 0
            writer.write_all(&self.bits.to_bytes())?;
            self.count += 1;
        }
        self.bits.truncate(0);
        Ok(())
    }
    pub fn put_bit(&mut self,bit: bool) -> Result<(),std::io::Error> {
        self.bits.push(bit);
        if self.bits.len() == 8 {
            self.write_pending()?;
        }
        Ok(())
    }
    /// output every bit of `code` in order
    pub fn put_code(&mut self,code: &BitVec) -> Result<(),std::io::Error> {
        for bit in code.iter() {
            self.put_bit(bit)?;
        }
        Ok(())
    }
    /// number of bytes handed to the sink so far
    pub fn bytes_written(&self) -> u64 {
        self.count
    }
    /// Write the padded trailing byte, flush, and hand back the sink.
    pub fn finish(mut self) -> Result<W,std::io::Error> {
        self.write_pending()?;
        let mut writer = match self.writer.take() {
            Some(w) => w,
            None => return Err(std::io::Error::new(ErrorKind::Other,"bit writer already released"))
        };
        writer.flush()?;
        Ok(writer)
    }
}

impl <W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if self.writer.is_some() {
            let _ = self.write_pending();
            if let Some(writer) = self.writer.as_mut() {
                let _ = writer.flush();
            }
        }
    }
}

#[test]
fn msb_first() {
    let mut reader = BitReader::new(&[0b1010_0001u8,0x80][..]);
    let mut got = Vec::new();
    while let Some(bit) = reader.get_bit().expect("read failed") {
        got.push(bit as u8);
    }
    assert_eq!(got,vec![1,0,1,0,0,0,0,1,1,0,0,0,0,0,0,0]);
    assert_eq!(reader.get_bit().expect("read failed"),None);
}

#[test]
fn empty_source() {
    let mut reader = BitReader::new(&[0u8;0][..]);
    assert_eq!(reader.get_bit().expect("read failed"),None);
}

#[test]
fn padding_on_finish() {
    let mut writer = BitWriter::new(Vec::new());
    for bit in [true,true,true,true,false] {
        writer.put_bit(bit).expect("write failed");
    }
    assert_eq!(writer.bytes_written(),0);
    let out = writer.finish().expect("finish failed");
    assert_eq!(out,vec![0xf0]);
}

#[test]
fn full_bytes_written_eagerly() {
    let mut out = Vec::new();
    {
        let mut writer = BitWriter::new(&mut out);
        writer.put_code(&BitVec::from_bytes(&[0xa5,0x3c])).expect("write failed");
        assert_eq!(writer.bytes_written(),2);
        writer.finish().expect("finish failed");
    }
    assert_eq!(out,vec![0xa5,0x3c]);
}

#[test]
fn nothing_written_when_aligned() {
    let out = BitWriter::new(Vec::new()).finish().expect("finish failed");
    assert!(out.is_empty());
}

#[test]
fn drop_flushes_partial_byte() {
    let mut out = Vec::new();
    {
        let mut writer = BitWriter::new(&mut out);
        writer.put_bit(true).expect("write failed");
    }
    assert_eq!(out,vec![0x80]);
}
