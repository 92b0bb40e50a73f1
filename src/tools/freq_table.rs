//! Byte frequency counting

/// Occurrence count for each of the 256 byte values, indexed by the byte value.
#[derive(Clone,PartialEq,Eq,Debug)]
pub struct FreqTable {
    counts: [u32;256]
}

impl FreqTable {
    pub fn new() -> Self {
        Self {
            counts: [0;256]
        }
    }
    /// Count every byte in `dat`.  Caller is responsible for keeping the
    /// length within 32 bits, counts wrap otherwise.
    pub fn from_bytes(dat: &[u8]) -> Self {
        let mut ans = Self::new();
        for by in dat {
            ans.counts[*by as usize] = ans.counts[*by as usize].wrapping_add(1);
        }
        ans
    }
    pub fn get(&self,symbol: u8) -> u32 {
        self.counts[symbol as usize]
    }
    pub fn set(&mut self,symbol: u8,count: u32) {
        self.counts[symbol as usize] = count;
    }
    /// (symbol,count) pairs with nonzero count, in ascending symbol order
    pub fn iter_present(&self) -> impl Iterator<Item=(u8,u32)> + '_ {
        (0..=255u8).map(|s| (s,self.counts[s as usize])).filter(|(_,c)| *c > 0)
    }
    /// number of distinct symbols present
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|c| **c > 0).count()
    }
    /// sum of all counts, which is the length of the data counted
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| *c as u64).sum()
    }
}

impl Default for FreqTable {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn counting() {
    let freq = FreqTable::from_bytes("I am Sam. Sam I am.".as_bytes());
    assert_eq!(freq.get(b'a'),4);
    assert_eq!(freq.get(b'm'),4);
    assert_eq!(freq.get(b' '),5);
    assert_eq!(freq.get(b'z'),0);
    assert_eq!(freq.distinct(),6);
    assert_eq!(freq.total(),19);
}

#[test]
fn high_bytes_present() {
    let freq = FreqTable::from_bytes(&[0xff,0x00,0xff,0x80]);
    let present: Vec<(u8,u32)> = freq.iter_present().collect();
    assert_eq!(present,vec![(0x00,1),(0x80,1),(0xff,2)]);
}

#[test]
fn empty_input() {
    let freq = FreqTable::from_bytes(&[]);
    assert_eq!(freq.distinct(),0);
    assert_eq!(freq.total(),0);
    assert_eq!(freq,FreqTable::new());
}
