//! Module to build the static Huffman tree.
//! The tree is built once from a frequency table and never changes afterward.
//! Encoder and decoder both build it from the same table, so the tie-breaking
//! rule below must stay fixed or old data will no longer expand.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use super::freq_table::FreqTable;

/// Node of the Huffman tree.  Branches own their two sons outright.
#[derive(Debug,Clone,PartialEq,Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        freq: u64
    },
    Branch {
        freq: u64,
        left: Box<Node>,
        right: Box<Node>
    }
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Branch { freq, .. } => *freq
        }
    }
    /// log the structure of the tree at trace level
    pub fn trace(&self,depth: usize) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        let indent = "  ".repeat(depth);
        match self {
            Node::Leaf { symbol, freq } => log::trace!("{}leaf {:02X} freq {}",indent,symbol,freq),
            Node::Branch { freq, left, right } => {
                log::trace!("{}branch freq {}",indent,freq);
                left.trace(depth+1);
                right.trace(depth+1);
            }
        }
    }
}

/// Heap entry, the sequence number makes the ordering total so that
/// equal frequencies always come out in the order they went in.
struct Pending {
    seq: usize,
    node: Node
}

impl PartialEq for Pending {
    fn eq(&self,other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self,other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self,other: &Self) -> Ordering {
        // reversed, BinaryHeap is a max-heap
        other.node.freq().cmp(&self.node.freq()).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Build the tree by repeatedly merging the two least frequent nodes.
/// Leaves go in by ascending symbol, each merged node takes the next sequence number,
/// and the first node extracted becomes the left son.
/// Returns `None` if no symbol has a nonzero count.
/// If only one symbol is present the root is that symbol's leaf.
pub fn build(freq: &FreqTable) -> Option<Node> {
    let mut heap = BinaryHeap::new();
    let mut seq: usize = 0;
    for (symbol,count) in freq.iter_present() {
        heap.push(Pending { seq, node: Node::Leaf { symbol, freq: count as u64 } });
        seq += 1;
    }
    log::debug!("building tree with {} leaves",heap.len());
    while heap.len() > 1 {
        let (left,right) = match (heap.pop(),heap.pop()) {
            (Some(l),Some(r)) => (l.node,r.node),
            _ => return None
        };
        let node = Node::Branch {
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right)
        };
        heap.push(Pending { seq, node });
        seq += 1;
    }
    let root = heap.pop()?.node;
    root.trace(0);
    Some(root)
}

#[cfg(test)]
impl Node {
    /// son on the side selected by `bit`, `None` for a leaf
    fn son(&self,bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Branch { left, right, .. } => match bit {
                false => Some(left),
                true => Some(right)
            }
        }
    }
}

#[cfg(test)]
fn depth_of(node: &Node,symbol: u8,depth: usize) -> Option<usize> {
    match node {
        Node::Leaf { symbol: s, .. } => match *s==symbol {
            true => Some(depth),
            false => None
        },
        Node::Branch { left, right, .. } => depth_of(left,symbol,depth+1).or(depth_of(right,symbol,depth+1))
    }
}

#[test]
fn empty_table() {
    assert_eq!(build(&FreqTable::new()),None);
}

#[test]
fn single_symbol() {
    let root = build(&FreqTable::from_bytes("zzzz".as_bytes())).expect("no tree");
    assert_eq!(root,Node::Leaf { symbol: b'z', freq: 4 });
    assert!(root.son(false).is_none());
}

#[test]
fn two_symbols() {
    let root = build(&FreqTable::from_bytes("aaaab".as_bytes())).expect("no tree");
    assert_eq!(root.freq(),5);
    // the rarer symbol is extracted first and goes left
    assert_eq!(root.son(false),Some(&Node::Leaf { symbol: b'b', freq: 1 }));
    assert_eq!(root.son(true),Some(&Node::Leaf { symbol: b'a', freq: 4 }));
}

#[test]
fn equal_frequencies_use_symbol_order() {
    let root = build(&FreqTable::from_bytes("dcba".as_bytes())).expect("no tree");
    // a+b merge first, then c+d, then the two branches in that order
    let left = root.son(false).expect("missing left");
    let right = root.son(true).expect("missing right");
    assert_eq!(left.son(false),Some(&Node::Leaf { symbol: b'a', freq: 1 }));
    assert_eq!(left.son(true),Some(&Node::Leaf { symbol: b'b', freq: 1 }));
    assert_eq!(right.son(false),Some(&Node::Leaf { symbol: b'c', freq: 1 }));
    assert_eq!(right.son(true),Some(&Node::Leaf { symbol: b'd', freq: 1 }));
}

#[test]
fn rare_symbols_are_deeper() {
    let mut freq = FreqTable::new();
    freq.set(b'e',100);
    freq.set(b't',40);
    freq.set(b'q',2);
    freq.set(b'x',1);
    let root = build(&freq).expect("no tree");
    assert_eq!(root.freq(),143);
    assert_eq!(depth_of(&root,b'e',0),Some(1));
    assert_eq!(depth_of(&root,b't',0),Some(2));
    assert_eq!(depth_of(&root,b'q',0),Some(3));
    assert_eq!(depth_of(&root,b'x',0),Some(3));
}

#[test]
fn identical_tables_give_identical_trees() {
    let dat: Vec<u8> = (0..2000u32).map(|i| ((i*i) % 251) as u8).collect();
    let freq = FreqTable::from_bytes(&dat);
    assert_eq!(build(&freq),build(&freq.clone()));
}
