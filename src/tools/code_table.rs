//! Derive the prefix code for each symbol from the Huffman tree

use bit_vec::BitVec;
use super::huff_tree::Node;

/// Map from symbol to its code, left is 0 and right is 1.
pub struct CodeTable {
    codes: Vec<Option<BitVec>>
}

impl CodeTable {
    /// Walk the tree depth first recording the path to each leaf.
    /// A tree that is a lone leaf gives that symbol an empty code.
    pub fn from_tree(root: &Node) -> Self {
        let mut ans = Self {
            codes: vec![None;256]
        };
        let mut path = BitVec::new();
        ans.traverse(root,&mut path);
        ans
    }
    fn traverse(&mut self,node: &Node,path: &mut BitVec) {
        match node {
            Node::Leaf { symbol, .. } => {
                log::trace!("code for {:02X} has {} bits",symbol,path.len());
                self.codes[*symbol as usize] = Some(path.clone());
            },
            Node::Branch { left, right, .. } => {
                path.push(false);
                self.traverse(left,path);
                path.pop();
                path.push(true);
                self.traverse(right,path);
                path.pop();
            }
        }
    }
    pub fn get(&self,symbol: u8) -> Option<&BitVec> {
        self.codes[symbol as usize].as_ref()
    }
}

#[cfg(test)]
use super::{freq_table::FreqTable,huff_tree};

#[cfg(test)]
fn is_prefix(a: &BitVec,b: &BitVec) -> bool {
    a.len() <= b.len() && a.iter().zip(b.iter()).all(|(x,y)| x==y)
}

#[test]
fn two_symbol_codes() {
    let root = huff_tree::build(&FreqTable::from_bytes("aaaab".as_bytes())).expect("no tree");
    let table = CodeTable::from_tree(&root);
    assert!(table.get(b'b').expect("missing b").eq_vec(&[false]));
    assert!(table.get(b'a').expect("missing a").eq_vec(&[true]));
    assert!(table.get(b'c').is_none());
}

#[test]
fn lone_leaf_has_empty_code() {
    let root = huff_tree::build(&FreqTable::from_bytes(&[7,7,7])).expect("no tree");
    let table = CodeTable::from_tree(&root);
    assert!(table.get(7).expect("missing 7").is_empty());
}

#[test]
fn prefix_free() {
    let dat: Vec<u8> = "It was the best of times, it was the worst of times, it was the age of wisdom".bytes()
        .chain((0..=255u8).step_by(3))
        .collect();
    let freq = FreqTable::from_bytes(&dat);
    let root = huff_tree::build(&freq).expect("no tree");
    let table = CodeTable::from_tree(&root);
    let present: Vec<u8> = freq.iter_present().map(|(s,_)| s).collect();
    for a in &present {
        let code_a = table.get(*a).expect("missing code");
        assert!(!code_a.is_empty());
        for b in &present {
            if a != b {
                let code_b = table.get(*b).expect("missing code");
                assert!(!is_prefix(code_a,code_b),"{:02X} is a prefix of {:02X}",a,b);
            }
        }
    }
}

#[test]
fn kraft_equality() {
    // a full binary tree satisfies sum(2^-len) == 1
    let dat: Vec<u8> = (0..5000u32).map(|i| ((i*7919) % 97) as u8).collect();
    let freq = FreqTable::from_bytes(&dat);
    let root = huff_tree::build(&freq).expect("no tree");
    let table = CodeTable::from_tree(&root);
    let max_len = freq.iter_present().map(|(s,_)| table.get(s).expect("missing code").len()).max().expect("empty");
    let total: u128 = freq.iter_present()
        .map(|(s,_)| 1u128 << (max_len - table.get(s).expect("missing code").len()))
        .sum();
    assert_eq!(total,1u128 << max_len);
}
