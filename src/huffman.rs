use std::{
    collections::{BTreeMap, VecDeque},
    fmt::Write,
};

use crate::{
    code::Code,
    error::{Error, Result},
    util,
};

/// one node of a finished code tree
///
/// Every `Merged` node owns exactly two children, so a tree with `n` symbols
/// always has `n - 1` merged nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Symbol(u8),
    Merged { left: Box<Node>, right: Box<Node> },
}

impl Node {
    pub fn merged(left: Node, right: Node) -> Self {
        Node::Merged {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Symbol(_))
    }

    /// length of the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        match self {
            Node::Symbol(_) => 0,
            Node::Merged { left, right } => 1 + left.depth().max(right.depth()),
        }
    }

    /// number of leaves below and including this node
    pub fn leaves(&self) -> usize {
        match self {
            Node::Symbol(_) => 1,
            Node::Merged { left, right } => left.leaves() + right.leaves(),
        }
    }
}

/// represents the Huffman coding for bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree(Node);

impl Tree {
    /// creates a Huffman tree from a map of symbol to its occurrence.
    /// returns None at empty input
    ///
    /// The two rarest nodes are merged on every round, the first one taken
    /// becomes the left child. Ties go to the leaf with the smaller symbol,
    /// and a leaf wins over a merged node of the same weight.
    pub fn new(symbols_and_their_occurrence: BTreeMap<u8, usize>) -> Option<Self> {
        // the map is ordered by symbol and the sort is stable,
        // so equal weights keep ascending symbol order
        let mut leaves = symbols_and_their_occurrence
            .into_iter()
            .map(|(symbol, occurrence)| Root::new(occurrence, symbol))
            .collect::<Vec<Root>>();
        leaves.sort_by_key(|root| root.occurrence);
        // merged weights never decrease, so the second queue stays sorted too
        let mut leaves: VecDeque<Root> = leaves.into();
        let mut branches: VecDeque<Root> = VecDeque::new();
        loop {
            match (
                Root::pop_rarer(&mut leaves, &mut branches),
                Root::pop_rarer(&mut leaves, &mut branches),
            ) {
                (Some(node0), Some(node1)) => {
                    branches.push_back(Root::merge(node0, node1));
                }
                (Some(node), None) | (None, Some(node)) => {
                    return Some(Tree(node.inner));
                }
                (None, None) => return None,
            }
        }
    }

    /// count occurrence of each byte in `data` and construct the Huffman tree
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let frequencies = util::byte_frequencies(data)?;
        log::trace!("byte frequencies: {:?}", frequencies);
        Self::new(frequencies).ok_or(Error::EmptyInput)
    }

    pub fn root(&self) -> &Node {
        &self.0
    }

    /// assign every leaf its root-to-leaf path, `0` for left and `1` for right
    pub fn code_table(&self) -> CodeTable {
        fn recur(code: Code, current: &Node, table: &mut CodeTable) {
            match current {
                Node::Symbol(symbol) => table.insert(*symbol, code),
                Node::Merged { left, right } => {
                    recur(code.with(false), left, table);
                    recur(code.with(true), right, table);
                }
            }
        }
        let mut table = CodeTable::default();
        recur(Code::new(), &self.0, &mut table);
        table
    }

    /// format the tree as lines of byte value and code, separated by a tab
    /// Leaves are listed depth-first, left before right.
    /// A lone root leaf has the empty code, printed as `-`.
    pub fn format_codebook(&self) -> String {
        fn recur(code: Code, current: &Node, out: &mut Vec<String>) {
            match current {
                Node::Symbol(symbol) if code.is_empty() => out.push(format!("{}\t-", symbol)),
                Node::Symbol(symbol) => out.push(format!("{}\t{}", symbol, code)),
                Node::Merged { left, right } => {
                    recur(code.with(false), left, out);
                    recur(code.with(true), right, out);
                }
            }
        }
        let mut lines = Vec::new();
        recur(Code::new(), &self.0, &mut lines);
        lines.join("\n")
    }
}

/// a subtree waiting to be merged, with the occurrence it stands for
#[derive(Debug)]
struct Root {
    /// occurrence of the symbol in given sequence, or a sum of children
    occurrence: usize,

    inner: Node,
}

impl Root {
    fn new(occurrence: usize, symbol: u8) -> Self {
        Root {
            occurrence,
            inner: Node::Symbol(symbol),
        }
    }

    /// merge two roots, combining their occurrences
    fn merge(left: Self, right: Self) -> Self {
        Root {
            occurrence: left.occurrence + right.occurrence,
            inner: Node::merged(left.inner, right.inner),
        }
    }

    /// pop the rarer element at the front of two queues
    fn pop_rarer(queue0: &mut VecDeque<Self>, queue1: &mut VecDeque<Self>) -> Option<Self> {
        match (queue0.front(), queue1.front()) {
            (Some(node0), Some(node1)) => {
                if node0.occurrence <= node1.occurrence {
                    queue0.pop_front()
                } else {
                    queue1.pop_front()
                }
            }
            (Some(_), None) => queue0.pop_front(),
            (_, _) => queue1.pop_front(),
        }
    }
}

/// symbol to code mapping, read-only once built
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl Default for CodeTable {
    fn default() -> Self {
        CodeTable {
            codes: vec![None; 256],
        }
    }
}

impl CodeTable {
    fn insert(&mut self, symbol: u8, code: Code) {
        self.codes[symbol as usize] = Some(code);
    }

    pub fn get(&self, symbol: u8) -> Result<&Code> {
        self.codes[symbol as usize]
            .as_ref()
            .ok_or(Error::MissingCode(symbol))
    }

    /// present symbols with their codes, in symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|code| (symbol as u8, code)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// total bits needed to encode `data` with this table
    pub fn encoded_bits(&self, data: &[u8]) -> Result<u64> {
        let mut total = 0u64;
        for &symbol in data {
            total += self.get(symbol)?.len() as u64;
        }
        Ok(total)
    }
}

impl std::fmt::Display for CodeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut separator = false;
        for (symbol, code) in self.iter() {
            if separator {
                f.write_char('\n')?;
            }
            separator = true;
            write!(f, "{}\t{}", symbol, code)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cmp::Reverse, collections::BinaryHeap};

    fn leaf(symbol: u8) -> Node {
        Node::Symbol(symbol)
    }

    fn codes(tree: &Tree) -> Vec<(u8, String)> {
        tree.code_table()
            .iter()
            .map(|(symbol, code)| (symbol, code.to_string()))
            .collect()
    }

    /// cost of an optimal code computed by merging bare weights
    fn optimal_cost(weights: &[usize]) -> usize {
        let mut heap: BinaryHeap<Reverse<usize>> = weights.iter().map(|&w| Reverse(w)).collect();
        let mut cost = 0;
        while heap.len() > 1 {
            let Reverse(a) = heap.pop().unwrap();
            let Reverse(b) = heap.pop().unwrap();
            cost += a + b;
            heap.push(Reverse(a + b));
        }
        cost
    }

    fn pseudo_random_bytes(seed: u64, len: usize, alphabet: u8) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                // skew towards small symbols so weights differ
                let r = (state >> 33) as u32 % (alphabet as u32 * alphabet as u32);
                ((r as f64).sqrt() as u32) as u8
            })
            .collect()
    }

    #[test]
    fn merges_the_two_rarest_first() {
        let tree = Tree::from_bytes(b"AAAAABBBCC").unwrap();
        // C(2) and B(3) merge first, A(5) then wins the tie against their node
        assert_eq!(tree.root(), &Node::merged(leaf(b'A'), Node::merged(leaf(b'C'), leaf(b'B'))));
        assert_eq!(
            codes(&tree),
            vec![
                (b'A', String::from("0")),
                (b'B', String::from("11")),
                (b'C', String::from("10"))
            ]
        );
    }

    #[test]
    fn single_symbol_is_a_lone_leaf() {
        let tree = Tree::from_bytes(&[0x41; 1000]).unwrap();
        assert_eq!(tree.root(), &leaf(0x41));
        let table = tree.code_table();
        assert_eq!(table.len(), 1);
        assert!(table.get(0x41).unwrap().is_empty());
    }

    #[test]
    fn empty_input_builds_no_tree() {
        assert!(Tree::new(BTreeMap::new()).is_none());
        assert!(matches!(Tree::from_bytes(b""), Err(Error::EmptyInput)));
    }

    #[test]
    fn equal_weights_are_deterministic() {
        let a = Tree::from_bytes(b"abcdabcd").unwrap();
        let b = Tree::from_bytes(b"dcbadcba").unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.root(),
            &Node::merged(
                Node::merged(leaf(b'a'), leaf(b'b')),
                Node::merged(leaf(b'c'), leaf(b'd'))
            )
        );
    }

    #[test]
    fn every_node_has_zero_or_two_children() {
        let data = pseudo_random_bytes(7, 4096, 200);
        let tree = Tree::from_bytes(&data).unwrap();
        let distinct = util::byte_frequencies(&data).unwrap().len();
        assert_eq!(tree.root().leaves(), distinct);
        assert_eq!(tree.code_table().len(), distinct);
    }

    #[test]
    fn codes_are_prefix_free() {
        for seed in 0..16 {
            let data = pseudo_random_bytes(seed, 2048, 64);
            let table = Tree::from_bytes(&data).unwrap().code_table();
            let all: Vec<&Code> = table.iter().map(|(_, code)| code).collect();
            for (i, a) in all.iter().enumerate() {
                for (j, b) in all.iter().enumerate() {
                    if i != j {
                        assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                    }
                }
            }
        }
    }

    #[test]
    fn codes_are_optimal() {
        for seed in 0..16 {
            let data = pseudo_random_bytes(seed, 3000, 40);
            let frequencies = util::byte_frequencies(&data).unwrap();
            let table = Tree::new(frequencies.clone()).unwrap().code_table();
            let cost: usize = frequencies
                .iter()
                .map(|(&symbol, &count)| table.get(symbol).unwrap().len() * count)
                .sum();
            let weights: Vec<usize> = frequencies.values().copied().collect();
            assert_eq!(cost, optimal_cost(&weights));
            assert_eq!(table.encoded_bits(&data).unwrap(), cost as u64);
        }
    }

    #[test]
    fn skewed_weights_stay_optimal() {
        // weights that punish a branch queue kept out of order
        let frequencies: BTreeMap<u8, usize> =
            vec![(0, 1), (1, 1), (2, 2), (3, 2), (4, 3), (5, 3), (6, 4)].into_iter().collect();
        let table = Tree::new(frequencies.clone()).unwrap().code_table();
        let cost: usize = frequencies
            .iter()
            .map(|(&symbol, &count)| table.get(symbol).unwrap().len() * count)
            .sum();
        let weights: Vec<usize> = frequencies.values().copied().collect();
        assert_eq!(cost, optimal_cost(&weights));
    }

    #[test]
    fn code_length_bounded_by_depth() {
        // fibonacci weights give the deepest possible tree
        let fib = [1usize, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        let frequencies: BTreeMap<u8, usize> =
            fib.iter().enumerate().map(|(i, &w)| (i as u8, w)).collect();
        let tree = Tree::new(frequencies).unwrap();
        assert_eq!(tree.root().depth(), fib.len() - 1);
        assert!(tree.code_table().iter().all(|(_, code)| code.len() <= tree.root().depth()));
    }

    #[test]
    fn absent_symbol_has_no_code() {
        let table = Tree::from_bytes(b"ab").unwrap().code_table();
        assert!(matches!(table.get(b'z'), Err(Error::MissingCode(b'z'))));
    }

    #[test]
    fn codebook_lists_leaves_depth_first() {
        let tree = Tree::from_bytes(b"AAAAABBBCC").unwrap();
        assert_eq!(tree.format_codebook(), "65\t0\n67\t10\n66\t11");
        assert_eq!(tree.code_table().to_string(), "65\t0\n66\t11\n67\t10");
        let lone = Tree::from_bytes(b"zzz").unwrap();
        assert_eq!(lone.format_codebook(), "122\t-");
    }
}
