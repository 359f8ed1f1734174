//! Compact textual form of a code tree.
//!
//! A leaf is its byte, or `\` and the byte when the byte is `[`, `]` or `\`.
//! A merged node is `[`, its left child, its right child and `]`.
//! Weights are not part of the form.

use crate::{
    error::{Error, Result},
    huffman::Node,
};

const OPEN: u8 = b'[';
const CLOSE: u8 = b']';
const ESCAPE: u8 = b'\\';

/// no tree over 256 symbols is deeper than this
pub const MAX_DEPTH: usize = 256;

fn needs_escape(symbol: u8) -> bool {
    matches!(symbol, OPEN | CLOSE | ESCAPE)
}

/// serialize a tree into a fresh buffer
pub fn serialize(root: &Node) -> Vec<u8> {
    let mut out = Vec::new();
    serialize_into(root, &mut out);
    out
}

/// append the serialized form of `node` to `out`
pub fn serialize_into(node: &Node, out: &mut Vec<u8>) {
    match node {
        Node::Symbol(symbol) => {
            if needs_escape(*symbol) {
                out.push(ESCAPE);
            }
            out.push(*symbol);
        }
        Node::Merged { left, right } => {
            out.push(OPEN);
            serialize_into(left, out);
            serialize_into(right, out);
            out.push(CLOSE);
        }
    }
}

/// rebuild a tree from its serialized form, which must be exactly one node
pub fn deserialize(bytes: &[u8]) -> Result<Node> {
    parse_node(bytes, 0, 0)
}

/// `offset` is where `bytes` starts inside the whole tree string
fn parse_node(bytes: &[u8], offset: usize, depth: usize) -> Result<Node> {
    match bytes {
        [] => Err(Error::malformed(offset, "empty token")),
        [symbol] => Ok(Node::Symbol(*symbol)),
        [ESCAPE, symbol] => Ok(Node::Symbol(*symbol)),
        [OPEN, inner @ .., CLOSE] => {
            if depth >= MAX_DEPTH {
                return Err(Error::malformed(offset, "tree nested too deep"));
            }
            let inner_offset = offset + 1;
            let left_end = token_end(inner, 0, inner_offset)?;
            if left_end == inner.len() {
                return Err(Error::malformed(offset, "merged node has one child"));
            }
            let right_end = token_end(inner, left_end, inner_offset)?;
            if right_end != inner.len() {
                return Err(Error::malformed(
                    inner_offset + right_end,
                    "merged node has more than two children",
                ));
            }
            let left = parse_node(&inner[..left_end], inner_offset, depth + 1)?;
            let right = parse_node(&inner[left_end..], inner_offset + left_end, depth + 1)?;
            Ok(Node::merged(left, right))
        }
        [OPEN, ..] => Err(Error::malformed(offset + bytes.len(), "unclosed bracket")),
        _ => Err(Error::malformed(offset, "expected a single leaf or a bracketed node")),
    }
}

/// find where the top-level token starting at `start` ends
///
/// Brackets are counted to find the matching `]`; the byte after `\` is
/// never read as a bracket.
fn token_end(bytes: &[u8], start: usize, offset: usize) -> Result<usize> {
    match bytes.get(start) {
        None => Err(Error::malformed(offset + start, "missing child")),
        Some(&ESCAPE) => {
            if start + 1 < bytes.len() {
                Ok(start + 2)
            } else {
                Err(Error::malformed(offset + start, "truncated escape"))
            }
        }
        Some(&CLOSE) => Err(Error::malformed(offset + start, "unbalanced closing bracket")),
        Some(&OPEN) => {
            let mut nesting = 0usize;
            let mut i = start;
            while i < bytes.len() {
                match bytes[i] {
                    ESCAPE => {
                        if i + 1 >= bytes.len() {
                            return Err(Error::malformed(offset + i, "truncated escape"));
                        }
                        i += 1;
                    }
                    OPEN => nesting += 1,
                    CLOSE => {
                        nesting -= 1;
                        if nesting == 0 {
                            return Ok(i + 1);
                        }
                    }
                    _ => (),
                }
                i += 1;
            }
            Err(Error::malformed(offset + start, "unclosed bracket"))
        }
        Some(_) => Ok(start + 1),
    }
}
