//! Container layout:
//! `tree_length: u64 | tree bytes | symbol_count: u64 | packed bits`
//!
//! Both integers are little-endian.

use std::convert::TryFrom;

use crate::error::{Error, Result};

const LENGTH_BYTES: usize = 8;

/// the parts of a container, borrowed from its bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container<'a> {
    pub tree: &'a [u8],
    /// number of original bytes, not the size of `packed`
    pub symbol_count: u64,
    pub packed: &'a [u8],
}

/// write the header fields in front of the packed bits
pub fn write_header(out: &mut Vec<u8>, tree: &[u8], symbol_count: u64) {
    out.extend_from_slice(&(tree.len() as u64).to_le_bytes());
    out.extend_from_slice(tree);
    out.extend_from_slice(&symbol_count.to_le_bytes());
}

impl<'a> Container<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let (tree_length, rest) = read_u64(bytes, 0)?;
        let tree_length = usize::try_from(tree_length)
            .ok()
            .filter(|&length| length <= rest.len())
            .ok_or(Error::TruncatedContainer {
                needed: (LENGTH_BYTES as u64).saturating_add(tree_length),
                available: bytes.len() as u64,
            })?;
        let (tree, rest) = rest.split_at(tree_length);
        let (symbol_count, packed) = read_u64(rest, LENGTH_BYTES + tree_length)?;
        Ok(Container {
            tree,
            symbol_count,
            packed,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 * LENGTH_BYTES + self.tree.len() + self.packed.len());
        write_header(&mut out, self.tree, self.symbol_count);
        out.extend_from_slice(self.packed);
        out
    }
}

/// `consumed` is how many bytes of the container precede `bytes`
fn read_u64(bytes: &[u8], consumed: usize) -> Result<(u64, &[u8])> {
    if bytes.len() < LENGTH_BYTES {
        return Err(Error::TruncatedContainer {
            needed: (consumed + LENGTH_BYTES) as u64,
            available: (consumed + bytes.len()) as u64,
        });
    }
    let (head, rest) = bytes.split_at(LENGTH_BYTES);
    let mut value = [0u8; LENGTH_BYTES];
    value.copy_from_slice(head);
    Ok((u64::from_le_bytes(value), rest))
}
