use std::{convert::TryFrom, fmt};

use crate::{
    bits::{BitPacker, BitUnpacker},
    container::{self, Container},
    error::{Error, Result},
    huffman::{Node, Tree},
    serial,
};

/// steps of one encode or decode call, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scanning,
    BuildingTree,
    GeneratingCodes,
    SerializingTree,
    WritingHeader,
    PackingBits,
    ReadingHeader,
    DeserializingTree,
    WalkingBits,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Stage::Scanning => "scanning",
            Stage::BuildingTree => "building tree",
            Stage::GeneratingCodes => "generating codes",
            Stage::SerializingTree => "serializing tree",
            Stage::WritingHeader => "writing header",
            Stage::PackingBits => "packing bits",
            Stage::ReadingHeader => "reading header",
            Stage::DeserializingTree => "deserializing tree",
            Stage::WalkingBits => "walking bits",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    log::debug!("{}", stage);
}

/// compress `data` into a self-describing container
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    enter(Stage::Scanning);
    enter(Stage::BuildingTree);
    let tree = Tree::from_bytes(data)?;
    let symbols = tree.root().leaves();

    enter(Stage::GeneratingCodes);
    let table = tree.code_table();
    log::trace!("code table:\n{}", table);

    enter(Stage::SerializingTree);
    let tree_bytes = serial::serialize(tree.root());
    log::debug!(
        "{} symbols, tree depth {}, tree string {} bytes",
        symbols,
        tree.root().depth(),
        tree_bytes.len()
    );

    enter(Stage::WritingHeader);
    let mut header = Vec::with_capacity(16 + tree_bytes.len() + data.len() / 2);
    container::write_header(&mut header, &tree_bytes, data.len() as u64);

    enter(Stage::PackingBits);
    let mut packer = BitPacker::with_prefix(header);
    for &symbol in data {
        packer.push_code(table.get(symbol)?);
    }
    log::debug!("packed {} symbols into {} bits", data.len(), packer.bits_written());
    let out = packer.into_bytes();

    enter(Stage::Done);
    Ok(out)
}

/// restore the original bytes from a container made by `encode`
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>> {
    enter(Stage::ReadingHeader);
    let container = Container::parse(bytes)?;
    log::debug!(
        "tree string {} bytes, {} symbols, {} payload bytes",
        container.tree.len(),
        container.symbol_count,
        container.packed.len()
    );

    enter(Stage::DeserializingTree);
    let root = serial::deserialize(container.tree)?;

    enter(Stage::WalkingBits);
    let out = walk(&root, BitUnpacker::new(container.packed), container.symbol_count)?;

    enter(Stage::Done);
    Ok(out)
}

/// follow the packed bits down the tree until `count` symbols are emitted
///
/// A leaf is emitted before the next bit is read, so a lone root leaf emits
/// `count` symbols without reading any bit. Padding after the last symbol is
/// never read.
fn walk(root: &Node, reader: BitUnpacker, count: u64) -> Result<Vec<u8>> {
    if let Node::Symbol(symbol) = root {
        return repeat(*symbol, count);
    }
    // a merged root spends at least one bit per symbol
    let bound = count.min(reader.len());
    let mut out = Vec::with_capacity(usize::try_from(bound).unwrap_or(0));
    let mut cursor = root;
    let mut position = 0u64;
    while (out.len() as u64) < count {
        match cursor {
            Node::Symbol(symbol) => {
                out.push(*symbol);
                cursor = root;
            }
            Node::Merged { left, right } => {
                let bit = reader
                    .read_bit(position)
                    .ok_or(Error::TruncatedPayload {
                        decoded: out.len() as u64,
                        expected: count,
                    })?;
                position += 1;
                cursor = if bit { right } else { left };
            }
        }
    }
    log::trace!("read {} of {} payload bits", position, reader.len());
    Ok(out)
}

/// the output of a lone leaf tree; `count` comes from the header, so the
/// allocation may fail
fn repeat(symbol: u8, count: u64) -> Result<Vec<u8>> {
    let len = usize::try_from(count).map_err(|_| Error::SymbolCountTooLarge(count))?;
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| Error::SymbolCountTooLarge(count))?;
    out.resize(len, symbol);
    Ok(out)
}
