//! Static Huffman compression of whole byte buffers.
//!
//! ```
//! let container = huffpack::encode(b"AAAAABBBCC")?;
//! assert_eq!(huffpack::decode(&container)?, b"AAAAABBBCC");
//! # Ok::<(), huffpack::Error>(())
//! ```

pub mod bits;
pub mod code;
pub mod codec;
pub mod container;
pub mod error;
pub mod huffman;
pub mod io;
pub mod serial;
pub mod util;

pub use codec::{decode, encode};
pub use error::{Error, Result};
pub use huffman::{CodeTable, Node, Tree};
