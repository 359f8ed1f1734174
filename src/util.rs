use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// count occurrences of each symbol, ordered by symbol
pub fn count_occurrences<I, T>(symbols: I) -> BTreeMap<T, usize>
where
    I: IntoIterator<Item = T>,
    T: Ord,
{
    let mut occurrences: BTreeMap<T, usize> = BTreeMap::new();
    for symbol in symbols {
        *occurrences.entry(symbol).or_insert(0) += 1;
    }
    occurrences
}

/// byte frequencies of `data`, only for bytes that occur at least once
pub fn byte_frequencies(data: &[u8]) -> Result<BTreeMap<u8, usize>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(count_occurrences(data.iter().copied()))
}
