use std::{fmt, str};

use bitvec::prelude::*;

use crate::error::Error;

/// the bit string assigned to a symbol, first bit is the edge taken at the root
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: BitVec<u8, Msb0>,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    /// this code extended by one more edge
    pub fn with(&self, bit: bool) -> Self {
        let mut bits = self.bits.clone();
        bits.push(bit);
        Code { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    /// true when every bit of `self` starts `other`
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len() <= other.len() && self.bits().zip(other.bits()).all(|(a, b)| a == b)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        for bit in self.bits() {
            write!(f, "{}", if bit { 1 } else { 0 })?;
        }
        Ok(())
    }
}

impl str::FromStr for Code {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = BitVec::with_capacity(s.len());
        for (position, value) in s.chars().enumerate() {
            match value {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => return Err(Error::UnexpectedBitValue { position, value }),
            }
        }
        Ok(Code { bits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_binary_text() {
        let code: Code = "0110".parse().unwrap();
        assert_eq!(code.len(), 4);
        assert_eq!(code.bits().collect::<Vec<_>>(), vec![false, true, true, false]);
        assert_eq!(code.to_string(), "0110");
    }

    #[test]
    fn empty_text_is_the_empty_code() {
        let code: Code = "".parse().unwrap();
        assert!(code.is_empty());
        assert_eq!(code, Code::new());
    }

    #[test]
    fn rejects_non_binary_text() {
        match "01x1".parse::<Code>() {
            Err(Error::UnexpectedBitValue { position, value }) => {
                assert_eq!(position, 2);
                assert_eq!(value, 'x');
            }
            other => panic!("expected UnexpectedBitValue, got {:?}", other),
        }
    }

    #[test]
    fn extends_without_touching_the_original() {
        let root = Code::new();
        let left = root.with(false);
        let left_right = left.with(true);
        assert!(root.is_empty());
        assert_eq!(left.to_string(), "0");
        assert_eq!(left_right.to_string(), "01");
    }

    #[test]
    fn prefix_relation() {
        let short: Code = "01".parse().unwrap();
        let long: Code = "0110".parse().unwrap();
        let other: Code = "11".parse().unwrap();
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert!(!other.is_prefix_of(&long));
        assert!(Code::new().is_prefix_of(&short));
    }
}
