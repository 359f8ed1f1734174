use std::convert::TryFrom;

use bitvec::prelude::*;

use crate::code::Code;

/// packs a sequence of bits into bytes, most significant bit first
#[derive(Debug, Default)]
pub struct BitPacker {
    out: Vec<u8>,
    /// partial byte, filled from the top
    accumulator: u8,
    /// bits held in `accumulator`, 0 to 7 between calls
    pending: u8,
    written: u64,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// appends to the end of existing bytes, e.g. a container header
    pub fn with_prefix(out: Vec<u8>) -> Self {
        BitPacker {
            out,
            ..Self::default()
        }
    }

    pub fn push_bit(&mut self, bit: bool) {
        let mask = 0b1000_0000 >> self.pending;
        if bit {
            self.accumulator |= mask;
        } else {
            self.accumulator &= !mask;
        }
        self.pending += 1;
        self.written += 1;
        if self.pending == 8 {
            self.out.push(self.accumulator);
            self.accumulator = 0;
            self.pending = 0;
        }
    }

    pub fn push_code(&mut self, code: &Code) {
        for bit in code.bits() {
            self.push_bit(bit);
        }
    }

    /// write out the partial byte, zero padded, when `force` is set
    /// does nothing if no bits are pending
    pub fn flush(&mut self, force: bool) {
        if force && self.pending > 0 {
            self.out.push(self.accumulator);
            self.accumulator = 0;
            self.pending = 0;
        }
    }

    /// bits pushed so far, padding excluded
    pub fn bits_written(&self) -> u64 {
        self.written
    }

    /// the packed bytes, partial byte included
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush(true);
        self.out
    }
}

/// reads bits from packed bytes by logical index, most significant bit first
#[derive(Debug, Clone, Copy)]
pub struct BitUnpacker<'a> {
    bits: &'a BitSlice<u8, Msb0>,
}

impl<'a> BitUnpacker<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        BitUnpacker {
            bits: bytes.view_bits::<Msb0>(),
        }
    }

    /// bit `i % 8` of byte `i / 8`, None past the last byte
    pub fn read_bit(&self, i: u64) -> Option<bool> {
        usize::try_from(i)
            .ok()
            .and_then(|i| self.bits.get(i))
            .map(|bit| *bit)
    }

    /// available bits, padding included
    pub fn len(&self) -> u64 {
        self.bits.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}
