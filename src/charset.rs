// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Fixed 256-bit byte sets, buildable in `const` context.

use std::fmt;
use std::ops::RangeInclusive;

const WORD_BITS: usize = usize::BITS as usize;
const WORDS: usize = 256 / WORD_BITS;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    bits: [usize; WORDS],
}

impl Charset {
    pub const fn no() -> Self {
        Charset { bits: [0; WORDS] }
    }

    /// Builds a set from a list of bytes, e.g. `Charset::with_bytes(b"+-*/")`.
    pub const fn with_bytes(bytes: &[u8]) -> Self {
        let mut cs = Self::no();
        let mut i = 0;
        while i < bytes.len() {
            cs.insert_range(bytes[i], bytes[i]);
            i += 1;
        }
        cs
    }

    /// Builds a set from inclusive ranges, e.g. `Charset::with_ranges(&[b'a'..=b'z'])`.
    pub const fn with_ranges(ranges: &[RangeInclusive<u8>]) -> Self {
        let mut cs = Self::no();
        let mut i = 0;
        while i < ranges.len() {
            cs.insert_range(*ranges[i].start(), *ranges[i].end());
            i += 1;
        }
        cs
    }

    pub const fn union(mut self, other: &Charset) -> Self {
        let mut i = 0;
        while i < WORDS {
            self.bits[i] |= other.bits[i];
            i += 1;
        }
        self
    }

    #[inline]
    pub const fn contains(&self, b: u8) -> bool {
        let b = b as usize;
        self.bits[b / WORD_BITS] & (1 << (b % WORD_BITS)) != 0
    }

    /// Adds `first..=last`. Bits outside the range are left alone.
    const fn insert_range(&mut self, first: u8, last: u8) {
        let (first, last) = (first as usize, last as usize);
        if first > last {
            return;
        }

        let mut word = first / WORD_BITS;
        while word <= last / WORD_BITS {
            let lo = if word == first / WORD_BITS { first % WORD_BITS } else { 0 };
            let hi = if word == last / WORD_BITS { last % WORD_BITS } else { WORD_BITS - 1 };
            // Bits lo..=hi of this word.
            let mask = (usize::MAX >> (WORD_BITS - 1 - hi)) & (usize::MAX << lo);
            self.bits[word] |= mask;
            word += 1;
        }
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |f: &mut fmt::Formatter<'_>, b: usize| {
            let b = b as u8;
            if b.is_ascii_graphic() { write!(f, "{}", b as char) } else { write!(f, "0x{b:02X}") }
        };

        let mut list = Vec::new();
        let mut beg = 0;
        while beg < 256 {
            if !self.contains(beg as u8) {
                beg += 1;
                continue;
            }
            let mut end = beg + 1;
            while end < 256 && self.contains(end as u8) {
                end += 1;
            }
            list.push((beg, end - 1));
            beg = end;
        }

        write!(f, "[")?;
        for (i, &(first, last)) in list.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            show(f, first)?;
            if last > first {
                write!(f, "-")?;
                show(f, last)?;
            }
        }
        write!(f, "]")
    }
}
