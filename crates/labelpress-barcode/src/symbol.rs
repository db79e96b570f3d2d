// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Symbol codes and encoded sequences.

use std::fmt;

use labelpress_core::error::{LabelError, Result};

/// One Code 128 symbol value in `0..=106`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolCode(u8);

impl SymbolCode {
    /// Highest valid symbol value.
    pub const MAX: u8 = 106;

    /// Shift marker preceding a trailing single digit.
    pub const SHIFT_TAIL: Self = Self(100);
    /// Lead code of a single-digit identifier.
    pub const SHIFT_SINGLE: Self = Self(104);
    /// Lead code of a multi-digit identifier.
    pub const START: Self = Self(105);
    pub const STOP: Self = Self(106);

    /// Modulus of the weighted checksum.
    pub const CHECKSUM_MODULUS: u32 = 103;

    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(LabelError::Encoding(format!(
                "symbol code {value} outside 0..={}",
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    /// Caller guarantees `value <= 106`.
    pub(crate) const fn from_raw(value: u8) -> Self {
        debug_assert!(value <= Self::MAX);
        Self(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weighted mod-103 checksum over `lead, data...`.
///
/// The lead code has weight 1, each following code its 1-based position.
pub fn checksum(codes: &[SymbolCode]) -> SymbolCode {
    let sum: u32 = codes
        .iter()
        .enumerate()
        .map(|(pos, code)| u32::from(code.value()) * (pos as u32).max(1))
        .sum();
    SymbolCode::from_raw((sum % SymbolCode::CHECKSUM_MODULUS) as u8)
}

/// `[lead, data..., checksum, STOP]` as produced by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSequence {
    codes: Vec<SymbolCode>,
}

impl EncodedSequence {
    /// Append the checksum and stop code to `lead, data...`.
    pub(crate) fn terminate(mut codes: Vec<SymbolCode>) -> Self {
        let check = checksum(&codes);
        codes.push(check);
        codes.push(SymbolCode::STOP);
        Self { codes }
    }

    /// Every code, lead through stop.
    pub fn codes(&self) -> &[SymbolCode] {
        &self.codes
    }

    pub fn values(&self) -> Vec<u8> {
        self.codes.iter().map(|code| code.value()).collect()
    }

    pub fn lead(&self) -> SymbolCode {
        self.codes[0]
    }

    /// Codes between the lead and the checksum.
    pub fn data(&self) -> &[SymbolCode] {
        &self.codes[1..self.codes.len() - 2]
    }

    pub fn checksum(&self) -> SymbolCode {
        self.codes[self.codes.len() - 2]
    }

    /// Recompute the checksum over lead and data and compare.
    pub fn checksum_is_valid(&self) -> bool {
        checksum(&self.codes[..self.codes.len() - 2]) == self.checksum()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
