// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Symbol encoder — digit string to checksum-terminated Code 128 sequence.
//
// Multi-digit identifiers are packed two digits per symbol after START (105).
// An odd trailing digit is emitted as shift marker 100 followed by the digit's
// character value minus 32. A single-digit identifier is `[104, digit - 32]`.
// Output must stay compatible with labels already printed; do not normalise it
// to canonical Code 128 subset switching.

use labelpress_core::TrackingIdentifier;
use labelpress_core::error::Result;
use tracing::{debug, instrument};

use crate::symbol::{EncodedSequence, SymbolCode};

/// Turns tracking identifiers into encoded symbol sequences.
pub struct SymbolEncoder;

impl SymbolEncoder {
    /// Encode an already validated identifier. Pure; identical input always
    /// yields an identical sequence.
    #[instrument(skip_all, fields(identifier = %identifier))]
    pub fn encode(identifier: &TrackingIdentifier) -> EncodedSequence {
        let digits = identifier.as_str().as_bytes();

        let mut codes = Vec::with_capacity(digits.len() / 2 + 4);
        if let [single] = digits {
            codes.push(SymbolCode::SHIFT_SINGLE);
            codes.push(character_code(*single));
        } else {
            codes.push(SymbolCode::START);
            let mut pairs = digits.chunks_exact(2);
            for pair in pairs.by_ref() {
                let value = (pair[0] - b'0') * 10 + (pair[1] - b'0');
                codes.push(SymbolCode::from_raw(value));
            }
            if let [last] = pairs.remainder() {
                codes.push(SymbolCode::SHIFT_TAIL);
                codes.push(character_code(*last));
            }
        }

        let sequence = EncodedSequence::terminate(codes);
        debug!(
            symbols = sequence.len(),
            checksum = sequence.checksum().value(),
            "Identifier encoded"
        );
        sequence
    }

    /// Validate `raw` and encode it. Fails with `InvalidInput` for an empty
    /// string or any non-digit character.
    pub fn encode_str(raw: &str) -> Result<EncodedSequence> {
        let identifier = TrackingIdentifier::parse(raw)?;
        Ok(Self::encode(&identifier))
    }
}

/// Character value minus 32, i.e. `'0'` -> 16 ... `'9'` -> 25.
fn character_code(digit: u8) -> SymbolCode {
    SymbolCode::from_raw(digit - 32)
}
