// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Code 128 module pattern table.
//
// Each symbol code maps to a run of alternating bar/space widths, starting
// with a bar, measured in modules. Regular codes span 11 modules over six
// runs; STOP spans 13 modules over seven runs. The table is checked at
// compile time, so a malformed entry fails the build instead of producing an
// unreadable label.

use crate::symbol::SymbolCode;

/// Number of entries, codes `0..=106`.
pub const CODE_COUNT: usize = 107;

const STOP_INDEX: usize = 106;

const PATTERNS: [&str; CODE_COUNT] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", // 0
    "132212", "221213", "221312", "231212", "112232", "122132", "122231", "113222", // 8
    "123122", "123221", "223211", "221132", "221231", "213212", "223112", "312131", // 16
    "311222", "321122", "321221", "312212", "322112", "322211", "212123", "212321", // 24
    "232121", "111323", "131123", "131321", "112313", "132113", "132311", "211313", // 32
    "231113", "231311", "112133", "112331", "132131", "113123", "113321", "133121", // 40
    "313121", "211331", "231131", "213113", "213311", "213131", "311123", "311321", // 48
    "331121", "312113", "312311", "332111", "314111", "221411", "431111", "111224", // 56
    "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114", // 64
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", // 72
    "111242", "121142", "121241", "114212", "124112", "124211", "411212", "421112", // 80
    "421211", "212141", "214121", "412121", "111143", "111341", "131141", "114113", // 88
    "114311", "411113", "411311", "113141", "114131", "311141", "411131", "211412", // 96
    "211214", "211232", "2331112", // 104
];

const fn pattern_is_well_formed(index: usize, pattern: &str) -> bool {
    let digits = pattern.as_bytes();
    let (runs, modules, widest) = if index == STOP_INDEX {
        (7, 13, b'7')
    } else {
        (6, 11, b'4')
    };
    if digits.len() != runs {
        return false;
    }
    let mut total = 0;
    let mut i = 0;
    while i < digits.len() {
        let d = digits[i];
        if d < b'1' || d > widest {
            return false;
        }
        total += (d - b'0') as u32;
        i += 1;
    }
    total == modules
}

const fn table_is_well_formed(table: &[&str; CODE_COUNT]) -> bool {
    let mut index = 0;
    while index < CODE_COUNT {
        if !pattern_is_well_formed(index, table[index]) {
            return false;
        }
        index += 1;
    }
    true
}

const _: () = assert!(
    table_is_well_formed(&PATTERNS),
    "Code 128 pattern table is malformed"
);

static TABLE: ModulePatternTable = ModulePatternTable::new();

/// Bar/space widths of one symbol code, e.g. `"212222"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModulePattern(&'static str);

impl ModulePattern {
    /// Pattern as its digit string.
    pub fn as_str(self) -> &'static str {
        self.0
    }

    /// Run widths in modules, bar first.
    pub fn widths(self) -> impl Iterator<Item = u32> {
        self.0.bytes().map(|d| u32::from(d - b'0'))
    }

    /// Total width in modules (11, or 13 for STOP).
    pub fn total_modules(&self) -> u32 {
        self.widths().sum()
    }

    /// Modules covered by bars (even-indexed runs).
    pub fn bar_modules(&self) -> u32 {
        self.widths().step_by(2).sum()
    }

    /// Number of bars (even-indexed runs).
    pub fn bar_count(&self) -> usize {
        self.0.len().div_ceil(2)
    }
}

/// Immutable lookup from symbol code to module pattern.
#[derive(Debug)]
pub struct ModulePatternTable {
    patterns: [ModulePattern; CODE_COUNT],
}

impl ModulePatternTable {
    const fn new() -> Self {
        let mut patterns = [ModulePattern(""); CODE_COUNT];
        let mut index = 0;
        while index < CODE_COUNT {
            patterns[index] = ModulePattern(PATTERNS[index]);
            index += 1;
        }
        Self { patterns }
    }

    /// The process-wide table.
    pub fn global() -> &'static Self {
        &TABLE
    }

    pub fn pattern(&self, code: SymbolCode) -> ModulePattern {
        self.patterns[code.index()]
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
