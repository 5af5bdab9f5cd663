//! Byte-level recovery for length-prefixed identifiers
//!
//! Sections have no record table, so names are found by trying every byte
//! offset as a u32 length prefix:
//!
//! ```text
//!            prefix in range           ASCII + filter ok
//! Seeking ──────────────────► Candidate ─────────────────► Validated
//!    ▲  └─ else: pos += 1          │ else: pos += 1            │
//!    │                             ▼                           │
//!    └──────────── reject(): pos += 1 / accept(next) ◄─────────┘
//! ```
//!
//! The caller decides what follows a validated name (a count, metadata),
//! then either accepts the record and jumps past it or rejects it and the
//! lexer resumes one byte later.

use std::ops::RangeInclusive;

use super::filter::IdentifierFilter;
use super::utils::{ascii_str, read_u32_le};

/// Accepted length prefix of a record name
pub const NAME_LEN: RangeInclusive<usize> = 3..=100;
/// Scanning stops this many bytes before the span end
pub const SCAN_TAIL: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Looking for a plausible length prefix at `pos`
    Seeking,
    /// Prefix at `pos` is in range; payload not yet checked
    Candidate { len: usize },
    /// Name at `pos + 4 .. name_end` passed the filter
    Validated { name_end: usize },
}

/// A name recovered by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameToken<'a> {
    pub name: &'a str,
    /// Offset of the length prefix
    pub start: usize,
    /// Offset just past the name bytes
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct RecordLexer<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
    filter: IdentifierFilter,
    state: LexState,
}

impl<'a> RecordLexer<'a> {
    pub fn new(data: &'a [u8], start: usize, end: usize, filter: IdentifierFilter) -> Self {
        Self {
            data,
            pos: start,
            end: end.min(data.len()),
            filter,
            state: LexState::Seeking,
        }
    }

    pub fn state(&self) -> LexState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn end(&self) -> usize {
        self.end
    }

    fn in_bounds(&self) -> bool {
        self.pos + SCAN_TAIL < self.end
    }

    /// Perform one transition; yields a token on entering `Validated`
    pub fn step(&mut self) -> Option<NameToken<'a>> {
        match self.state {
            LexState::Seeking => {
                match read_u32_le(self.data, self.pos).map(|len| len as usize) {
                    Some(len) if NAME_LEN.contains(&len) && self.pos + 4 + len <= self.end => {
                        self.state = LexState::Candidate { len };
                    }
                    _ => self.pos += 1,
                }
                None
            }
            LexState::Candidate { len } => {
                let name_start = self.pos + 4;
                let name_end = name_start + len;
                match ascii_str(&self.data[name_start..name_end]) {
                    Some(name) if self.filter.accepts(name) => {
                        self.state = LexState::Validated { name_end };
                        Some(NameToken {
                            name,
                            start: self.pos,
                            end: name_end,
                        })
                    }
                    _ => {
                        self.reject();
                        None
                    }
                }
            }
            // An unresolved token counts as rejected
            LexState::Validated { .. } => {
                self.reject();
                None
            }
        }
    }

    /// Next validated name, or None once the span is exhausted
    pub fn next_name(&mut self) -> Option<NameToken<'a>> {
        while self.in_bounds() {
            if let Some(token) = self.step() {
                return Some(token);
            }
        }
        None
    }

    /// Keep the current record and resume scanning at `next`
    pub fn accept(&mut self, next: usize) {
        self.pos = next.max(self.pos + 1);
        self.state = LexState::Seeking;
    }

    /// Drop the current candidate and resume one byte later
    pub fn reject(&mut self) {
        self.pos += 1;
        self.state = LexState::Seeking;
    }
}
