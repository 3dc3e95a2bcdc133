//! Event trace reader.
//!
//! A trace is a UTF-8 text stream with one event per line:
//!
//! | line             | event |
//! |------------------|-------|
//! | `B <pc> <taken>` | conditional branch, `taken` is `0`, `1`, `N` or `T` |
//! | `I [count]`      | `count` non-branch instructions (default 1) |
//! | `L <addr> <pc>`  | load |
//! | `S <addr> <pc>`  | store |
//!
//! Numbers are decimal or `0x`-prefixed hex. Blank lines and lines starting
//! with `#` are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::common::TraceError;

/// One decoded trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    /// Conditional branch at `pc`.
    Branch {
        /// Branch instruction address.
        pc: u64,
        /// Resolved direction.
        taken: bool,
    },
    /// A run of non-branch instructions.
    Instructions(u64),
    /// Load of `addr` by the instruction at `pc`.
    Load {
        /// Data address.
        addr: u64,
        /// Load instruction address.
        pc: u64,
    },
    /// Store to `addr` by the instruction at `pc`.
    Store {
        /// Data address.
        addr: u64,
        /// Store instruction address.
        pc: u64,
    },
}

impl FromStr for TraceEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let tag = fields.next().ok_or("empty event")?;
        let event = match tag {
            "B" => Self::Branch {
                pc: number(fields.next(), "pc")?,
                taken: direction(fields.next())?,
            },
            "I" => Self::Instructions(match fields.next() {
                Some(count) => number(Some(count), "count")?,
                None => 1,
            }),
            "L" => Self::Load {
                addr: number(fields.next(), "address")?,
                pc: number(fields.next(), "pc")?,
            },
            "S" => Self::Store {
                addr: number(fields.next(), "address")?,
                pc: number(fields.next(), "pc")?,
            },
            other => return Err(format!("unknown event `{other}`")),
        };
        if let Some(extra) = fields.next() {
            return Err(format!("unexpected trailing field `{extra}`"));
        }
        Ok(event)
    }
}

fn number(field: Option<&str>, what: &str) -> Result<u64, String> {
    let text = field.ok_or_else(|| format!("missing {what}"))?;
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid {what} `{text}`: {e}"))
}

fn direction(field: Option<&str>) -> Result<bool, String> {
    match field {
        Some("1" | "T") => Ok(true),
        Some("0" | "N") => Ok(false),
        Some(other) => Err(format!("invalid direction `{other}` (expected 0, 1, T or N)")),
        None => Err("missing direction".to_string()),
    }
}

/// Streaming reader yielding one [`TraceEvent`] per non-empty line.
///
/// Iteration ends at end of input or after the first error.
#[derive(Debug)]
pub struct TraceReader<R> {
    source: R,
    line: usize,
    buf: String,
    failed: bool,
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered source.
    pub const fn new(source: R) -> Self {
        Self {
            source,
            line: 0,
            buf: String::new(),
            failed: false,
        }
    }

    /// Number of lines consumed so far.
    pub const fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.buf.clear();
            match self.source.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let parsed = text
                .parse()
                .map_err(|reason| TraceError::malformed(self.line, reason));
            self.failed = parsed.is_err();
            return Some(parsed);
        }
    }
}
