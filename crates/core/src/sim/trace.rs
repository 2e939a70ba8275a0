//! Trace-file format and parser.
//!
//! A trace file is a sequence of textual records, one instruction per
//! record:
//!
//! ```text
//! EIP (03): 7c809d65 a3 05 14
//! dstM: 00000000 --------  srcM: 7ffdf010 6f3a2b11
//!
//! ```
//!
//! The `EIP` line is an instruction fetch: the parenthesized field is the
//! fetch length in bytes, the next field the fetch address. The `dstM`/`srcM`
//! line names an optional destination and source data access; a zero address
//! means "no access", and `--------` in the destination value column turns
//! the destination access into a read. A blank line terminates the record
//! and retires the instruction.

use std::io;
use std::io::BufRead;

use thiserror::Error;

/// A destination data access: an address, and the written value if the
/// access is a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataAccess {
    /// The accessed 32-bit address.
    pub addr: u32,
    /// Low byte of the written value, or `None` for a read.
    pub value: Option<u8>,
}

/// One parsed trace event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// An instruction fetch of `len` bytes at `addr`.
    Fetch {
        /// Fetch address.
        addr: u32,
        /// Fetch length in bytes.
        len: u32,
    },
    /// A data access pair; either side may be absent.
    Data {
        /// Destination access (write, or read when the value column is
        /// dashes).
        dst: Option<DataAccess>,
        /// Source read address.
        src: Option<u32>,
    },
    /// End of an instruction record (blank line).
    InstructionBoundary,
}

/// Trace reading or parsing failure.
///
/// Fatal to the run: the driver reports it and terminates rather than
/// continue with corrupt accounting.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("trace read failed: {0}")]
    Io(#[from] io::Error),

    /// A line did not match the trace format.
    #[error("malformed trace line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: u64,
        /// What was wrong with it.
        reason: String,
    },
}

/// Streaming trace parser over any buffered reader.
///
/// Yields one [`TraceEvent`] per input line (blank lines included, as
/// instruction boundaries).
pub struct TraceReader<R> {
    lines: io::Lines<R>,
    line_no: u64,
}

impl<R: BufRead> TraceReader<R> {
    /// Creates a parser over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn parse_line(&self, line: &str) -> Result<TraceEvent, TraceError> {
        if line.trim().is_empty() {
            return Ok(TraceEvent::InstructionBoundary);
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields[0] {
            "EIP" => self.parse_fetch(&fields),
            "dstM:" => self.parse_data(&fields),
            other => Err(self.malformed(format!("unknown record {other:?}"))),
        }
    }

    /// Parses `EIP (NN): ADDR ...`.
    fn parse_fetch(&self, fields: &[&str]) -> Result<TraceEvent, TraceError> {
        if fields.len() < 3 {
            return Err(self.malformed("truncated EIP record".to_string()));
        }

        let len_field = fields[1]
            .strip_prefix('(')
            .and_then(|f| f.split(')').next())
            .ok_or_else(|| self.malformed(format!("bad length field {:?}", fields[1])))?;
        let len: u32 = len_field
            .parse()
            .map_err(|_| self.malformed(format!("bad fetch length {len_field:?}")))?;
        let addr = self.parse_hex(fields[2])?;

        Ok(TraceEvent::Fetch { addr, len })
    }

    /// Parses `dstM: ADDR VALUE srcM: ADDR VALUE`.
    fn parse_data(&self, fields: &[&str]) -> Result<TraceEvent, TraceError> {
        if fields.len() < 6 || fields[3] != "srcM:" {
            return Err(self.malformed("truncated data record".to_string()));
        }

        let dst_addr = self.parse_hex(fields[1])?;
        let dst = (dst_addr != 0).then(|| -> Result<DataAccess, TraceError> {
            let value = if fields[2] == "--------" {
                None
            } else {
                Some((self.parse_hex(fields[2])? & 0xFF) as u8)
            };
            Ok(DataAccess {
                addr: dst_addr,
                value,
            })
        });
        let dst = dst.transpose()?;

        let src_addr = self.parse_hex(fields[4])?;
        let src = (src_addr != 0).then_some(src_addr);

        Ok(TraceEvent::Data { dst, src })
    }

    fn parse_hex(&self, field: &str) -> Result<u32, TraceError> {
        u32::from_str_radix(field, 16)
            .map_err(|_| self.malformed(format!("bad hex field {field:?}")))
    }

    fn malformed(&self, reason: String) -> TraceError {
        TraceError::Malformed {
            line: self.line_no,
            reason,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(TraceError::Io(e))),
        };
        self.line_no += 1;
        Some(self.parse_line(&line))
    }
}
