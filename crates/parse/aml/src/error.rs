//! Error types for AML decoding.

use alloc::string::String;
use core::fmt;

/// Errors that can occur while decoding AML bytecode.
///
/// Every decoding routine propagates these unchanged; a single malformed
/// construct aborts the decode of the whole table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmlError {
    /// The byte stream ended in the middle of a construct.
    EndOfStream,
    /// An opcode byte (or extended opcode pair) was not recognised.
    InvalidOpcode(u16),
    /// A lexically valid token appeared where the grammar does not allow it.
    InvalidSymbol(&'static str),
    /// A decoded value failed a structural check.
    InvalidData(&'static str),
    /// A name at an invocation site does not resolve to a method.
    InvalidMethod(String),
    /// A PkgLength-bounded block is larger than its owner, or was not
    /// consumed exactly.
    InvalidLength,
    /// The construct is recognised but intentionally not decoded.
    Unimplemented(&'static str),
    /// A name was defined twice under [`RedefinitionPolicy::Reject`](crate::RedefinitionPolicy::Reject).
    DuplicateName(String),
    /// The table wrapping the AML body is malformed.
    Table(TableError),
}

/// Errors found while validating a DSDT/SSDT header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// The buffer is shorter than the header or the length it declares.
    Truncated,
    /// The signature is neither `DSDT` nor `SSDT`.
    InvalidSignature,
    /// The bytes of the table do not sum to zero.
    InvalidChecksum,
}

impl fmt::Display for AmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfStream => f.write_str("unexpected end of AML stream"),
            Self::InvalidOpcode(op) if *op > 0xFF => write!(f, "invalid opcode {op:#06x}"),
            Self::InvalidOpcode(op) => write!(f, "invalid opcode {op:#04x}"),
            Self::InvalidSymbol(reason) => write!(f, "invalid symbol: {reason}"),
            Self::InvalidData(reason) => write!(f, "invalid data: {reason}"),
            Self::InvalidMethod(name) => write!(f, "{name} is not a method"),
            Self::InvalidLength => f.write_str("block length exceeds or mismatches its owner"),
            Self::Unimplemented(what) => write!(f, "{what} is not implemented"),
            Self::DuplicateName(name) => write!(f, "{name} is already defined"),
            Self::Table(e) => write!(f, "invalid table: {e}"),
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => f.write_str("truncated"),
            Self::InvalidSignature => f.write_str("not a DSDT or SSDT"),
            Self::InvalidChecksum => f.write_str("bad checksum"),
        }
    }
}

impl core::error::Error for AmlError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Table(e) => Some(e),
            _ => None,
        }
    }
}

impl core::error::Error for TableError {}

impl From<TableError> for AmlError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}
