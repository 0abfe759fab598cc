//! AML opcodes and symbol classification.
//!
//! The classifier reads one byte (two after the `0x5B` extended-opcode
//! escape) and reports every interpretation it has: a name character, an
//! opcode, or both. `0x00` is both NullName and `ZeroOp`; the grammar picks.

use crate::cursor::Cursor;
use crate::error::AmlError;

/// Extended-opcode escape byte.
pub const EXT_OP_PREFIX: u8 = 0x5B;

macro_rules! opcodes {
    ($($name:ident = $value:literal,)*) => {
        /// Every opcode the decoder recognises. Extended opcodes carry the
        /// `0x5B` escape in their high byte.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u16)]
        pub enum Opcode {
            $($name = $value,)*
        }

        impl Opcode {
            /// Looks up a raw one- or two-byte opcode value.
            #[must_use]
            pub const fn from_raw(value: u16) -> Option<Self> {
                match value {
                    $($value => Some(Self::$name),)*
                    _ => None,
                }
            }
        }
    };
}

opcodes! {
    Zero = 0x00,
    One = 0x01,
    Alias = 0x06,
    Name = 0x08,
    BytePrefix = 0x0A,
    WordPrefix = 0x0B,
    DWordPrefix = 0x0C,
    StringPrefix = 0x0D,
    QWordPrefix = 0x0E,
    Scope = 0x10,
    Buffer = 0x11,
    Package = 0x12,
    VarPackage = 0x13,
    Method = 0x14,
    External = 0x15,
    Local0 = 0x60,
    Local1 = 0x61,
    Local2 = 0x62,
    Local3 = 0x63,
    Local4 = 0x64,
    Local5 = 0x65,
    Local6 = 0x66,
    Local7 = 0x67,
    Arg0 = 0x68,
    Arg1 = 0x69,
    Arg2 = 0x6A,
    Arg3 = 0x6B,
    Arg4 = 0x6C,
    Arg5 = 0x6D,
    Arg6 = 0x6E,
    Store = 0x70,
    RefOf = 0x71,
    Add = 0x72,
    Concat = 0x73,
    Subtract = 0x74,
    Increment = 0x75,
    Decrement = 0x76,
    Multiply = 0x77,
    Divide = 0x78,
    ShiftLeft = 0x79,
    ShiftRight = 0x7A,
    And = 0x7B,
    NAnd = 0x7C,
    Or = 0x7D,
    NOr = 0x7E,
    Xor = 0x7F,
    Not = 0x80,
    FindSetLeftBit = 0x81,
    FindSetRightBit = 0x82,
    DerefOf = 0x83,
    ConcatRes = 0x84,
    Mod = 0x85,
    Notify = 0x86,
    SizeOf = 0x87,
    Index = 0x88,
    Match = 0x89,
    CreateDWordField = 0x8A,
    CreateWordField = 0x8B,
    CreateByteField = 0x8C,
    CreateBitField = 0x8D,
    ObjectType = 0x8E,
    CreateQWordField = 0x8F,
    LAnd = 0x90,
    LOr = 0x91,
    LNot = 0x92,
    LEqual = 0x93,
    LGreater = 0x94,
    LLess = 0x95,
    ToBuffer = 0x96,
    ToDecimalString = 0x97,
    ToHexString = 0x98,
    ToInteger = 0x99,
    ToString = 0x9C,
    CopyObject = 0x9D,
    Mid = 0x9E,
    Continue = 0x9F,
    If = 0xA0,
    Else = 0xA1,
    While = 0xA2,
    Noop = 0xA3,
    Return = 0xA4,
    Break = 0xA5,
    BreakPoint = 0xCC,
    Ones = 0xFF,
    Mutex = 0x5B01,
    Event = 0x5B02,
    CondRefOf = 0x5B12,
    CreateField = 0x5B13,
    LoadTable = 0x5B1F,
    Load = 0x5B20,
    Stall = 0x5B21,
    Sleep = 0x5B22,
    Acquire = 0x5B23,
    Signal = 0x5B24,
    Wait = 0x5B25,
    Reset = 0x5B26,
    Release = 0x5B27,
    FromBcd = 0x5B28,
    ToBcd = 0x5B29,
    Unload = 0x5B2A,
    Revision = 0x5B30,
    Debug = 0x5B31,
    Fatal = 0x5B32,
    Timer = 0x5B33,
    OpRegion = 0x5B80,
    Field = 0x5B81,
    Device = 0x5B82,
    Processor = 0x5B83,
    PowerRes = 0x5B84,
    ThermalZone = 0x5B85,
    IndexField = 0x5B86,
    BankField = 0x5B87,
    DataRegion = 0x5B88,
}

impl Opcode {
    /// Raw encoded value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self as u16
    }
}

/// The name-character interpretation of a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameChar {
    /// `A`-`Z` or `_`.
    Lead,
    /// `0`-`9`.
    Digit,
    /// `\`.
    Root,
    /// `^`.
    ParentPrefix,
    /// `.` (0x2E), followed by two segments.
    DualNamePrefix,
    /// `/` (0x2F), followed by a segment count.
    MultiNamePrefix,
    /// `0x00`, the empty name.
    Null,
}

impl NameChar {
    /// Classifies `byte` as a name character, if it is one.
    #[must_use]
    pub const fn classify(byte: u8) -> Option<Self> {
        match byte {
            b'A'..=b'Z' | b'_' => Some(Self::Lead),
            b'0'..=b'9' => Some(Self::Digit),
            b'\\' => Some(Self::Root),
            b'^' => Some(Self::ParentPrefix),
            0x2E => Some(Self::DualNamePrefix),
            0x2F => Some(Self::MultiNamePrefix),
            0x00 => Some(Self::Null),
            _ => None,
        }
    }
}

/// Returns `true` for bytes allowed after the first character of a NameSeg.
#[must_use]
pub const fn is_name_char(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'_' | b'0'..=b'9')
}

/// Returns `true` for bytes allowed as the first character of a NameSeg.
#[must_use]
pub const fn is_lead_name_char(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'_')
}

/// One classified symbol from the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// The (first) byte that was consumed.
    pub byte: u8,
    /// Opcode interpretation, if any.
    pub opcode: Option<Opcode>,
    /// Name-character interpretation, if any.
    pub name_char: Option<NameChar>,
}

impl Symbol {
    /// The name-character interpretation, excluding the null name.
    #[must_use]
    pub fn name_start(&self) -> Option<NameChar> {
        self.name_char.filter(|ch| *ch != NameChar::Null)
    }
}

/// Classifies and consumes the next symbol.
///
/// Returns `Ok(None)` at the end of the stream.
///
/// # Errors
///
/// Returns [`AmlError::EndOfStream`] if an extended-opcode escape is the last
/// byte, and [`AmlError::InvalidOpcode`] for bytes (or byte pairs) with no
/// interpretation.
pub fn next_symbol(cursor: &mut Cursor<'_>) -> Result<Option<Symbol>, AmlError> {
    let Some(byte) = cursor.try_next_byte() else {
        return Ok(None);
    };
    let name_char = NameChar::classify(byte);

    let opcode = if byte == EXT_OP_PREFIX {
        let second = cursor.next_byte()?;
        let raw = (u16::from(EXT_OP_PREFIX) << 8) | u16::from(second);
        Some(Opcode::from_raw(raw).ok_or(AmlError::InvalidOpcode(raw))?)
    } else {
        Opcode::from_raw(u16::from(byte))
    };

    if opcode.is_none() && name_char.is_none() {
        return Err(AmlError::InvalidOpcode(u16::from(byte)));
    }
    Ok(Some(Symbol {
        byte,
        opcode,
        name_char,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(data: &[u8]) -> Result<Option<Symbol>, AmlError> {
        next_symbol(&mut Cursor::new(data))
    }

    #[test]
    fn zero_is_both_null_name_and_zero_op() {
        let symbol = classify(&[0x00]).unwrap().unwrap();
        assert_eq!(symbol.opcode, Some(Opcode::Zero));
        assert_eq!(symbol.name_char, Some(NameChar::Null));
        assert_eq!(symbol.name_start(), None);
    }

    #[test]
    fn name_characters_are_not_opcodes() {
        let symbol = classify(b"_SB_").unwrap().unwrap();
        assert_eq!(symbol.opcode, None);
        assert_eq!(symbol.name_char, Some(NameChar::Lead));

        let symbol = classify(b"\\").unwrap().unwrap();
        assert_eq!(symbol.name_start(), Some(NameChar::Root));
    }

    #[test]
    fn extended_opcodes_consume_two_bytes() {
        let mut cursor = Cursor::new(&[0x5B, 0x82, 0xAA]);
        let symbol = next_symbol(&mut cursor).unwrap().unwrap();
        assert_eq!(symbol.opcode, Some(Opcode::Device));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn truncated_extended_opcode() {
        assert_eq!(classify(&[0x5B]), Err(AmlError::EndOfStream));
    }

    #[test]
    fn unknown_opcodes_are_rejected() {
        assert_eq!(classify(&[0x5B, 0x7F]), Err(AmlError::InvalidOpcode(0x5B7F)));
        assert_eq!(classify(&[0x02]), Err(AmlError::InvalidOpcode(0x02)));
    }

    #[test]
    fn end_of_stream_yields_none() {
        assert_eq!(classify(&[]), Ok(None));
    }

    #[test]
    fn raw_round_trips_through_from_raw() {
        for op in [Opcode::Store, Opcode::Ones, Opcode::OpRegion, Opcode::Timer] {
            assert_eq!(Opcode::from_raw(op.raw()), Some(op));
        }
    }
}
