//! ASCII integer literals in AML source syntax.
//!
//! A leading `0` defers radix selection: `0x`/`0X` selects hexadecimal and
//! any other digit selects octal. A leading non-zero digit selects decimal.

use crate::cursor::Cursor;
use crate::error::AmlError;

/// Decodes `1234`, `0x1A` or `017` style literals.
///
/// # Errors
///
/// Returns [`AmlError::EndOfStream`] for empty input (or a bare `0x`) and
/// [`AmlError::InvalidData`] for digits outside the radix or values that
/// overflow a `u64`.
pub fn decode_integer_literal(text: &[u8]) -> Result<u64, AmlError> {
    let mut cursor = Cursor::new(text);

    let radix = match cursor.next_byte()? {
        b'0' => match cursor.peek() {
            None => return Ok(0),
            Some(b'x' | b'X') => {
                cursor.next_byte()?;
                if cursor.is_empty() {
                    return Err(AmlError::EndOfStream);
                }
                16
            }
            Some(_) => 8,
        },
        first @ b'1'..=b'9' => {
            return accumulate(&mut cursor, 10, u64::from(first - b'0'));
        }
        _ => return Err(AmlError::InvalidData("integer literal must start with a digit")),
    };
    accumulate(&mut cursor, radix, 0)
}

fn accumulate(cursor: &mut Cursor<'_>, radix: u32, mut value: u64) -> Result<u64, AmlError> {
    while let Some(byte) = cursor.try_next_byte() {
        let digit = char::from(byte)
            .to_digit(radix)
            .ok_or(AmlError::InvalidData("digit outside the literal's radix"))?;
        value = value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(AmlError::InvalidData("integer literal overflows 64 bits"))?;
    }
    Ok(value)
}
