//! Compressed EISA/PnP identifiers, as found in `_HID` and `_CID`.

use core::fmt;

/// A compressed EISA/PnP device identifier.
///
/// ASL `EisaId("PNP0A03")` compiles to a DWord. The 3-letter manufacturer
/// code is packed into the upper 16 bits and the product id into the lower
/// 16, big-endian, so the little-endian value read from the stream must be
/// byte-swapped first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EisaId(pub u32);

impl EisaId {
    /// Decodes the id into its 7-character ASCII form (e.g. `PNP0A03`).
    ///
    /// Returns `None` if a manufacturer letter falls outside `A`-`Z`, which
    /// means the integer is not an EISA id at all.
    #[must_use]
    pub fn decode(self) -> Option<[u8; 7]> {
        // After swapping:
        //   bits 30-26: first char - 'A' + 1
        //   bits 25-21: second char - 'A' + 1
        //   bits 20-16: third char - 'A' + 1
        //   bits 15-0:  product id as 4 hex digits
        let swapped = self.0.swap_bytes();
        let letter = |shift: u32| -> Option<u8> {
            let code = ((swapped >> shift) & 0x1F) as u8;
            (1..=26).contains(&code).then_some(b'@' + code)
        };
        let product = (swapped & 0xFFFF) as u16;

        let hex_digit = |nibble: u16| -> u8 {
            let nibble = (nibble & 0xF) as u8;
            if nibble < 10 {
                b'0' + nibble
            } else {
                b'A' + nibble - 10
            }
        };

        Some([
            letter(26)?,
            letter(21)?,
            letter(16)?,
            hex_digit(product >> 12),
            hex_digit(product >> 8),
            hex_digit(product >> 4),
            hex_digit(product),
        ])
    }
}

impl fmt::Display for EisaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decode() {
            Some(text) => f.write_str(core::str::from_utf8(&text).map_err(|_| fmt::Error)?),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_pci_root_bridge() {
        assert_eq!(EisaId(0x030A_D041).decode(), Some(*b"PNP0A03"));
        assert_eq!(alloc::format!("{}", EisaId(0x030A_D041)), "PNP0A03");
    }

    #[test]
    fn decodes_hex_product_digits() {
        // PNP0C0F, a PCI interrupt link.
        assert_eq!(EisaId(0x0F0C_D041).decode(), Some(*b"PNP0C0F"));
    }

    #[test]
    fn rejects_non_letters() {
        assert_eq!(EisaId(0).decode(), None);
        assert_eq!(alloc::format!("{}", EisaId(0)), "0x00000000");
    }
}
