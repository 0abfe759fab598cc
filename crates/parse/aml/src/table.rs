//! DSDT/SSDT header validation.

use crate::cursor::Cursor;
use crate::error::TableError;

/// Standard ACPI System Description Table header.
///
/// This 36-byte header precedes the AML body of every DSDT and SSDT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdtHeader {
    /// 4-byte ASCII signature identifying the table type.
    pub signature: [u8; 4],
    /// Total length of the table, including the header, in bytes.
    pub length: u32,
    /// Revision of the table structure.
    pub revision: u8,
    /// Checksum byte. The entire table, including the header, must sum to zero.
    pub checksum: u8,
    /// OEM-supplied identification string.
    pub oem_id: [u8; 6],
    /// OEM-supplied table identification string.
    pub oem_table_id: [u8; 8],
    /// OEM-supplied revision number.
    pub oem_revision: u32,
    /// Vendor ID of the utility that created the table.
    pub creator_id: u32,
    /// Revision of the utility that created the table.
    pub creator_revision: u32,
}

impl SdtHeader {
    /// The size of an SDT header in bytes.
    pub const SIZE: usize = 36;

    /// Reads a header from the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Truncated`] if `data` is shorter than
    /// [`SdtHeader::SIZE`].
    pub fn parse(data: &[u8]) -> Result<Self, TableError> {
        let mut cursor = Cursor::new(data);
        let bytes = |cursor: &mut Cursor<'_>, out: &mut [u8]| -> Result<(), TableError> {
            for b in out.iter_mut() {
                *b = cursor.next_byte().map_err(|_| TableError::Truncated)?;
            }
            Ok(())
        };
        let dword = |cursor: &mut Cursor<'_>| cursor.next_dword().map_err(|_| TableError::Truncated);
        let byte = |cursor: &mut Cursor<'_>| cursor.next_byte().map_err(|_| TableError::Truncated);

        let mut signature = [0; 4];
        bytes(&mut cursor, &mut signature)?;
        let length = dword(&mut cursor)?;
        let revision = byte(&mut cursor)?;
        let checksum = byte(&mut cursor)?;
        let mut oem_id = [0; 6];
        bytes(&mut cursor, &mut oem_id)?;
        let mut oem_table_id = [0; 8];
        bytes(&mut cursor, &mut oem_table_id)?;

        Ok(Self {
            signature,
            length,
            revision,
            checksum,
            oem_id,
            oem_table_id,
            oem_revision: dword(&mut cursor)?,
            creator_id: dword(&mut cursor)?,
            creator_revision: dword(&mut cursor)?,
        })
    }
}

/// Validates a DSDT or SSDT and returns its header and AML body.
///
/// # Errors
///
/// Returns [`TableError::Truncated`] if the buffer is shorter than the header
/// or the length it declares, [`TableError::InvalidSignature`] for anything
/// other than `DSDT`/`SSDT`, or [`TableError::InvalidChecksum`] if the
/// declared bytes do not sum to zero.
pub fn aml_body(data: &[u8]) -> Result<(SdtHeader, &[u8]), TableError> {
    let header = SdtHeader::parse(data)?;
    if &header.signature != b"DSDT" && &header.signature != b"SSDT" {
        return Err(TableError::InvalidSignature);
    }

    let length = usize::try_from(header.length).map_err(|_| TableError::Truncated)?;
    if length < SdtHeader::SIZE || length > data.len() {
        return Err(TableError::Truncated);
    }
    let table = &data[..length];
    if !validate_checksum(table) {
        return Err(TableError::InvalidChecksum);
    }

    log::info!(
        "ACPI: {} rev {} length {length}",
        core::str::from_utf8(&header.signature).unwrap_or("????"),
        header.revision
    );
    Ok((header, &table[SdtHeader::SIZE..]))
}

/// Validate the checksum of a byte slice.
///
/// ACPI tables are designed so that the sum of all bytes in the table equals
/// zero (mod 256).
#[must_use]
pub fn validate_checksum(data: &[u8]) -> bool {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b)) == 0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Wraps `body` in a table with a valid checksum.
    pub(crate) fn make_table(signature: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let length = u32::try_from(SdtHeader::SIZE + body.len()).unwrap();
        let mut table = Vec::new();
        table.extend_from_slice(signature);
        table.extend_from_slice(&length.to_le_bytes());
        table.push(2); // revision
        table.push(0); // checksum, patched below
        table.extend_from_slice(b"HADRON");
        table.extend_from_slice(b"TESTTABL");
        table.extend_from_slice(&1u32.to_le_bytes());
        table.extend_from_slice(b"INTL");
        table.extend_from_slice(&0x2023_0628u32.to_le_bytes());
        table.extend_from_slice(body);
        let sum = table.iter().fold(0u8, |s, &b| s.wrapping_add(b));
        table[9] = 0u8.wrapping_sub(sum);
        table
    }

    #[test]
    fn parses_header_fields() {
        let table = make_table(b"DSDT", &[0xA3]);
        let header = SdtHeader::parse(&table).unwrap();
        assert_eq!(&header.signature, b"DSDT");
        assert_eq!(header.length, 37);
        assert_eq!(header.revision, 2);
        assert_eq!(&header.oem_id, b"HADRON");
        assert_eq!(&header.oem_table_id, b"TESTTABL");
        assert_eq!(header.oem_revision, 1);
        assert_eq!(header.creator_id, u32::from_le_bytes(*b"INTL"));
    }

    #[test]
    fn body_follows_header() {
        let table = make_table(b"SSDT", &[0xA3, 0xA3]);
        let (_, body) = aml_body(&table).unwrap();
        assert_eq!(body, &[0xA3, 0xA3]);
    }

    #[test]
    fn trailing_bytes_beyond_length_are_ignored() {
        let mut table = make_table(b"DSDT", &[0xA3]);
        table.extend_from_slice(&[0xFF, 0xFF]);
        let (_, body) = aml_body(&table).unwrap();
        assert_eq!(body, &[0xA3]);
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(aml_body(&[0; 10]), Err(TableError::Truncated));
        assert_eq!(
            aml_body(&make_table(b"FACP", &[])),
            Err(TableError::InvalidSignature)
        );

        let mut table = make_table(b"DSDT", &[0xA3]);
        table[36] = 0xA5;
        assert_eq!(aml_body(&table), Err(TableError::InvalidChecksum));

        let mut table = make_table(b"DSDT", &[0xA3]);
        table.truncate(36);
        assert_eq!(aml_body(&table), Err(TableError::Truncated));
    }

    #[test]
    fn checksum() {
        assert!(validate_checksum(&[]));
        assert!(validate_checksum(&[0x01, 0xFF]));
        assert!(!validate_checksum(&[0x01]));
    }
}
