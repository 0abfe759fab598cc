//! AML name segments, name strings and scope resolution.
//!
//! ACPI names are built from 4-byte segments. A [`AmlName`] carries an
//! optional root marker (`\`), a count of parent prefixes (`^`) and the
//! segments themselves; relative names are turned into absolute paths with
//! [`AmlName::resolve`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::error::AmlError;
use crate::opcode::{is_lead_name_char, is_name_char};

/// A 4-byte AML name segment (e.g., `_SB_`, `PCI0`, `_HID`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameSeg(pub [u8; 4]);

impl NameSeg {
    /// `_SB_`, the system bus scope.
    pub const SB: Self = Self(*b"_SB_");
    /// `_HID`, hardware id.
    pub const HID: Self = Self(*b"_HID");
    /// `_CID`, compatible id.
    pub const CID: Self = Self(*b"_CID");
    /// `_OSI`, operating system interface query.
    pub const OSI: Self = Self(*b"_OSI");
    /// `_GL_`, the global lock mutex.
    pub const GL: Self = Self(*b"_GL_");
    /// `_REV`, the revision constant.
    pub const REV: Self = Self(*b"_REV");
    /// `_OS_`, the OS name string.
    pub const OS: Self = Self(*b"_OS_");

    /// Validates 4 raw bytes as a segment.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::InvalidSymbol`] if the first byte is not a lead
    /// name character and [`AmlError::InvalidData`] if a later byte is not a
    /// name character.
    pub fn new(bytes: [u8; 4]) -> Result<Self, AmlError> {
        if !is_lead_name_char(bytes[0]) {
            return Err(AmlError::InvalidSymbol("NameSeg must start with A-Z or _"));
        }
        if !bytes[1..].iter().all(|&b| is_name_char(b)) {
            return Err(AmlError::InvalidData("bad character in NameSeg"));
        }
        Ok(Self(bytes))
    }

    /// Builds a segment from a path component, padding it with `_`.
    ///
    /// An empty component becomes `____`.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::InvalidData`] if the component is longer than 4
    /// bytes or contains characters a segment cannot hold.
    pub fn from_component(component: &str) -> Result<Self, AmlError> {
        let bytes = component.as_bytes();
        if bytes.len() > 4 {
            return Err(AmlError::InvalidData("path component longer than 4 characters"));
        }
        let mut seg = [b'_'; 4];
        seg[..bytes.len()].copy_from_slice(bytes);
        Self::new(seg).map_err(|_| AmlError::InvalidData("bad character in path component"))
    }

    /// Returns the raw 4 characters, padding included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Validated segments are ASCII.
        core::str::from_utf8(&self.0).unwrap_or("")
    }

    /// Returns the segment as a path component, trailing `_` stripped.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.as_str().trim_end_matches('_')
    }
}

impl fmt::Debug for NameSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameSeg(\"{}\")", self.as_str())
    }
}

impl fmt::Display for NameSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.trimmed())
    }
}

/// An AML NameString: `\`-rooted, `^`-prefixed, or plain relative.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AmlName {
    root: bool,
    parent_prefixes: usize,
    segments: Vec<NameSeg>,
}

impl AmlName {
    /// Creates a name from its parts.
    #[must_use]
    pub fn new(root: bool, parent_prefixes: usize, segments: Vec<NameSeg>) -> Self {
        Self {
            root,
            // A rooted name never carries parent prefixes.
            parent_prefixes: if root { 0 } else { parent_prefixes },
            segments,
        }
    }

    /// The root path (`\`).
    #[must_use]
    pub fn root() -> Self {
        Self::new(true, 0, Vec::new())
    }

    /// An absolute path built from `segments`.
    #[must_use]
    pub fn absolute(segments: &[NameSeg]) -> Self {
        Self::new(true, 0, segments.to_vec())
    }

    /// Returns `true` if the name carries the root marker.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.root
    }

    /// Returns `true` for the null name (no marker, no segments).
    #[must_use]
    pub fn is_null(&self) -> bool {
        !self.root && self.parent_prefixes == 0 && self.segments.is_empty()
    }

    /// Returns `true` for a single unqualified segment, the only form that
    /// takes part in the upward scope search.
    #[must_use]
    pub fn is_name_seg(&self) -> bool {
        !self.root && self.parent_prefixes == 0 && self.segments.len() == 1
    }

    /// Number of `^` prefixes.
    #[must_use]
    pub fn parent_prefixes(&self) -> usize {
        self.parent_prefixes
    }

    /// The name segments.
    #[must_use]
    pub fn segments(&self) -> &[NameSeg] {
        &self.segments
    }

    /// The final segment, if any.
    #[must_use]
    pub fn last_seg(&self) -> Option<NameSeg> {
        self.segments.last().copied()
    }

    /// Appends a segment.
    pub fn push(&mut self, seg: NameSeg) {
        self.segments.push(seg);
    }

    /// Removes and returns the final segment.
    pub fn pop(&mut self) -> Option<NameSeg> {
        self.segments.pop()
    }

    /// Returns this path extended by `seg`.
    #[must_use]
    pub fn join(&self, seg: NameSeg) -> Self {
        let mut joined = self.clone();
        joined.push(seg);
        joined
    }

    /// Resolves this name against the absolute `scope`.
    ///
    /// A rooted name is returned unchanged. Otherwise one trailing scope
    /// segment is removed per parent prefix and the remaining segments of
    /// this name are appended.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::InvalidData`] if `scope` is not absolute or has
    /// fewer segments than this name has parent prefixes.
    pub fn resolve(&self, scope: &AmlName) -> Result<AmlName, AmlError> {
        if self.root {
            return Ok(self.clone());
        }
        if !scope.root {
            return Err(AmlError::InvalidData("scope is not an absolute path"));
        }
        if self.parent_prefixes > scope.segments.len() {
            return Err(AmlError::InvalidData("parent prefix escapes the root scope"));
        }

        let keep = scope.segments.len() - self.parent_prefixes;
        let mut segments = Vec::with_capacity(keep + self.segments.len());
        segments.extend_from_slice(&scope.segments[..keep]);
        segments.extend_from_slice(&self.segments);
        Ok(AmlName::new(true, 0, segments))
    }

    /// Renders the name as a path string (e.g. `\_SB.PCI0`).
    #[must_use]
    pub fn as_string(&self) -> String {
        alloc::format!("{self}")
    }
}

impl FromStr for AmlName {
    type Err = AmlError;

    /// Parses the textual form: `\`, `\_SB.PCI0`, `^^FOO`, `PCI0.SBRG`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (root, rest) = match s.strip_prefix('\\') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let trimmed = rest.trim_start_matches('^');
        let parent_prefixes = rest.len() - trimmed.len();
        if root && parent_prefixes > 0 {
            return Err(AmlError::InvalidData("rooted path with parent prefixes"));
        }

        let segments = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed
                .split('.')
                .map(NameSeg::from_component)
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(AmlName::new(root, parent_prefixes, segments))
    }
}

impl fmt::Display for AmlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root {
            f.write_str("\\")?;
        }
        for _ in 0..self.parent_prefixes {
            f.write_str("^")?;
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for AmlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AmlName(\"{self}\")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> AmlName {
        s.parse().unwrap()
    }

    #[test]
    fn segment_padding_is_stripped_for_display() {
        assert_eq!(NameSeg(*b"AB__").trimmed(), "AB");
        assert_eq!(NameSeg(*b"ABCD").trimmed(), "ABCD");
        assert_eq!(NameSeg(*b"____").trimmed(), "");
        assert_eq!(alloc::format!("{}", NameSeg::SB), "_SB");
    }

    #[test]
    fn segment_validation() {
        assert!(NameSeg::new(*b"PCI0").is_ok());
        assert!(matches!(NameSeg::new(*b"0PCI"), Err(AmlError::InvalidSymbol(_))));
        assert!(matches!(NameSeg::new(*b"PC-0"), Err(AmlError::InvalidData(_))));
        assert_eq!(NameSeg::from_component("_SB").unwrap(), NameSeg::SB);
        assert!(NameSeg::from_component("TOOLONG").is_err());
    }

    #[test]
    fn parse_and_display_round_trip() {
        for text in ["\\", "\\_SB.PCI0", "^^FOO", "PCI0.SBRG", "^X"] {
            assert_eq!(name(text).as_string(), text);
        }
        assert!(name("\\_SB").is_absolute());
        assert_eq!(name("\\_SB").segments(), &[NameSeg::SB]);
        assert!(name("FOO").is_name_seg());
        assert!(!name("^FOO").is_name_seg());
        assert!(!name("A.B").is_name_seg());
    }

    #[test]
    fn rooted_names_resolve_unchanged() {
        let scope = name("\\A.B");
        assert_eq!(name("\\X.Y").resolve(&scope).unwrap(), name("\\X.Y"));
    }

    #[test]
    fn relative_names_append_to_scope() {
        let scope = name("\\_SB.PCI0");
        assert_eq!(name("SBRG.EC0").resolve(&scope).unwrap(), name("\\_SB.PCI0.SBRG.EC0"));
        assert_eq!(name("FOO").resolve(&AmlName::root()).unwrap(), name("\\FOO"));
    }

    #[test]
    fn parent_prefixes_pop_scope_segments() {
        let scope = name("\\A.B.C");
        assert_eq!(name("^X").resolve(&scope).unwrap(), name("\\A.B.X"));
        assert_eq!(name("^^^X").resolve(&scope).unwrap(), name("\\X"));
        assert!(matches!(
            name("^^^^X").resolve(&scope),
            Err(AmlError::InvalidData(_))
        ));
    }

    #[test]
    fn null_name_resolves_to_scope() {
        let scope = name("\\A.B");
        let null = AmlName::new(false, 0, Vec::new());
        assert!(null.is_null());
        assert_eq!(null.resolve(&scope).unwrap(), scope);
    }
}
