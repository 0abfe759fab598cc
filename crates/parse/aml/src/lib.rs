//! `hadron-aml` --- a `no_std` ACPI Machine Language decoder.
//!
//! The decoder turns the AML body of a DSDT or SSDT into a tree of typed
//! [`TermObj`]s and, as a side effect, populates a [`Namespace`] with every
//! named object it defines. The namespace is consulted while decoding: a bare
//! name is a method call exactly when the name is bound to a method at that
//! point, so tables must be loaded in firmware order (DSDT first).
//!
//! The crate only needs `alloc`. It does not map physical memory or
//! evaluate AML; callers hand it table bytes and query the result.
//!
//! # Usage
//!
//! ```ignore
//! let mut context = AmlContext::new();
//! context.load_table(dsdt_bytes)?;
//! for ssdt in ssdts {
//!     context.load_table(ssdt)?;
//! }
//! for device in context.devices() {
//!     log::info!("{} {:?}", device.path, device.hid);
//! }
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod cursor;
pub mod eisa;
pub mod error;
pub mod literal;
pub mod name;
pub mod namespace;
pub mod object;
pub(crate) mod opcode;
pub mod parser;
pub mod table;

use alloc::vec::Vec;
use core::fmt;

pub use config::{DEFAULT_MAX_DEPTH, DEFAULT_OS_NAME, DecoderConfig, MethodBodies, RedefinitionPolicy};
pub use cursor::Cursor;
pub use eisa::EisaId;
pub use error::{AmlError, TableError};
pub use literal::decode_integer_literal;
pub use name::{AmlName, NameSeg};
pub use namespace::{DeviceInfo, Namespace, Node};
pub use object::{
    AccessType, BinaryOp, ConvertOp, CreateFieldKind, Field, FieldElement, FieldFlags,
    FieldSource, LogicalOp, Method, MethodBody, MethodFlags, NamedField, RegionSpace, TermObj,
    UpdateRule,
};
pub use parser::Parser;
pub use table::SdtHeader;

/// A namespace plus the settings used to decode tables into it.
///
/// Tables decoded through the same context share one namespace, so an SSDT
/// can call methods the DSDT defined.
#[derive(Debug, Clone)]
pub struct AmlContext {
    namespace: Namespace,
    config: DecoderConfig,
}

impl Default for AmlContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AmlContext {
    /// Creates a context with the default [`DecoderConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Creates a context with a custom configuration.
    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            namespace: Namespace::new(&config),
            config,
        }
    }

    /// The namespace built so far.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Paths defined more than once across every decode.
    #[must_use]
    pub fn redefinitions(&self) -> &[AmlName] {
        self.namespace.redefinitions()
    }

    /// Decodes an AML body (no table header) in the root scope.
    ///
    /// Objects defined before a failure stay in the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::EndOfStream`] for an empty buffer, otherwise the
    /// first decoding error.
    pub fn decode(&mut self, aml: &[u8]) -> Result<Vec<TermObj>, AmlError> {
        if aml.is_empty() {
            return Err(AmlError::EndOfStream);
        }
        let terms =
            Parser::new(aml, AmlName::root(), &mut self.namespace, &self.config).parse_term_list()?;
        log::info!(
            "ACPI: decoded {} bytes of AML into {} terms",
            aml.len(),
            terms.len()
        );
        Ok(terms)
    }

    /// Validates a complete DSDT or SSDT and decodes its body.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::Table`] if the header, length or checksum is
    /// bad, otherwise as [`AmlContext::decode`].
    pub fn load_table(&mut self, table: &[u8]) -> Result<Vec<TermObj>, AmlError> {
        let (_, body) = table::aml_body(table)?;
        self.decode(body)
    }

    /// The object bound at a textual path such as `\_SB.PCI0._HID`.
    ///
    /// Returns `None` for malformed or relative paths.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&TermObj> {
        let path: AmlName = path.parse().ok()?;
        self.namespace.lookup(&path)?.object()
    }

    /// Like [`AmlContext::lookup`], but only returns data objects.
    #[must_use]
    pub fn lookup_data(&self, path: &str) -> Option<&TermObj> {
        self.lookup(path).filter(|object| object.is_data_object())
    }

    /// Devices under `\_SB` with their decoded hardware ids.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceInfo> {
        self.namespace.devices()
    }

    /// Visits every bound object at and below `root` in pre-order.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::InvalidData`] if `root` is not a valid absolute
    /// path.
    pub fn walk(
        &self,
        root: &str,
        mut visit: impl FnMut(&AmlName, &TermObj),
    ) -> Result<(), AmlError> {
        let root: AmlName = root.parse()?;
        if !root.is_absolute() {
            return Err(AmlError::InvalidData("walk root must be an absolute path"));
        }
        self.namespace.walk(&root, |path, node| {
            if let Some(object) = node.object() {
                visit(path, object);
            }
        });
        Ok(())
    }

    /// Writes one line per bound object.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn dump_objects(&self, out: &mut impl fmt::Write) -> fmt::Result {
        self.namespace.dump_objects(out)
    }

    /// Writes one line per device followed by a count.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn dump_devices(&self, out: &mut impl fmt::Write) -> fmt::Result {
        self.namespace.dump_devices(out)
    }

    /// Decodes every method body still held as raw bytes.
    ///
    /// Meant for contexts using [`MethodBodies::Deferred`]: once every table
    /// is loaded, all methods are known and call sites resolve regardless of
    /// definition order. Methods defined inside decoded bodies are picked up
    /// in later rounds. A body that fails to decode is logged and left
    /// deferred.
    ///
    /// Returns the number of bodies decoded.
    pub fn parse_deferred_methods(&mut self) -> usize {
        let mut failed: Vec<AmlName> = Vec::new();
        let mut decoded = 0;

        loop {
            let mut pending = Vec::new();
            self.namespace.walk(&AmlName::root(), |path, node| {
                if let Some(TermObj::Method(Method {
                    body: MethodBody::Deferred(code),
                    ..
                })) = node.object()
                {
                    if !failed.contains(path) {
                        pending.push((path.clone(), code.clone()));
                    }
                }
            });
            if pending.is_empty() {
                break;
            }

            for (path, code) in pending {
                let result = Parser::new(&code, path.clone(), &mut self.namespace, &self.config)
                    .parse_term_list();
                match result {
                    Ok(body) => {
                        if let Some(TermObj::Method(method)) = self.namespace.object_mut(&path) {
                            method.body = MethodBody::Parsed(body);
                        }
                        decoded += 1;
                    }
                    Err(err) => {
                        log::warn!("ACPI: leaving body of {path} undecoded: {err}");
                        failed.push(path);
                    }
                }
            }
        }

        log::info!("ACPI: decoded {decoded} deferred method bodies");
        decoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::{cat, pkg};
    use crate::table::tests::make_table;
    use alloc::string::String;
    use alloc::vec;

    const NAME: u8 = 0x08;
    const SCOPE: u8 = 0x10;
    const METHOD: u8 = 0x14;
    const DEVICE: [u8; 2] = [0x5B, 0x82];

    fn name(s: &str) -> AmlName {
        s.parse().unwrap()
    }

    /// `Scope(\_SB) { Device(PCI0) { Name(_HID, EisaId("PNP0A03")) } }`
    fn pci_root() -> Vec<u8> {
        let hid = cat(&[&[NAME], b"_HID", &[0x0C, 0x41, 0xD0, 0x0A, 0x03]]);
        let device = pkg(&DEVICE, &cat(&[b"PCI0", &hid]));
        pkg(&[SCOPE], &cat(&[b"\\_SB_", &device]))
    }

    #[test]
    fn empty_buffer_is_end_of_stream() {
        let mut context = AmlContext::new();
        assert_eq!(context.decode(&[]), Err(AmlError::EndOfStream));
    }

    #[test]
    fn predefined_objects() {
        let context = AmlContext::with_config(DecoderConfig::default().with_os_name("Hadron"));
        assert_eq!(
            context.lookup_data("\\_OS"),
            Some(&TermObj::String("Hadron".into()))
        );
        assert_eq!(context.lookup_data("\\_REV"), Some(&TermObj::Revision));
        assert!(matches!(context.lookup("\\_GL"), Some(TermObj::Mutex { .. })));
        assert!(context.lookup_data("\\_GL").is_none());
        assert!(context.lookup("\\_OSI").is_some_and(TermObj::is_method));
    }

    #[test]
    fn load_table_enumerates_devices() {
        let mut context = AmlContext::new();
        context.load_table(&make_table(b"DSDT", &pci_root())).unwrap();

        assert_eq!(
            context.devices(),
            [DeviceInfo {
                path: name("\\_SB.PCI0"),
                hid: Some("PNP0A03".into()),
            }]
        );

        let mut out = String::new();
        context.dump_devices(&mut out).unwrap();
        assert_eq!(out, "\\_SB.PCI0\t[PNP0A03]\nHave 1 devices\n");
    }

    #[test]
    fn load_table_rejects_bad_checksum() {
        let mut table = make_table(b"DSDT", &pci_root());
        table[9] = table[9].wrapping_add(1);
        let mut context = AmlContext::new();
        assert_eq!(
            context.load_table(&table),
            Err(AmlError::Table(TableError::InvalidChecksum))
        );
    }

    #[test]
    fn tables_share_one_namespace() {
        // DSDT: Method(\GETV, 0) { Return(0x2A) }
        let dsdt = pkg(&[METHOD], &cat(&[b"GETV", &[0x00, 0xA4, 0x0A, 0x2A]]));
        let mut context = AmlContext::new();
        context.load_table(&make_table(b"DSDT", &dsdt)).unwrap();

        // SSDT: Method(USEV, 0) { Store(GETV(), Local0) }
        let body = cat(&[b"USEV", &[0x00, 0x70], b"GETV", &[0x60]]);
        let ssdt = pkg(&[METHOD], &body);
        context.load_table(&make_table(b"SSDT", &ssdt)).unwrap();
        let Some(TermObj::Method(method)) = context.lookup("\\USEV") else {
            panic!("USEV not bound");
        };
        assert_eq!(
            method.body,
            MethodBody::Parsed(vec![TermObj::Store {
                value: alloc::boxed::Box::new(TermObj::MethodInvocation {
                    method: name("\\GETV"),
                    args: Vec::new(),
                }),
                target: alloc::boxed::Box::new(TermObj::Local(0)),
            }])
        );
    }

    #[test]
    fn lookup_and_walk() {
        let mut context = AmlContext::new();
        context.decode(&pci_root()).unwrap();

        assert_eq!(
            context.lookup_data("\\_SB.PCI0._HID"),
            Some(&TermObj::DWordConst(0x030A_D041))
        );
        assert!(context.lookup("\\_SB.PCI1").is_none());
        assert!(context.lookup("not a path").is_none());

        let mut seen = Vec::new();
        context
            .walk("\\_SB", |path, object| {
                seen.push((path.as_string(), object.kind_name()));
            })
            .unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "\\_SB.PCI0");
        assert_eq!(seen[1].0, "\\_SB.PCI0._HID");

        assert!(matches!(
            context.walk("_SB", |_, _| {}),
            Err(AmlError::InvalidData(_))
        ));
    }

    #[test]
    fn dump_objects_lists_bound_paths() {
        let mut context = AmlContext::new();
        context.decode(&pci_root()).unwrap();
        let mut out = String::new();
        context.dump_objects(&mut out).unwrap();
        assert!(out.lines().all(|line| line.starts_with("ACPI: \\")));
        assert!(out.contains("\\_SB.PCI0._HID"));
        assert!(out.contains("\\_OSI"));
    }

    #[test]
    fn deferred_bodies_resolve_forward_calls() {
        // Method(CALR, 0) { CALE } followed by Method(CALE, 0) {}
        let caller = pkg(&[METHOD], &cat(&[b"CALR", &[0x00], b"CALE"]));
        let callee = pkg(&[METHOD], &cat(&[b"CALE", &[0x00]]));
        let aml = cat(&[&caller, &callee]);

        let mut eager = AmlContext::new();
        assert_eq!(
            eager.decode(&aml),
            Err(AmlError::InvalidMethod("CALE".into()))
        );

        let mut context =
            AmlContext::with_config(DecoderConfig::default().with_method_bodies(MethodBodies::Deferred));
        context.decode(&aml).unwrap();
        assert_eq!(context.parse_deferred_methods(), 2);

        let Some(TermObj::Method(method)) = context.lookup("\\CALR") else {
            panic!("CALR not bound");
        };
        assert_eq!(
            method.body,
            MethodBody::Parsed(vec![TermObj::MethodInvocation {
                method: name("\\CALE"),
                args: Vec::new(),
            }])
        );
        assert_eq!(context.parse_deferred_methods(), 0);
    }

    #[test]
    fn deferred_nested_methods_are_decoded_in_later_rounds() {
        // Method(OUTR, 0) { Method(INNR, 0) { Noop } }
        let inner = pkg(&[METHOD], &cat(&[b"INNR", &[0x00, 0xA3]]));
        let outer = pkg(&[METHOD], &cat(&[b"OUTR", &[0x00], &inner]));
        let mut context =
            AmlContext::with_config(DecoderConfig::default().with_method_bodies(MethodBodies::Deferred));
        context.decode(&outer).unwrap();

        assert_eq!(context.parse_deferred_methods(), 2);
        let Some(TermObj::Method(method)) = context.lookup("\\OUTR.INNR") else {
            panic!("INNR not bound");
        };
        assert_eq!(method.body, MethodBody::Parsed(vec![TermObj::Noop]));
    }

    #[test]
    fn failing_deferred_bodies_are_skipped() {
        let bad = pkg(&[METHOD], &cat(&[b"BAD_", &[0x00], b"NOPE"]));
        let mut context =
            AmlContext::with_config(DecoderConfig::default().with_method_bodies(MethodBodies::Deferred));
        context.decode(&bad).unwrap();

        assert_eq!(context.parse_deferred_methods(), 0);
        assert!(matches!(
            context.lookup("\\BAD"),
            Some(TermObj::Method(Method {
                body: MethodBody::Deferred(_),
                ..
            }))
        ));
    }

    #[test]
    fn redefinitions_are_recorded() {
        let def = cat(&[&[NAME], b"DUP_", &[0x01]]);
        let mut context = AmlContext::new();
        context.decode(&def).unwrap();
        context.decode(&cat(&[&[NAME], b"DUP_", &[0x00]])).unwrap();
        assert_eq!(context.redefinitions(), &[name("\\DUP")]);
        assert_eq!(context.lookup_data("\\DUP"), Some(&TermObj::Zero));
    }
}
