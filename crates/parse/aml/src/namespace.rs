//! The ACPI namespace tree.
//!
//! Every named object decoded from a table is bound to a [`Node`] reached
//! by an absolute [`AmlName`]. The tree is populated while the grammar
//! engine is still running, because deciding whether a bare name is a
//! method call depends on what has already been defined.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::config::{DecoderConfig, RedefinitionPolicy};
use crate::eisa::EisaId;
use crate::error::AmlError;
use crate::name::{AmlName, NameSeg};
use crate::object::{Method, MethodBody, MethodFlags, TermObj};

/// Name of the root node when rendered on its own.
const ROOT_SEG: NameSeg = NameSeg(*b"\\___");

/// A single node in the namespace.
#[derive(Debug, Clone)]
pub struct Node {
    name: NameSeg,
    object: Option<TermObj>,
    children: Vec<Node>,
}

impl Node {
    fn new(name: NameSeg, object: Option<TermObj>) -> Self {
        Self {
            name,
            object,
            children: Vec::new(),
        }
    }

    /// Local name of this node.
    #[must_use]
    pub fn name(&self) -> NameSeg {
        self.name
    }

    /// The object bound here, if any.
    #[must_use]
    pub fn object(&self) -> Option<&TermObj> {
        self.object.as_ref()
    }

    /// Child nodes in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Finds the child named `seg`.
    #[must_use]
    pub fn child(&self, seg: NameSeg) -> Option<&Node> {
        self.children.iter().find(|c| c.name == seg)
    }

    fn child_mut(&mut self, seg: NameSeg) -> Option<&mut Node> {
        self.children.iter_mut().find(|c| c.name == seg)
    }

    fn child_or_insert(&mut self, seg: NameSeg) -> &mut Node {
        let index = match self.children.iter().position(|c| c.name == seg) {
            Some(index) => index,
            None => {
                self.children.push(Node::new(seg, None));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Decoded `_HID`, falling back to `_CID`, from the immediate children.
    #[must_use]
    pub fn hardware_id(&self) -> Option<String> {
        self.children
            .iter()
            .filter(|c| c.name == NameSeg::HID || c.name == NameSeg::CID)
            .find_map(|c| c.object.as_ref().and_then(id_string))
    }
}

/// Renders an id object: integers as EISA ids, strings verbatim, packages
/// by their first decodable element.
fn id_string(object: &TermObj) -> Option<String> {
    match object {
        TermObj::String(s) => Some(s.clone()),
        TermObj::Package { elements, .. } => elements.iter().find_map(id_string),
        other => other
            .as_integer()
            .and_then(|v| u32::try_from(v).ok())
            .map(|v| format!("{}", EisaId(v))),
    }
}

/// A device found under `\_SB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Absolute path of the device.
    pub path: AmlName,
    /// Decoded `_HID` or `_CID`.
    pub hid: Option<String>,
}

/// The namespace tree rooted at `\`.
#[derive(Debug, Clone)]
pub struct Namespace {
    root: Node,
    policy: RedefinitionPolicy,
    redefinitions: Vec<AmlName>,
}

impl Namespace {
    /// Creates a namespace holding the predefined root objects `_OSI`,
    /// `_GL`, `_REV` and `_OS`.
    #[must_use]
    pub fn new(config: &DecoderConfig) -> Self {
        let mut root = Node::new(ROOT_SEG, None);
        let osi = TermObj::Method(Method {
            name: AmlName::absolute(&[NameSeg::OSI]),
            flags: MethodFlags::from_bits_retain(1),
            body: MethodBody::Builtin,
        });
        let gl = TermObj::Mutex {
            name: AmlName::absolute(&[NameSeg::GL]),
            sync_level: 0,
        };
        root.children.push(Node::new(NameSeg::OSI, Some(osi)));
        root.children.push(Node::new(NameSeg::GL, Some(gl)));
        root.children.push(Node::new(NameSeg::REV, Some(TermObj::Revision)));
        root.children.push(Node::new(
            NameSeg::OS,
            Some(TermObj::String(config.os_name.clone())),
        ));

        Self {
            root,
            policy: config.redefinition,
            redefinitions: Vec::new(),
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Paths that were defined more than once, in encounter order.
    #[must_use]
    pub fn redefinitions(&self) -> &[AmlName] {
        &self.redefinitions
    }

    /// Binds `object` at the absolute `path`, creating intermediate nodes.
    ///
    /// An `External` placeholder is replaced without comment, and an
    /// `External` never displaces a real definition. Any other existing
    /// binding is recorded as a redefinition and handled by the
    /// [`RedefinitionPolicy`].
    ///
    /// Returns `true` if `object` is now bound at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AmlError::InvalidData`] if `path` is relative or empty, and
    /// [`AmlError::DuplicateName`] for a redefinition under
    /// [`RedefinitionPolicy::Reject`].
    pub fn insert(&mut self, path: &AmlName, object: TermObj) -> Result<bool, AmlError> {
        if !path.is_absolute() || path.segments().is_empty() {
            return Err(AmlError::InvalidData("namespace insert needs an absolute path"));
        }

        let mut node = &mut self.root;
        for &seg in path.segments() {
            node = node.child_or_insert(seg);
        }

        match &node.object {
            None | Some(TermObj::External { .. }) => {}
            Some(_) if matches!(object, TermObj::External { .. }) => return Ok(false),
            Some(_) => {
                log::warn!("ACPI: {path} redefined");
                self.redefinitions.push(path.clone());
                match self.policy {
                    RedefinitionPolicy::Replace => {}
                    RedefinitionPolicy::KeepExisting => return Ok(false),
                    RedefinitionPolicy::Reject => {
                        return Err(AmlError::DuplicateName(path.as_string()));
                    }
                }
            }
        }

        log::debug!("ACPI: added {path} ({})", object.kind_name());
        node.object = Some(object);
        Ok(true)
    }

    /// Exact lookup of an absolute path. Relative paths find nothing.
    #[must_use]
    pub fn lookup(&self, path: &AmlName) -> Option<&Node> {
        if !path.is_absolute() {
            return None;
        }
        path.segments()
            .iter()
            .try_fold(&self.root, |node, &seg| node.child(seg))
    }

    /// Mutable access to the object bound at an absolute path.
    pub fn object_mut(&mut self, path: &AmlName) -> Option<&mut TermObj> {
        if !path.is_absolute() {
            return None;
        }
        let mut node = &mut self.root;
        for &seg in path.segments() {
            node = node.child_mut(seg)?;
        }
        node.object.as_mut()
    }

    /// Finds `name` from `scope` using the ACPI search rule.
    ///
    /// The name is first resolved against `scope`. If no node exists there
    /// and `name` is a single unqualified segment, the scope is shortened one
    /// trailing segment at a time down to the root and the lookup retried.
    /// Returns the absolute path found along with its node.
    #[must_use]
    pub fn search(&self, scope: &AmlName, name: &AmlName) -> Option<(AmlName, &Node)> {
        let path = name.resolve(scope).ok()?;
        if let Some(node) = self.lookup(&path) {
            return Some((path, node));
        }
        let seg = name.last_seg().filter(|_| name.is_name_seg())?;

        let mut outer = scope.clone();
        while outer.pop().is_some() {
            let candidate = outer.join(seg);
            if let Some(node) = self.lookup(&candidate) {
                return Some((candidate, node));
            }
        }
        None
    }

    /// Visits every node at and below `root` in pre-order.
    pub fn walk(&self, root: &AmlName, mut visit: impl FnMut(&AmlName, &Node)) {
        if let Some(node) = self.lookup(root) {
            let mut path = root.clone();
            walk_node(node, &mut path, &mut visit);
        }
    }

    /// Devices under `\_SB`, in tree order.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceInfo> {
        let mut devices = Vec::new();
        self.walk(&AmlName::absolute(&[NameSeg::SB]), |path, node| {
            if matches!(node.object, Some(TermObj::Device { .. })) {
                devices.push(DeviceInfo {
                    path: path.clone(),
                    hid: node.hardware_id(),
                });
            }
        });
        devices
    }

    /// Writes one line per bound object.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn dump_objects(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let mut result = Ok(());
        self.walk(&AmlName::root(), |path, node| {
            if let Some(object) = &node.object {
                if result.is_ok() {
                    result = writeln!(out, "ACPI: {path} ({})", object.kind_name());
                }
            }
        });
        result
    }

    /// Writes one line per device followed by a count.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn dump_devices(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let devices = self.devices();
        for device in &devices {
            writeln!(
                out,
                "{}\t[{}]",
                device.path,
                device.hid.as_deref().unwrap_or("-")
            )?;
        }
        writeln!(out, "Have {} devices", devices.len())
    }
}

fn walk_node<F: FnMut(&AmlName, &Node)>(node: &Node, path: &mut AmlName, visit: &mut F) {
    visit(path, node);
    for child in &node.children {
        path.push(child.name);
        walk_node(child, path, visit);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;

    fn name(s: &str) -> AmlName {
        s.parse().unwrap()
    }

    fn namespace() -> Namespace {
        Namespace::new(&DecoderConfig::default())
    }

    fn device(path: &str) -> TermObj {
        TermObj::Device {
            name: name(path),
            body: Vec::new(),
        }
    }

    #[test]
    fn predefined_objects() {
        let ns = namespace();
        let osi = ns.lookup(&name("\\_OSI")).unwrap().object().unwrap();
        assert_eq!(osi.method_arg_count(), Some(1));
        assert!(matches!(
            ns.lookup(&name("\\_GL")).unwrap().object(),
            Some(TermObj::Mutex { .. })
        ));
        assert_eq!(
            ns.lookup(&name("\\_REV")).unwrap().object(),
            Some(&TermObj::Revision)
        );
        assert_eq!(
            ns.lookup(&name("\\_OS")).unwrap().object().unwrap().as_str(),
            Some("Microsoft Windows NT")
        );
    }

    #[test]
    fn insert_then_lookup() {
        let mut ns = namespace();
        assert!(ns.insert(&name("\\_SB.PCI0.FOO"), TermObj::One).unwrap());
        assert_eq!(
            ns.lookup(&name("\\_SB.PCI0.FOO")).unwrap().object(),
            Some(&TermObj::One)
        );
        // Intermediate nodes exist but are unbound.
        assert!(ns.lookup(&name("\\_SB.PCI0")).unwrap().object().is_none());
        assert!(ns.lookup(&name("\\_SB.PCI0.BAR")).is_none());
        assert!(ns.lookup(&name("\\_SB.PCI1")).is_none());
        assert!(ns.lookup(&name("_SB.PCI0.FOO")).is_none());
        assert!(ns.lookup(&AmlName::root()).is_some());
    }

    #[test]
    fn insert_rejects_relative_and_empty_paths() {
        let mut ns = namespace();
        assert!(matches!(ns.insert(&name("FOO"), TermObj::One), Err(AmlError::InvalidData(_))));
        assert!(matches!(ns.insert(&AmlName::root(), TermObj::One), Err(AmlError::InvalidData(_))));
    }

    #[test]
    fn redefinition_policies() {
        let path = name("\\FOO");

        let mut ns = namespace();
        ns.insert(&path, TermObj::One).unwrap();
        assert!(ns.insert(&path, TermObj::Zero).unwrap());
        assert_eq!(ns.lookup(&path).unwrap().object(), Some(&TermObj::Zero));
        assert_eq!(ns.redefinitions(), &[path.clone()]);

        let config = DecoderConfig::default().with_redefinition(RedefinitionPolicy::KeepExisting);
        let mut ns = Namespace::new(&config);
        ns.insert(&path, TermObj::One).unwrap();
        assert!(!ns.insert(&path, TermObj::Zero).unwrap());
        assert_eq!(ns.lookup(&path).unwrap().object(), Some(&TermObj::One));
        assert_eq!(ns.redefinitions().len(), 1);

        let config = DecoderConfig::default().with_redefinition(RedefinitionPolicy::Reject);
        let mut ns = Namespace::new(&config);
        ns.insert(&path, TermObj::One).unwrap();
        assert_eq!(
            ns.insert(&path, TermObj::Zero),
            Err(AmlError::DuplicateName("\\FOO".into()))
        );
    }

    #[test]
    fn external_placeholders_are_replaced_silently() {
        let config = DecoderConfig::default().with_redefinition(RedefinitionPolicy::Reject);
        let mut ns = Namespace::new(&config);
        let path = name("\\EXT");
        let external = TermObj::External {
            name: path.clone(),
            object_type: 8,
            arg_count: 0,
        };
        ns.insert(&path, external.clone()).unwrap();
        assert!(ns.insert(&path, TermObj::One).unwrap());
        assert!(!ns.insert(&path, external).unwrap());
        assert_eq!(ns.lookup(&path).unwrap().object(), Some(&TermObj::One));
        assert!(ns.redefinitions().is_empty());
    }

    #[test]
    fn search_prefers_the_nearest_scope() {
        let mut ns = namespace();
        ns.insert(&name("\\A.B.X"), TermObj::One).unwrap();
        ns.insert(&name("\\A.X"), TermObj::Zero).unwrap();
        ns.insert(&name("\\X"), TermObj::Ones).unwrap();

        let (path, node) = ns.search(&name("\\A.B.C"), &name("X")).unwrap();
        assert_eq!(path, name("\\A.B.X"));
        assert_eq!(node.object(), Some(&TermObj::One));
    }

    #[test]
    fn search_walks_out_to_root() {
        let mut ns = namespace();
        ns.insert(&name("\\X"), TermObj::One).unwrap();
        let (path, _) = ns.search(&name("\\A.B.C"), &name("X")).unwrap();
        assert_eq!(path, name("\\X"));
    }

    #[test]
    fn search_does_not_walk_for_qualified_names() {
        let mut ns = namespace();
        ns.insert(&name("\\A.X"), TermObj::One).unwrap();
        assert!(ns.search(&name("\\A.B"), &name("^X")).is_some());
        assert!(ns.search(&name("\\A.B"), &name("B.X")).is_none());
        assert!(ns.search(&name("\\A"), &name("^^X")).is_none());
    }

    #[test]
    fn walk_is_pre_order() {
        let mut ns = namespace();
        ns.insert(&name("\\A.B"), TermObj::One).unwrap();
        ns.insert(&name("\\A.C"), TermObj::One).unwrap();
        ns.insert(&name("\\D"), TermObj::One).unwrap();

        let mut seen = Vec::new();
        ns.walk(&name("\\A"), |path, _| seen.push(path.as_string()));
        assert_eq!(seen, ["\\A", "\\A.B", "\\A.C"]);

        let mut count = 0;
        ns.walk(&name("\\MISSING"), |_, _| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn devices_decode_hardware_ids() {
        let mut ns = namespace();
        ns.insert(&name("\\_SB.PCI0"), device("\\_SB.PCI0")).unwrap();
        ns.insert(&name("\\_SB.PCI0._HID"), TermObj::DWordConst(0x030A_D041)).unwrap();
        ns.insert(&name("\\_SB.PCI0.EC0"), device("\\_SB.PCI0.EC0")).unwrap();
        ns.insert(&name("\\_SB.PCI0.EC0._CID"), TermObj::String("ACPI0001".into()))
            .unwrap();
        ns.insert(&name("\\_SB.LNKA"), device("\\_SB.LNKA")).unwrap();
        ns.insert(
            &name("\\_SB.LNKA._CID"),
            TermObj::Package {
                num_elements: 1,
                elements: alloc::vec![TermObj::DWordConst(0x0F0C_D041)],
            },
        )
        .unwrap();
        ns.insert(&name("\\_SB.NOID"), device("\\_SB.NOID")).unwrap();
        // Devices outside \_SB are not enumerated.
        ns.insert(&name("\\_TZ.FAN0"), device("\\_TZ.FAN0")).unwrap();

        let devices = ns.devices();
        let summary: Vec<(String, Option<&str>)> = devices
            .iter()
            .map(|d| (d.path.as_string(), d.hid.as_deref()))
            .collect();
        assert_eq!(
            summary,
            alloc::vec![
                (String::from("\\_SB.PCI0"), Some("PNP0A03")),
                (String::from("\\_SB.PCI0.EC0"), Some("ACPI0001")),
                (String::from("\\_SB.LNKA"), Some("PNP0C0F")),
                (String::from("\\_SB.NOID"), None),
            ]
        );
    }

    #[test]
    fn dumps() {
        let mut ns = namespace();
        ns.insert(&name("\\_SB.PCI0"), device("\\_SB.PCI0")).unwrap();
        ns.insert(
            &name("\\_SB.PCI0._HID"),
            TermObj::DefName {
                name: name("\\_SB.PCI0._HID"),
                value: Box::new(TermObj::One),
            },
        )
        .unwrap();

        let mut out = String::new();
        ns.dump_devices(&mut out).unwrap();
        assert_eq!(out, "\\_SB.PCI0\t[-]\nHave 1 devices\n");

        let mut out = String::new();
        ns.dump_objects(&mut out).unwrap();
        assert!(out.starts_with("ACPI: \\_OSI (Method)\n"));
        assert!(out.contains("ACPI: \\_SB.PCI0 (Device)\n"));
    }
}
