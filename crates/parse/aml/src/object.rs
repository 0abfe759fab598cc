//! Decoded AML objects.
//!
//! Every construct the grammar engine understands decodes to one
//! [`TermObj`]. The grammar positions an object may occupy (TermObj,
//! TermArg, SuperName, ...) are exposed as predicates rather than as
//! separate types.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::error::AmlError;
use crate::name::AmlName;

/// A decoded AML construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermObj {
    // ─── Data objects ──────────────────────────────────────────────────
    /// `ZeroOp`.
    Zero,
    /// `OneOp`.
    One,
    /// `OnesOp`.
    Ones,
    /// `RevisionOp`, the interpreter revision.
    Revision,
    /// `ByteConst`.
    ByteConst(u8),
    /// `WordConst`.
    WordConst(u16),
    /// `DWordConst`.
    DWordConst(u32),
    /// `QWordConst`.
    QWordConst(u64),
    /// `String`, without its terminator.
    String(String),
    /// `DefBuffer`.
    Buffer {
        /// Declared buffer size (a TermArg).
        size: Box<TermObj>,
        /// Initializer bytes; may be shorter than `size`.
        data: Vec<u8>,
    },
    /// `DefPackage`.
    Package {
        /// Declared element count.
        num_elements: u8,
        /// Decoded elements.
        elements: Vec<TermObj>,
    },

    // ─── References ────────────────────────────────────────────────────
    /// A name reference that is not a method invocation.
    Name(AmlName),
    /// `NullName` in a target position.
    NullName,
    /// `Local0`-`Local7`.
    Local(u8),
    /// `Arg0`-`Arg6`.
    Arg(u8),
    /// `DebugOp`.
    Debug,
    /// A call to a method already bound in the namespace.
    MethodInvocation {
        /// Absolute path of the invoked method.
        method: AmlName,
        /// Exactly `arg_count` arguments.
        args: Vec<TermObj>,
    },

    // ─── Named objects and namespace modifiers ────────────────────────
    /// `DefAlias`.
    Alias {
        /// Existing object.
        source: AmlName,
        /// New name for it.
        alias: AmlName,
    },
    /// `DefName`.
    DefName {
        /// Absolute path of the new name.
        name: AmlName,
        /// The bound data object.
        value: Box<TermObj>,
    },
    /// `DefScope`.
    Scope {
        /// Absolute path of the scope.
        name: AmlName,
        /// Terms decoded inside the scope.
        body: Vec<TermObj>,
    },
    /// `DefDevice`.
    Device {
        /// Absolute path of the device.
        name: AmlName,
        /// Terms decoded inside the device.
        body: Vec<TermObj>,
    },
    /// `DefMethod`.
    Method(Method),
    /// `DefMutex`.
    Mutex {
        /// Absolute path of the mutex.
        name: AmlName,
        /// Sync level (bits 0-3 of the flags byte).
        sync_level: u8,
    },
    /// `DefEvent`.
    Event {
        /// Absolute path of the event.
        name: AmlName,
    },
    /// `DefOpRegion`.
    OpRegion {
        /// Absolute path of the region.
        name: AmlName,
        /// Address space.
        space: RegionSpace,
        /// Region offset (a TermArg).
        offset: Box<TermObj>,
        /// Region length (a TermArg).
        length: Box<TermObj>,
    },
    /// `DefField` or `DefIndexField`.
    Field(Field),
    /// A named element of a field list.
    NamedField(NamedField),
    /// `DefProcessor`.
    Processor {
        /// Absolute path of the processor.
        name: AmlName,
        /// Processor id.
        proc_id: u8,
        /// Processor block address.
        pblk_addr: u32,
        /// Processor block length.
        pblk_len: u8,
        /// Terms decoded inside the processor scope.
        body: Vec<TermObj>,
    },
    /// `DefExternal`.
    External {
        /// Absolute path of the declared object.
        name: AmlName,
        /// ACPI object type code (8 is a method).
        object_type: u8,
        /// Argument count for method declarations.
        arg_count: u8,
    },
    /// `DefCreateBitField` .. `DefCreateField`.
    CreateField {
        /// Width of the created field.
        kind: CreateFieldKind,
        /// Source buffer (a TermArg).
        source: Box<TermObj>,
        /// Bit or byte index (a TermArg).
        index: Box<TermObj>,
        /// Bit count, for [`CreateFieldKind::Bits`] only.
        num_bits: Option<Box<TermObj>>,
        /// Absolute path of the created field.
        name: AmlName,
    },
    /// `DefDataRegion`.
    DataRegion {
        /// Absolute path of the region.
        name: AmlName,
        /// Table signature (a TermArg).
        signature: Box<TermObj>,
        /// OEM id (a TermArg).
        oem_id: Box<TermObj>,
        /// OEM table id (a TermArg).
        oem_table_id: Box<TermObj>,
    },

    // ─── Type 1 statements ─────────────────────────────────────────────
    /// `DefBreak`.
    Break,
    /// `DefBreakPoint`.
    BreakPoint,
    /// `DefContinue`.
    Continue,
    /// `DefNoop`.
    Noop,
    /// `DefIfElse`.
    If {
        /// Predicate (a TermArg).
        predicate: Box<TermObj>,
        /// Terms run when the predicate holds.
        body: Vec<TermObj>,
        /// The directly following `Else` block, if any.
        else_body: Option<Vec<TermObj>>,
    },
    /// An `Else` block not preceded by an `If`.
    Else(Vec<TermObj>),
    /// `DefWhile`.
    While {
        /// Predicate (a TermArg).
        predicate: Box<TermObj>,
        /// Loop body.
        body: Vec<TermObj>,
    },
    /// `DefFatal`.
    Fatal {
        /// Fatal type byte.
        fatal_type: u8,
        /// Fatal code.
        code: u32,
        /// Fatal argument (a TermArg).
        arg: Box<TermObj>,
    },
    /// `DefLoad`.
    Load {
        /// Region or field holding the table.
        name: AmlName,
        /// Where the DDB handle is stored.
        ddb_handle: Box<TermObj>,
    },
    /// `DefNotify`.
    Notify {
        /// Notified object.
        object: Box<TermObj>,
        /// Notification value.
        value: Box<TermObj>,
    },
    /// `DefRelease`.
    Release(Box<TermObj>),
    /// `DefReset`.
    Reset(Box<TermObj>),
    /// `DefSignal`.
    Signal(Box<TermObj>),
    /// `DefUnload`.
    Unload(Box<TermObj>),
    /// `DefReturn`.
    Return(Box<TermObj>),
    /// `DefSleep`, in milliseconds.
    Sleep(Box<TermObj>),
    /// `DefStall`, in microseconds.
    Stall(Box<TermObj>),

    // ─── Type 2 expressions ────────────────────────────────────────────
    /// `DefAcquire`.
    Acquire {
        /// The mutex.
        mutex: Box<TermObj>,
        /// Timeout in milliseconds (`0xFFFF` waits forever).
        timeout: u16,
    },
    /// Two-operand arithmetic and bitwise operators with a target.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        operand1: Box<TermObj>,
        /// Right operand.
        operand2: Box<TermObj>,
        /// Result target.
        target: Box<TermObj>,
    },
    /// Two-operand logical comparisons.
    Logical {
        /// Operator.
        op: LogicalOp,
        /// Left operand.
        operand1: Box<TermObj>,
        /// Right operand.
        operand2: Box<TermObj>,
    },
    /// `DefLNot`.
    LNot(Box<TermObj>),
    /// Single-operand conversions with a target.
    Convert {
        /// Operator.
        op: ConvertOp,
        /// Operand.
        operand: Box<TermObj>,
        /// Result target.
        target: Box<TermObj>,
    },
    /// `DefDivide`.
    Divide {
        /// Dividend.
        dividend: Box<TermObj>,
        /// Divisor.
        divisor: Box<TermObj>,
        /// Remainder target.
        remainder: Box<TermObj>,
        /// Quotient target.
        quotient: Box<TermObj>,
    },
    /// `DefIndex`.
    Index {
        /// Buffer, package or string.
        source: Box<TermObj>,
        /// Element index.
        index: Box<TermObj>,
        /// Result target.
        target: Box<TermObj>,
    },
    /// `DefMid`.
    Mid {
        /// Buffer or string.
        source: Box<TermObj>,
        /// Start index.
        index: Box<TermObj>,
        /// Length.
        length: Box<TermObj>,
        /// Result target.
        target: Box<TermObj>,
    },
    /// `DefToString`.
    ToString {
        /// Source buffer.
        source: Box<TermObj>,
        /// Maximum length.
        length: Box<TermObj>,
        /// Result target.
        target: Box<TermObj>,
    },
    /// `DefCondRefOf`.
    CondRefOf {
        /// Referenced object.
        source: Box<TermObj>,
        /// Result target.
        target: Box<TermObj>,
    },
    /// `DefCopyObject`.
    CopyObject {
        /// Copied value.
        source: Box<TermObj>,
        /// Destination (a SimpleName).
        target: Box<TermObj>,
    },
    /// `DefDerefOf`.
    DerefOf(Box<TermObj>),
    /// `DefRefOf`.
    RefOf(Box<TermObj>),
    /// `DefSizeOf`.
    SizeOf(Box<TermObj>),
    /// `DefObjectType`.
    ObjectType(Box<TermObj>),
    /// `DefIncrement`.
    Increment(Box<TermObj>),
    /// `DefDecrement`.
    Decrement(Box<TermObj>),
    /// `DefStore`.
    Store {
        /// Stored value.
        value: Box<TermObj>,
        /// Destination.
        target: Box<TermObj>,
    },
    /// `DefWait`.
    Wait {
        /// The event.
        event: Box<TermObj>,
        /// Timeout (a TermArg).
        timeout: Box<TermObj>,
    },
    /// `DefTimer`.
    Timer,
}

impl TermObj {
    /// Returns `true` for DataObject variants (constants, strings, buffers,
    /// packages).
    #[must_use]
    pub fn is_data_object(&self) -> bool {
        matches!(
            self,
            Self::Zero
                | Self::One
                | Self::Ones
                | Self::Revision
                | Self::ByteConst(_)
                | Self::WordConst(_)
                | Self::DWordConst(_)
                | Self::QWordConst(_)
                | Self::String(_)
                | Self::Buffer { .. }
                | Self::Package { .. }
        )
    }

    /// Returns `true` for SimpleName variants: a name, an `ArgN` or a
    /// `LocalN`.
    #[must_use]
    pub fn is_simple_name(&self) -> bool {
        matches!(self, Self::Name(_) | Self::Arg(_) | Self::Local(_))
    }

    /// Returns `true` for SuperName variants: a SimpleName, the debug
    /// object, or a reference-producing expression.
    #[must_use]
    pub fn is_super_name(&self) -> bool {
        self.is_simple_name()
            || matches!(
                self,
                Self::Debug
                    | Self::RefOf(_)
                    | Self::DerefOf(_)
                    | Self::Index { .. }
                    | Self::MethodInvocation { .. }
            )
    }

    /// Returns `true` for Target variants: a SuperName or the null name.
    #[must_use]
    pub fn is_target(&self) -> bool {
        matches!(self, Self::NullName) || self.is_super_name()
    }

    /// Returns `true` for Type 2 expressions (value-producing opcodes and
    /// method invocations).
    #[must_use]
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            Self::Acquire { .. }
                | Self::Binary { .. }
                | Self::Logical { .. }
                | Self::LNot(_)
                | Self::Convert { .. }
                | Self::Divide { .. }
                | Self::Index { .. }
                | Self::Mid { .. }
                | Self::ToString { .. }
                | Self::CondRefOf { .. }
                | Self::CopyObject { .. }
                | Self::DerefOf(_)
                | Self::RefOf(_)
                | Self::SizeOf(_)
                | Self::ObjectType(_)
                | Self::Increment(_)
                | Self::Decrement(_)
                | Self::Store { .. }
                | Self::Wait { .. }
                | Self::Timer
                | Self::MethodInvocation { .. }
        )
    }

    /// Returns `true` for TermArg variants: expressions, data objects, and
    /// argument, local or name references.
    #[must_use]
    pub fn is_term_arg(&self) -> bool {
        self.is_expression() || self.is_data_object() || self.is_simple_name()
    }

    /// Returns `true` for Type 1 statements.
    #[must_use]
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Self::Break
                | Self::BreakPoint
                | Self::Continue
                | Self::Noop
                | Self::If { .. }
                | Self::Else(_)
                | Self::While { .. }
                | Self::Fatal { .. }
                | Self::Load { .. }
                | Self::Notify { .. }
                | Self::Release(_)
                | Self::Reset(_)
                | Self::Signal(_)
                | Self::Unload(_)
                | Self::Return(_)
                | Self::Sleep(_)
                | Self::Stall(_)
        )
    }

    /// Returns `true` for named objects and namespace modifiers.
    #[must_use]
    pub fn is_named_object(&self) -> bool {
        matches!(
            self,
            Self::Alias { .. }
                | Self::DefName { .. }
                | Self::Scope { .. }
                | Self::Device { .. }
                | Self::Method(_)
                | Self::Mutex { .. }
                | Self::Event { .. }
                | Self::OpRegion { .. }
                | Self::Field(_)
                | Self::NamedField(_)
                | Self::Processor { .. }
                | Self::External { .. }
                | Self::CreateField { .. }
                | Self::DataRegion { .. }
        )
    }

    /// Returns `true` for anything allowed in a TermList.
    #[must_use]
    pub fn is_term_obj(&self) -> bool {
        self.is_named_object() || self.is_statement() || self.is_expression()
    }

    /// Returns `true` for a method, or an `External` declaration of one.
    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
            || matches!(self, Self::External { object_type, .. } if *object_type == EXTERNAL_METHOD)
    }

    /// The number of arguments an invocation of this object takes, if it is
    /// invocable.
    #[must_use]
    pub fn method_arg_count(&self) -> Option<u8> {
        match self {
            Self::Method(method) => Some(method.flags.arg_count()),
            Self::External {
                object_type,
                arg_count,
                ..
            } if *object_type == EXTERNAL_METHOD => Some(*arg_count),
            _ => None,
        }
    }

    /// The value of an integer constant.
    #[must_use]
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Zero => Some(0),
            Self::One => Some(1),
            Self::Ones => Some(u64::MAX),
            Self::ByteConst(v) => Some(u64::from(*v)),
            Self::WordConst(v) => Some(u64::from(*v)),
            Self::DWordConst(v) => Some(u64::from(*v)),
            Self::QWordConst(v) => Some(*v),
            _ => None,
        }
    }

    /// The contents of a string constant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Short human-readable kind, used by the diagnostic dumps.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Zero
            | Self::One
            | Self::Ones
            | Self::Revision
            | Self::ByteConst(_)
            | Self::WordConst(_)
            | Self::DWordConst(_)
            | Self::QWordConst(_) => "Integer",
            Self::String(_) => "String",
            Self::Buffer { .. } => "Buffer",
            Self::Package { .. } => "Package",
            Self::Alias { .. } => "Alias",
            Self::DefName { .. } => "Name",
            Self::Scope { .. } => "Scope",
            Self::Device { .. } => "Device",
            Self::Method(_) => "Method",
            Self::Mutex { .. } => "Mutex",
            Self::Event { .. } => "Event",
            Self::OpRegion { .. } => "OperationRegion",
            Self::Field(_) => "Field",
            Self::NamedField(_) => "FieldUnit",
            Self::Processor { .. } => "Processor",
            Self::External { .. } => "External",
            Self::CreateField { .. } => "BufferField",
            Self::DataRegion { .. } => "DataRegion",
            _ if self.is_statement() => "Statement",
            _ if self.is_expression() => "Expression",
            _ => "Reference",
        }
    }
}

/// ACPI object type code of a method in `DefExternal`.
pub const EXTERNAL_METHOD: u8 = 8;

// ─── Methods ──────────────────────────────────────────────────────────────

bitflags! {
    /// `MethodFlags` byte of a `DefMethod`.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodFlags: u8 {
        /// Argument count mask (bits 0-2).
        const ARG_COUNT = 0x07;
        /// The method is serialized.
        const SERIALIZED = 0x08;
        /// Sync level mask (bits 4-7).
        const SYNC_LEVEL = 0xF0;
    }
}

impl MethodFlags {
    /// Number of arguments the method takes (0-7).
    #[must_use]
    pub fn arg_count(self) -> u8 {
        self.bits() & Self::ARG_COUNT.bits()
    }

    /// Returns `true` if the method is serialized.
    #[must_use]
    pub fn serialized(self) -> bool {
        self.contains(Self::SERIALIZED)
    }

    /// Sync level of a serialized method.
    #[must_use]
    pub fn sync_level(self) -> u8 {
        self.bits() >> 4
    }
}

/// A control method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Absolute path of the method.
    pub name: AmlName,
    /// Decoded flags byte.
    pub flags: MethodFlags,
    /// Method body.
    pub body: MethodBody,
}

/// The body of a [`Method`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodBody {
    /// Decoded term list.
    Parsed(Vec<TermObj>),
    /// Raw bytecode awaiting a later decode pass.
    Deferred(Vec<u8>),
    /// Implemented by the host rather than by bytecode (e.g. `_OSI`).
    Builtin,
}

// ─── Fields ───────────────────────────────────────────────────────────────

/// Access width of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    /// Any width.
    Any,
    /// 8-bit.
    Byte,
    /// 16-bit.
    Word,
    /// 32-bit.
    DWord,
    /// 64-bit.
    QWord,
    /// Buffer access.
    Buffer,
}

impl TryFrom<u8> for AccessType {
    type Error = AmlError;

    /// Decodes bits 0-3.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value & 0x0F {
            0 => Ok(Self::Any),
            1 => Ok(Self::Byte),
            2 => Ok(Self::Word),
            3 => Ok(Self::DWord),
            4 => Ok(Self::QWord),
            5 => Ok(Self::Buffer),
            _ => Err(AmlError::InvalidData("invalid field access type")),
        }
    }
}

/// What happens to bits a field write does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRule {
    /// Read-modify-write.
    Preserve,
    /// Fill with ones.
    WriteAsOnes,
    /// Fill with zeros.
    WriteAsZeros,
}

/// Decoded `FieldFlags` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFlags {
    /// Access width (bits 0-3).
    pub access_type: AccessType,
    /// Global lock required (bit 4).
    pub lock: bool,
    /// Update rule (bits 5-6).
    pub update_rule: UpdateRule,
}

impl TryFrom<u8> for FieldFlags {
    type Error = AmlError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let update_rule = match (value >> 5) & 0x03 {
            0 => UpdateRule::Preserve,
            1 => UpdateRule::WriteAsOnes,
            2 => UpdateRule::WriteAsZeros,
            _ => return Err(AmlError::InvalidData("invalid field update rule")),
        };
        Ok(Self {
            access_type: AccessType::try_from(value)?,
            lock: value & 0x10 != 0,
            update_rule,
        })
    }
}

/// Where the units of a field list live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// `DefField`: an operation region.
    Region(AmlName),
    /// `DefIndexField`: an index/data register pair.
    Index {
        /// Index register.
        index: AmlName,
        /// Data register.
        data: AmlName,
    },
}

/// A `DefField` or `DefIndexField`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Region or register pair.
    pub source: FieldSource,
    /// Field flags.
    pub flags: FieldFlags,
    /// Field list in declaration order.
    pub elements: Vec<FieldElement>,
}

/// One entry of a field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldElement {
    /// Skipped bits.
    Reserved {
        /// Number of bits skipped.
        bits: usize,
    },
    /// Changes the access type for the following units.
    Access {
        /// New access width.
        access_type: AccessType,
        /// Access attribute byte.
        attrib: u8,
    },
    /// A named field unit.
    Named(NamedField),
}

/// A named field unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedField {
    /// Absolute path of the unit.
    pub name: AmlName,
    /// Offset from the start of the field, in bits.
    pub bit_offset: usize,
    /// Width in bits.
    pub bit_width: usize,
    /// Region or register pair of the enclosing field.
    pub source: FieldSource,
    /// Flags in effect for this unit.
    pub flags: FieldFlags,
}

// ─── Regions ──────────────────────────────────────────────────────────────

/// Address space of an operation region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSpace {
    /// System memory.
    SystemMemory,
    /// System I/O ports.
    SystemIo,
    /// PCI configuration space.
    PciConfig,
    /// Embedded controller.
    EmbeddedControl,
    /// SMBus.
    SmBus,
    /// CMOS.
    SystemCmos,
    /// PCI BAR target.
    PciBarTarget,
    /// IPMI.
    Ipmi,
    /// General purpose I/O.
    GeneralPurposeIo,
    /// Generic serial bus.
    GenericSerialBus,
    /// Platform communications channel.
    Pcc,
    /// OEM-defined space (`0x80`-`0xFF`).
    Oem(u8),
}

impl TryFrom<u8> for RegionSpace {
    type Error = AmlError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => Self::SystemMemory,
            0x01 => Self::SystemIo,
            0x02 => Self::PciConfig,
            0x03 => Self::EmbeddedControl,
            0x04 => Self::SmBus,
            0x05 => Self::SystemCmos,
            0x06 => Self::PciBarTarget,
            0x07 => Self::Ipmi,
            0x08 => Self::GeneralPurposeIo,
            0x09 => Self::GenericSerialBus,
            0x0A => Self::Pcc,
            0x80..=0xFF => Self::Oem(value),
            _ => return Err(AmlError::InvalidData("invalid region space")),
        })
    }
}

/// Width of a `CreateXField` buffer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateFieldKind {
    /// `CreateBitField`.
    Bit,
    /// `CreateByteField`.
    Byte,
    /// `CreateWordField`.
    Word,
    /// `CreateDWordField`.
    DWord,
    /// `CreateQWordField`.
    QWord,
    /// `CreateField`, with an explicit bit count.
    Bits,
}

// ─── Operators ────────────────────────────────────────────────────────────

/// Operators of [`TermObj::Binary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `Add`.
    Add,
    /// `And`.
    And,
    /// `Concatenate`.
    Concat,
    /// `ConcatenateResTemplate`.
    ConcatRes,
    /// `Multiply`.
    Multiply,
    /// `NAnd`.
    NAnd,
    /// `NOr`.
    NOr,
    /// `Or`.
    Or,
    /// `ShiftLeft`.
    ShiftLeft,
    /// `ShiftRight`.
    ShiftRight,
    /// `Subtract`.
    Subtract,
    /// `Xor`.
    Xor,
}

/// Operators of [`TermObj::Logical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `LAnd`.
    LAnd,
    /// `LEqual`.
    LEqual,
    /// `LGreater`.
    LGreater,
    /// `LGreaterEqual` (encoded as `LNot LLess`).
    LGreaterEqual,
    /// `LLess`.
    LLess,
    /// `LLessEqual` (encoded as `LNot LGreater`).
    LLessEqual,
    /// `LNotEqual` (encoded as `LNot LEqual`).
    LNotEqual,
    /// `LOr`.
    LOr,
}

/// Operators of [`TermObj::Convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertOp {
    /// `FindSetLeftBit`.
    FindSetLeftBit,
    /// `FindSetRightBit`.
    FindSetRightBit,
    /// `FromBCD`.
    FromBcd,
    /// `ToBCD`.
    ToBcd,
    /// `ToBuffer`.
    ToBuffer,
    /// `ToDecimalString`.
    ToDecimalString,
    /// `ToHexString`.
    ToHexString,
    /// `ToInteger`.
    ToInteger,
    /// `Not`.
    Not,
}
