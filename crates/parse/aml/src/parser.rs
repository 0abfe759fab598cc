//! Recursive-descent AML decoder.
//!
//! A [`Parser`] owns a [`Cursor`] and the current scope, and borrows the
//! namespace mutably. PkgLength-delimited constructs are decoded by a child
//! parser over a bounded cursor; the child gets its own copy of the scope, so
//! leaving a block restores the outer scope without any bookkeeping.
//!
//! Whether a bare name is a reference or a method call is decided against
//! the live namespace at the point the name is read. A method therefore has
//! to be defined before its first call site is decoded.
//!
//! Every opcode and method invocation counts as one nesting level, and child
//! parsers inherit the level of their parent. Input nested deeper than
//! [`DecoderConfig::max_depth`] is rejected.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::config::{DecoderConfig, MethodBodies};
use crate::cursor::Cursor;
use crate::error::AmlError;
use crate::name::{AmlName, NameSeg};
use crate::namespace::Namespace;
use crate::object::{
    AccessType, BinaryOp, ConvertOp, CreateFieldKind, EXTERNAL_METHOD, Field, FieldElement,
    FieldFlags, FieldSource, LogicalOp, Method, MethodBody, MethodFlags, NamedField, RegionSpace,
    TermObj,
};
use crate::opcode::{NameChar, Opcode, Symbol, is_lead_name_char, next_symbol};

/// Decoder state for one byte range.
pub struct Parser<'a, 'ns> {
    cursor: Cursor<'a>,
    scope: AmlName,
    namespace: &'ns mut Namespace,
    config: &'ns DecoderConfig,
    depth: usize,
}

impl<'a, 'ns> Parser<'a, 'ns> {
    /// Creates a parser over `data` with `scope` as the current scope.
    #[must_use]
    pub fn new(
        data: &'a [u8],
        scope: AmlName,
        namespace: &'ns mut Namespace,
        config: &'ns DecoderConfig,
    ) -> Self {
        Self {
            cursor: Cursor::new(data),
            scope,
            namespace,
            config,
            depth: 0,
        }
    }

    /// Decodes TermObjs until the byte range is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates the first decoding failure unchanged.
    pub fn parse_term_list(&mut self) -> Result<Vec<TermObj>, AmlError> {
        let mut terms = Vec::new();
        while let Some(symbol) = next_symbol(&mut self.cursor)? {
            terms.push(self.parse_term_obj(symbol)?);
        }
        Ok(terms)
    }

    // ─── Blocks ────────────────────────────────────────────────────────

    /// Reads a PkgLength and returns a child parser over the block it
    /// delimits. The parent is advanced past the block.
    fn block(&mut self) -> Result<Parser<'a, '_>, AmlError> {
        let start = self.cursor.position();
        let pkg_length = self.cursor.pkg_length()?;
        let encoding = self.cursor.position() - start;
        let body_length = pkg_length
            .checked_sub(encoding)
            .ok_or(AmlError::InvalidLength)?;
        let cursor = self.cursor.bounded(body_length)?;
        Ok(Parser {
            cursor,
            scope: self.scope.clone(),
            namespace: &mut *self.namespace,
            config: self.config,
            depth: self.depth,
        })
    }

    /// Checks that a block was fully consumed.
    fn finish(&self) -> Result<(), AmlError> {
        if self.config.exact_block_length && !self.cursor.is_empty() {
            log::debug!(
                "ACPI: {} unread bytes at the end of a block in {}",
                self.cursor.remaining(),
                self.scope
            );
            return Err(AmlError::InvalidLength);
        }
        Ok(())
    }

    fn define(&mut self, path: &AmlName, object: TermObj) -> Result<bool, AmlError> {
        self.namespace.insert(path, object)
    }

    /// Overwrites an object bound earlier by `define`, once its body has
    /// been decoded.
    fn complete(&mut self, path: &AmlName, object: &TermObj) {
        if let Some(slot) = self.namespace.object_mut(path) {
            *slot = object.clone();
        }
    }

    /// Enters one nesting level. Pair with `leave`.
    fn enter(&mut self) -> Result<(), AmlError> {
        if self.depth >= self.config.max_depth {
            log::warn!(
                "ACPI: nesting deeper than {} levels in {}",
                self.config.max_depth,
                self.scope
            );
            return Err(AmlError::InvalidData("AML nesting too deep"));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expect_symbol(&mut self) -> Result<Symbol, AmlError> {
        next_symbol(&mut self.cursor)?.ok_or(AmlError::EndOfStream)
    }

    // ─── Names ─────────────────────────────────────────────────────────

    fn parse_name_string(&mut self) -> Result<AmlName, AmlError> {
        let first = self.cursor.next_byte()?;
        self.name_string_after(first)
    }

    /// Decodes a NameString whose first byte has already been consumed.
    fn name_string_after(&mut self, first: u8) -> Result<AmlName, AmlError> {
        let mut byte = first;
        let mut root = false;
        let mut parent_prefixes = 0;

        if byte == b'\\' {
            root = true;
            byte = self.cursor.next_byte()?;
        } else {
            while byte == b'^' {
                parent_prefixes += 1;
                byte = self.cursor.next_byte()?;
            }
        }

        let segments = match NameChar::classify(byte) {
            Some(NameChar::Null) => Vec::new(),
            Some(NameChar::DualNamePrefix) => vec![self.name_seg()?, self.name_seg()?],
            Some(NameChar::MultiNamePrefix) => {
                let count = self.cursor.next_byte()?;
                if count == 0 {
                    return Err(AmlError::InvalidData("MultiNamePath with zero segments"));
                }
                (0..count)
                    .map(|_| self.name_seg())
                    .collect::<Result<Vec<_>, _>>()?
            }
            Some(NameChar::Lead) => vec![self.name_seg_after(byte)?],
            _ => return Err(AmlError::InvalidSymbol("expected a name path")),
        };
        Ok(AmlName::new(root, parent_prefixes, segments))
    }

    fn name_seg(&mut self) -> Result<NameSeg, AmlError> {
        let lead = self.cursor.next_byte()?;
        self.name_seg_after(lead)
    }

    fn name_seg_after(&mut self, lead: u8) -> Result<NameSeg, AmlError> {
        let bytes = [
            lead,
            self.cursor.next_byte()?,
            self.cursor.next_byte()?,
            self.cursor.next_byte()?,
        ];
        NameSeg::new(bytes)
    }

    /// Absolute path for a name being defined in the current scope.
    fn definition_path(&mut self) -> Result<AmlName, AmlError> {
        self.parse_name_string()?.resolve(&self.scope)
    }

    /// Absolute path of a referenced name: the search result if the name is
    /// already known, otherwise the name resolved against the scope.
    fn reference_path(&self, name: &AmlName) -> Result<AmlName, AmlError> {
        match self.namespace.search(&self.scope, name) {
            Some((path, _)) => Ok(path),
            None => name.resolve(&self.scope),
        }
    }

    /// The path and argument count of an invocable name, if it is one.
    fn find_method(&self, name: &AmlName) -> Option<(AmlName, u8)> {
        let (path, node) = self.namespace.search(&self.scope, name)?;
        let arg_count = node.object()?.method_arg_count()?;
        Some((path, arg_count))
    }

    fn parse_invocation(&mut self, method: AmlName, arg_count: u8) -> Result<TermObj, AmlError> {
        self.enter()?;
        let result = self.invocation_args(method, arg_count);
        self.leave();
        result
    }

    fn invocation_args(&mut self, method: AmlName, arg_count: u8) -> Result<TermObj, AmlError> {
        let mut args = Vec::with_capacity(usize::from(arg_count));
        for _ in 0..arg_count {
            if self.cursor.is_empty() {
                return Err(AmlError::InvalidMethod(method.as_string()));
            }
            args.push(self.parse_term_arg()?);
        }
        log::trace!("ACPI: call {method} with {} args", args.len());
        Ok(TermObj::MethodInvocation { method, args })
    }

    // ─── Grammar positions ─────────────────────────────────────────────

    fn parse_term_obj(&mut self, symbol: Symbol) -> Result<TermObj, AmlError> {
        if symbol.name_start().is_some() {
            let name = self.name_string_after(symbol.byte)?;
            return match self.find_method(&name) {
                Some((path, arg_count)) => self.parse_invocation(path, arg_count),
                None => Err(AmlError::InvalidMethod(name.as_string())),
            };
        }
        let object = self.parse_opcode(symbol)?;
        if object.is_term_obj() {
            Ok(object)
        } else {
            Err(AmlError::InvalidSymbol("expected a TermObj"))
        }
    }

    fn parse_term_arg(&mut self) -> Result<TermObj, AmlError> {
        let symbol = self.expect_symbol()?;
        if symbol.name_start().is_some() {
            let name = self.name_string_after(symbol.byte)?;
            return match self.find_method(&name) {
                Some((path, arg_count)) => self.parse_invocation(path, arg_count),
                None => Ok(TermObj::Name(self.reference_path(&name)?)),
            };
        }
        let object = self.parse_opcode(symbol)?;
        if object.is_term_arg() {
            Ok(object)
        } else {
            Err(AmlError::InvalidSymbol("expected a TermArg"))
        }
    }

    fn parse_simple_name(&mut self) -> Result<TermObj, AmlError> {
        let symbol = self.expect_symbol()?;
        if symbol.name_start().is_some() {
            let name = self.name_string_after(symbol.byte)?;
            return Ok(TermObj::Name(self.reference_path(&name)?));
        }
        symbol
            .opcode
            .and_then(local_or_arg)
            .ok_or(AmlError::InvalidSymbol("expected a SimpleName"))
    }

    fn parse_super_name(&mut self) -> Result<TermObj, AmlError> {
        let mark = self.cursor.mark();
        if let Ok(name) = self.parse_simple_name() {
            return Ok(name);
        }
        self.cursor.reset(mark);

        let symbol = self.expect_symbol()?;
        let object = self.parse_opcode(symbol)?;
        if object.is_super_name() {
            Ok(object)
        } else {
            Err(AmlError::InvalidSymbol("expected a SuperName"))
        }
    }

    fn parse_target(&mut self) -> Result<TermObj, AmlError> {
        if self.cursor.peek() == Some(0x00) {
            self.cursor.next_byte()?;
            return Ok(TermObj::NullName);
        }
        self.parse_super_name()
    }

    /// DataRefObject or a name, as found in `DefName` and package elements.
    fn parse_data_ref_object(&mut self) -> Result<TermObj, AmlError> {
        let symbol = self.expect_symbol()?;
        if symbol.name_start().is_some() {
            let name = self.name_string_after(symbol.byte)?;
            return Ok(TermObj::Name(self.reference_path(&name)?));
        }
        let object = self.parse_opcode(symbol)?;
        if object.is_data_object() {
            Ok(object)
        } else {
            Err(AmlError::InvalidSymbol("expected a data object"))
        }
    }

    fn boxed_term_arg(&mut self) -> Result<Box<TermObj>, AmlError> {
        self.parse_term_arg().map(Box::new)
    }

    fn boxed_super_name(&mut self) -> Result<Box<TermObj>, AmlError> {
        self.parse_super_name().map(Box::new)
    }

    fn boxed_target(&mut self) -> Result<Box<TermObj>, AmlError> {
        self.parse_target().map(Box::new)
    }

    // ─── Dispatch ──────────────────────────────────────────────────────

    fn parse_opcode(&mut self, symbol: Symbol) -> Result<TermObj, AmlError> {
        let opcode = symbol
            .opcode
            .ok_or(AmlError::InvalidSymbol("expected an opcode"))?;
        self.enter()?;
        let result = self.dispatch(opcode);
        self.leave();
        result
    }

    fn dispatch(&mut self, opcode: Opcode) -> Result<TermObj, AmlError> {
        log::trace!("ACPI: {opcode:?} in {}", self.scope);

        if let Some(object) = local_or_arg(opcode) {
            return Ok(object);
        }

        match opcode {
            Opcode::Zero => Ok(TermObj::Zero),
            Opcode::One => Ok(TermObj::One),
            Opcode::Ones => Ok(TermObj::Ones),
            Opcode::Revision => Ok(TermObj::Revision),
            Opcode::BytePrefix => Ok(TermObj::ByteConst(self.cursor.next_byte()?)),
            Opcode::WordPrefix => Ok(TermObj::WordConst(self.cursor.next_word()?)),
            Opcode::DWordPrefix => Ok(TermObj::DWordConst(self.cursor.next_dword()?)),
            Opcode::QWordPrefix => Ok(TermObj::QWordConst(self.cursor.next_qword()?)),
            Opcode::StringPrefix => Ok(TermObj::String(self.parse_string()?)),
            Opcode::Buffer => self.parse_buffer(),
            Opcode::Package => self.parse_package(),
            Opcode::Debug => Ok(TermObj::Debug),

            Opcode::Alias => self.parse_alias(),
            Opcode::Name => self.parse_def_name(),
            Opcode::Scope => self.parse_scope(),
            Opcode::Method => self.parse_method(),
            Opcode::External => self.parse_external(),
            Opcode::Device => self.parse_device(),
            Opcode::Processor => self.parse_processor(),
            Opcode::Mutex => self.parse_mutex(),
            Opcode::Event => {
                let name = self.definition_path()?;
                let object = TermObj::Event { name: name.clone() };
                self.define(&name, object.clone())?;
                Ok(object)
            }
            Opcode::OpRegion => self.parse_op_region(),
            Opcode::Field => self.parse_field(),
            Opcode::IndexField => self.parse_index_field(),
            Opcode::DataRegion => self.parse_data_region(),
            Opcode::CreateBitField => self.parse_create_field(CreateFieldKind::Bit),
            Opcode::CreateByteField => self.parse_create_field(CreateFieldKind::Byte),
            Opcode::CreateWordField => self.parse_create_field(CreateFieldKind::Word),
            Opcode::CreateDWordField => self.parse_create_field(CreateFieldKind::DWord),
            Opcode::CreateQWordField => self.parse_create_field(CreateFieldKind::QWord),
            Opcode::CreateField => self.parse_create_field(CreateFieldKind::Bits),

            Opcode::Break => Ok(TermObj::Break),
            Opcode::BreakPoint => Ok(TermObj::BreakPoint),
            Opcode::Continue => Ok(TermObj::Continue),
            Opcode::Noop => Ok(TermObj::Noop),
            Opcode::If => self.parse_if(),
            Opcode::Else => Ok(TermObj::Else(self.parse_else_body()?)),
            Opcode::While => self.parse_while(),
            Opcode::Fatal
            | Opcode::Load
            | Opcode::Notify
            | Opcode::Release
            | Opcode::Reset
            | Opcode::Signal
            | Opcode::Unload
            | Opcode::Return
            | Opcode::Sleep
            | Opcode::Stall => self.parse_statement(opcode),

            Opcode::Add => self.parse_binary(BinaryOp::Add),
            Opcode::And => self.parse_binary(BinaryOp::And),
            Opcode::Concat => self.parse_binary(BinaryOp::Concat),
            Opcode::ConcatRes => self.parse_binary(BinaryOp::ConcatRes),
            Opcode::Multiply => self.parse_binary(BinaryOp::Multiply),
            Opcode::NAnd => self.parse_binary(BinaryOp::NAnd),
            Opcode::NOr => self.parse_binary(BinaryOp::NOr),
            Opcode::Or => self.parse_binary(BinaryOp::Or),
            Opcode::ShiftLeft => self.parse_binary(BinaryOp::ShiftLeft),
            Opcode::ShiftRight => self.parse_binary(BinaryOp::ShiftRight),
            Opcode::Subtract => self.parse_binary(BinaryOp::Subtract),
            Opcode::Xor => self.parse_binary(BinaryOp::Xor),
            Opcode::LAnd => self.parse_logical(LogicalOp::LAnd),
            Opcode::LOr => self.parse_logical(LogicalOp::LOr),
            Opcode::LEqual => self.parse_logical(LogicalOp::LEqual),
            Opcode::LGreater => self.parse_logical(LogicalOp::LGreater),
            Opcode::LLess => self.parse_logical(LogicalOp::LLess),
            Opcode::LNot => self.parse_lnot(),
            Opcode::FindSetLeftBit => self.parse_convert(ConvertOp::FindSetLeftBit),
            Opcode::FindSetRightBit => self.parse_convert(ConvertOp::FindSetRightBit),
            Opcode::FromBcd => self.parse_convert(ConvertOp::FromBcd),
            Opcode::ToBcd => self.parse_convert(ConvertOp::ToBcd),
            Opcode::ToBuffer => self.parse_convert(ConvertOp::ToBuffer),
            Opcode::ToDecimalString => self.parse_convert(ConvertOp::ToDecimalString),
            Opcode::ToHexString => self.parse_convert(ConvertOp::ToHexString),
            Opcode::ToInteger => self.parse_convert(ConvertOp::ToInteger),
            Opcode::Not => self.parse_convert(ConvertOp::Not),
            Opcode::Acquire
            | Opcode::Divide
            | Opcode::Index
            | Opcode::Mid
            | Opcode::ToString
            | Opcode::CondRefOf
            | Opcode::CopyObject
            | Opcode::DerefOf
            | Opcode::RefOf
            | Opcode::SizeOf
            | Opcode::ObjectType
            | Opcode::Increment
            | Opcode::Decrement
            | Opcode::Store
            | Opcode::Wait => self.parse_object_op(opcode),
            Opcode::Timer => Ok(TermObj::Timer),

            Opcode::BankField => Err(AmlError::Unimplemented("BankField")),
            Opcode::Match => Err(AmlError::Unimplemented("Match")),
            Opcode::Mod => Err(AmlError::Unimplemented("Mod")),
            Opcode::LoadTable => Err(AmlError::Unimplemented("LoadTable")),
            Opcode::VarPackage => Err(AmlError::Unimplemented("VarPackage")),
            Opcode::PowerRes => Err(AmlError::Unimplemented("PowerResource")),
            Opcode::ThermalZone => Err(AmlError::Unimplemented("ThermalZone")),

            // Local0-7 and Arg0-6 were handled above.
            _ => Err(AmlError::InvalidOpcode(opcode.raw())),
        }
    }

    /// Statements with fixed operand lists.
    #[inline(never)]
    fn parse_statement(&mut self, opcode: Opcode) -> Result<TermObj, AmlError> {
        match opcode {
            Opcode::Fatal => Ok(TermObj::Fatal {
                fatal_type: self.cursor.next_byte()?,
                code: self.cursor.next_dword()?,
                arg: self.boxed_term_arg()?,
            }),
            Opcode::Load => {
                let name = self.parse_name_string()?;
                Ok(TermObj::Load {
                    name: self.reference_path(&name)?,
                    ddb_handle: self.boxed_super_name()?,
                })
            }
            Opcode::Notify => Ok(TermObj::Notify {
                object: self.boxed_super_name()?,
                value: self.boxed_term_arg()?,
            }),
            Opcode::Release => Ok(TermObj::Release(self.boxed_super_name()?)),
            Opcode::Reset => Ok(TermObj::Reset(self.boxed_super_name()?)),
            Opcode::Signal => Ok(TermObj::Signal(self.boxed_super_name()?)),
            Opcode::Unload => Ok(TermObj::Unload(self.boxed_super_name()?)),
            Opcode::Return => Ok(TermObj::Return(self.boxed_term_arg()?)),
            Opcode::Sleep => Ok(TermObj::Sleep(self.boxed_term_arg()?)),
            Opcode::Stall => Ok(TermObj::Stall(self.boxed_term_arg()?)),
            _ => Err(AmlError::InvalidOpcode(opcode.raw())),
        }
    }

    /// Expressions over object references and multiple targets.
    #[inline(never)]
    fn parse_object_op(&mut self, opcode: Opcode) -> Result<TermObj, AmlError> {
        match opcode {
            Opcode::Acquire => Ok(TermObj::Acquire {
                mutex: self.boxed_super_name()?,
                timeout: self.cursor.next_word()?,
            }),
            Opcode::Divide => Ok(TermObj::Divide {
                dividend: self.boxed_term_arg()?,
                divisor: self.boxed_term_arg()?,
                remainder: self.boxed_target()?,
                quotient: self.boxed_target()?,
            }),
            Opcode::Index => Ok(TermObj::Index {
                source: self.boxed_term_arg()?,
                index: self.boxed_term_arg()?,
                target: self.boxed_target()?,
            }),
            Opcode::Mid => Ok(TermObj::Mid {
                source: self.boxed_term_arg()?,
                index: self.boxed_term_arg()?,
                length: self.boxed_term_arg()?,
                target: self.boxed_target()?,
            }),
            Opcode::ToString => Ok(TermObj::ToString {
                source: self.boxed_term_arg()?,
                length: self.boxed_term_arg()?,
                target: self.boxed_target()?,
            }),
            Opcode::CondRefOf => Ok(TermObj::CondRefOf {
                source: self.boxed_super_name()?,
                target: self.boxed_target()?,
            }),
            Opcode::CopyObject => Ok(TermObj::CopyObject {
                source: self.boxed_term_arg()?,
                target: Box::new(self.parse_simple_name()?),
            }),
            Opcode::DerefOf => Ok(TermObj::DerefOf(self.boxed_term_arg()?)),
            Opcode::RefOf => Ok(TermObj::RefOf(self.boxed_super_name()?)),
            Opcode::SizeOf => Ok(TermObj::SizeOf(self.boxed_super_name()?)),
            Opcode::ObjectType => Ok(TermObj::ObjectType(self.boxed_super_name()?)),
            Opcode::Increment => Ok(TermObj::Increment(self.boxed_super_name()?)),
            Opcode::Decrement => Ok(TermObj::Decrement(self.boxed_super_name()?)),
            Opcode::Store => Ok(TermObj::Store {
                value: self.boxed_term_arg()?,
                target: self.boxed_super_name()?,
            }),
            Opcode::Wait => Ok(TermObj::Wait {
                event: self.boxed_super_name()?,
                timeout: self.boxed_term_arg()?,
            }),
            _ => Err(AmlError::InvalidOpcode(opcode.raw())),
        }
    }

    // ─── Data objects ──────────────────────────────────────────────────

    fn parse_string(&mut self) -> Result<String, AmlError> {
        let mut text = String::new();
        loop {
            match self.cursor.next_byte()? {
                0x00 => return Ok(text),
                byte @ 0x01..=0x7F => text.push(char::from(byte)),
                _ => return Err(AmlError::InvalidData("string byte outside 0x01-0x7F")),
            }
        }
    }

    #[inline(never)]
    fn parse_buffer(&mut self) -> Result<TermObj, AmlError> {
        let mut block = self.block()?;
        let size = block.boxed_term_arg()?;
        let data = block.cursor.rest().to_vec();
        Ok(TermObj::Buffer { size, data })
    }

    #[inline(never)]
    fn parse_package(&mut self) -> Result<TermObj, AmlError> {
        let mut block = self.block()?;
        let num_elements = block.cursor.next_byte()?;
        let mut elements = Vec::with_capacity(usize::from(num_elements));
        for _ in 0..num_elements {
            if block.cursor.is_empty() {
                if block.config.allow_short_packages {
                    break;
                }
                return Err(AmlError::EndOfStream);
            }
            elements.push(block.parse_data_ref_object()?);
        }
        block.finish()?;
        Ok(TermObj::Package {
            num_elements,
            elements,
        })
    }

    // ─── Named objects ─────────────────────────────────────────────────

    fn parse_alias(&mut self) -> Result<TermObj, AmlError> {
        let source = self.parse_name_string()?;
        let source = self.reference_path(&source)?;
        let alias = self.definition_path()?;
        let object = TermObj::Alias {
            source,
            alias: alias.clone(),
        };
        self.define(&alias, object.clone())?;
        Ok(object)
    }

    fn parse_def_name(&mut self) -> Result<TermObj, AmlError> {
        let name = self.definition_path()?;
        let value = self.parse_data_ref_object()?;
        self.define(&name, value.clone())?;
        Ok(TermObj::DefName {
            name,
            value: Box::new(value),
        })
    }

    #[inline(never)]
    fn parse_scope(&mut self) -> Result<TermObj, AmlError> {
        let mut block = self.block()?;
        let name = block.definition_path()?;
        block.scope = name.clone();
        let body = block.parse_term_list()?;
        block.finish()?;
        Ok(TermObj::Scope { name, body })
    }

    #[inline(never)]
    fn parse_device(&mut self) -> Result<TermObj, AmlError> {
        let mut block = self.block()?;
        let name = block.definition_path()?;
        // Bound with an empty body first so the body can name the device.
        let bound = block.define(
            &name,
            TermObj::Device {
                name: name.clone(),
                body: Vec::new(),
            },
        )?;
        block.scope = name.clone();
        let body = block.parse_term_list()?;
        block.finish()?;
        let device = TermObj::Device {
            name: name.clone(),
            body,
        };
        if bound {
            block.complete(&name, &device);
        }
        Ok(device)
    }

    #[inline(never)]
    fn parse_processor(&mut self) -> Result<TermObj, AmlError> {
        let mut block = self.block()?;
        let name = block.definition_path()?;
        let proc_id = block.cursor.next_byte()?;
        let pblk_addr = block.cursor.next_dword()?;
        let pblk_len = block.cursor.next_byte()?;
        let bound = block.define(
            &name,
            TermObj::Processor {
                name: name.clone(),
                proc_id,
                pblk_addr,
                pblk_len,
                body: Vec::new(),
            },
        )?;
        block.scope = name.clone();
        let body = block.parse_term_list()?;
        block.finish()?;
        let processor = TermObj::Processor {
            name: name.clone(),
            proc_id,
            pblk_addr,
            pblk_len,
            body,
        };
        if bound {
            block.complete(&name, &processor);
        }
        Ok(processor)
    }

    #[inline(never)]
    fn parse_method(&mut self) -> Result<TermObj, AmlError> {
        let mut block = self.block()?;
        let name = block.definition_path()?;
        let flags = MethodFlags::from_bits_retain(block.cursor.next_byte()?);
        let code = block.cursor.rest();

        let initial = match block.config.method_bodies {
            MethodBodies::Deferred => MethodBody::Deferred(code.to_vec()),
            MethodBodies::Eager => MethodBody::Parsed(Vec::new()),
        };
        let mut method = Method {
            name: name.clone(),
            flags,
            body: initial,
        };
        // Registered before the body so recursive calls resolve.
        let bound = block.define(&name, TermObj::Method(method.clone()))?;

        if block.config.method_bodies == MethodBodies::Eager {
            let mut body = Parser::new(code, name.clone(), &mut *block.namespace, block.config);
            body.depth = block.depth;
            method.body = MethodBody::Parsed(body.parse_term_list()?);
            if bound {
                block.complete(&name, &TermObj::Method(method.clone()));
            }
        }
        Ok(TermObj::Method(method))
    }

    fn parse_external(&mut self) -> Result<TermObj, AmlError> {
        let name = self.definition_path()?;
        let object_type = self.cursor.next_byte()?;
        let arg_count = self.cursor.next_byte()?;
        let object = TermObj::External {
            name: name.clone(),
            object_type,
            arg_count,
        };
        let unbound = self
            .namespace
            .lookup(&name)
            .and_then(|node| node.object())
            .is_none();
        if object_type == EXTERNAL_METHOD && unbound {
            self.define(&name, object.clone())?;
        }
        Ok(object)
    }

    fn parse_mutex(&mut self) -> Result<TermObj, AmlError> {
        let name = self.definition_path()?;
        let sync_level = self.cursor.next_byte()? & 0x0F;
        let object = TermObj::Mutex {
            name: name.clone(),
            sync_level,
        };
        self.define(&name, object.clone())?;
        Ok(object)
    }

    #[inline(never)]
    fn parse_op_region(&mut self) -> Result<TermObj, AmlError> {
        let name = self.definition_path()?;
        let space = RegionSpace::try_from(self.cursor.next_byte()?)?;
        let object = TermObj::OpRegion {
            name: name.clone(),
            space,
            offset: self.boxed_term_arg()?,
            length: self.boxed_term_arg()?,
        };
        self.define(&name, object.clone())?;
        Ok(object)
    }

    #[inline(never)]
    fn parse_data_region(&mut self) -> Result<TermObj, AmlError> {
        let name = self.definition_path()?;
        let object = TermObj::DataRegion {
            name: name.clone(),
            signature: self.boxed_term_arg()?,
            oem_id: self.boxed_term_arg()?,
            oem_table_id: self.boxed_term_arg()?,
        };
        self.define(&name, object.clone())?;
        Ok(object)
    }

    #[inline(never)]
    fn parse_create_field(&mut self, kind: CreateFieldKind) -> Result<TermObj, AmlError> {
        let source = self.boxed_term_arg()?;
        let index = self.boxed_term_arg()?;
        let num_bits = match kind {
            CreateFieldKind::Bits => Some(self.boxed_term_arg()?),
            _ => None,
        };
        let name = self.definition_path()?;
        let object = TermObj::CreateField {
            kind,
            source,
            index,
            num_bits,
            name: name.clone(),
        };
        self.define(&name, object.clone())?;
        Ok(object)
    }

    // ─── Fields ────────────────────────────────────────────────────────

    #[inline(never)]
    fn parse_field(&mut self) -> Result<TermObj, AmlError> {
        let mut block = self.block()?;
        let region = block.parse_name_string()?;
        let source = FieldSource::Region(block.reference_path(&region)?);
        let flags = FieldFlags::try_from(block.cursor.next_byte()?)?;
        let elements = block.parse_field_list(&source, flags)?;
        Ok(TermObj::Field(Field {
            source,
            flags,
            elements,
        }))
    }

    #[inline(never)]
    fn parse_index_field(&mut self) -> Result<TermObj, AmlError> {
        let mut block = self.block()?;
        let index = block.parse_name_string()?;
        let index = block.reference_path(&index)?;
        let data = block.parse_name_string()?;
        let data = block.reference_path(&data)?;
        let source = FieldSource::Index { index, data };
        let flags = FieldFlags::try_from(block.cursor.next_byte()?)?;
        let elements = block.parse_field_list(&source, flags)?;
        Ok(TermObj::Field(Field {
            source,
            flags,
            elements,
        }))
    }

    /// Decodes a FieldList, registering each named unit in the current
    /// scope.
    fn parse_field_list(
        &mut self,
        source: &FieldSource,
        mut flags: FieldFlags,
    ) -> Result<Vec<FieldElement>, AmlError> {
        let mut bit_offset = 0;
        let mut elements = Vec::new();

        while let Some(byte) = self.cursor.peek() {
            match byte {
                0x00 => {
                    self.cursor.next_byte()?;
                    let bits = self.cursor.pkg_length()?;
                    bit_offset += bits;
                    elements.push(FieldElement::Reserved { bits });
                }
                0x01 => {
                    self.cursor.next_byte()?;
                    let access_type = AccessType::try_from(self.cursor.next_byte()?)?;
                    let attrib = self.cursor.next_byte()?;
                    flags.access_type = access_type;
                    elements.push(FieldElement::Access {
                        access_type,
                        attrib,
                    });
                }
                0x02 => return Err(AmlError::Unimplemented("ConnectField")),
                0x03 => return Err(AmlError::Unimplemented("ExtendedAccessField")),
                b if is_lead_name_char(b) => {
                    let seg = self.name_seg()?;
                    let bit_width = self.cursor.pkg_length()?;
                    let field = NamedField {
                        name: self.scope.join(seg),
                        bit_offset,
                        bit_width,
                        source: source.clone(),
                        flags,
                    };
                    self.define(&field.name, TermObj::NamedField(field.clone()))?;
                    bit_offset += bit_width;
                    elements.push(FieldElement::Named(field));
                }
                _ => return Err(AmlError::InvalidData("unexpected byte in field list")),
            }
        }
        Ok(elements)
    }

    // ─── Statements and expressions ───────────────────────────────────

    #[inline(never)]
    fn parse_if(&mut self) -> Result<TermObj, AmlError> {
        let (predicate, body) = {
            let mut block = self.block()?;
            let predicate = block.boxed_term_arg()?;
            let body = block.parse_term_list()?;
            block.finish()?;
            (predicate, body)
        };

        let else_body = if self.cursor.peek() == Some(ELSE_OP) {
            self.cursor.next_byte()?;
            Some(self.parse_else_body()?)
        } else {
            None
        };
        Ok(TermObj::If {
            predicate,
            body,
            else_body,
        })
    }

    fn parse_else_body(&mut self) -> Result<Vec<TermObj>, AmlError> {
        let mut block = self.block()?;
        let body = block.parse_term_list()?;
        block.finish()?;
        Ok(body)
    }

    #[inline(never)]
    fn parse_while(&mut self) -> Result<TermObj, AmlError> {
        let mut block = self.block()?;
        let predicate = block.boxed_term_arg()?;
        let body = block.parse_term_list()?;
        block.finish()?;
        Ok(TermObj::While { predicate, body })
    }

    fn parse_binary(&mut self, op: BinaryOp) -> Result<TermObj, AmlError> {
        Ok(TermObj::Binary {
            op,
            operand1: self.boxed_term_arg()?,
            operand2: self.boxed_term_arg()?,
            target: self.boxed_target()?,
        })
    }

    fn parse_logical(&mut self, op: LogicalOp) -> Result<TermObj, AmlError> {
        Ok(TermObj::Logical {
            op,
            operand1: self.boxed_term_arg()?,
            operand2: self.boxed_term_arg()?,
        })
    }

    /// `LNot` alone, or the two-opcode `LNotEqual`/`LLessEqual`/
    /// `LGreaterEqual` forms.
    fn parse_lnot(&mut self) -> Result<TermObj, AmlError> {
        let negated = match self.cursor.peek().map(u16::from).and_then(Opcode::from_raw) {
            Some(Opcode::LEqual) => Some(LogicalOp::LNotEqual),
            Some(Opcode::LGreater) => Some(LogicalOp::LLessEqual),
            Some(Opcode::LLess) => Some(LogicalOp::LGreaterEqual),
            _ => None,
        };
        match negated {
            Some(op) => {
                self.cursor.next_byte()?;
                self.parse_logical(op)
            }
            None => Ok(TermObj::LNot(self.boxed_term_arg()?)),
        }
    }

    fn parse_convert(&mut self, op: ConvertOp) -> Result<TermObj, AmlError> {
        Ok(TermObj::Convert {
            op,
            operand: self.boxed_term_arg()?,
            target: self.boxed_target()?,
        })
    }
}

/// Raw `ElseOp` byte.
const ELSE_OP: u8 = 0xA1;

/// `LocalN`/`ArgN` objects for their opcodes.
fn local_or_arg(opcode: Opcode) -> Option<TermObj> {
    let raw = opcode.raw();
    match raw {
        0x60..=0x67 => u8::try_from(raw - 0x60).ok().map(TermObj::Local),
        0x68..=0x6E => u8::try_from(raw - 0x68).ok().map(TermObj::Arg),
        _ => None,
    }
}
