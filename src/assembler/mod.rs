//! Assembler core: the state of one assembly run across both passes.

use std::fmt::{Display, Formatter};

use flexstr::SharedStr;
use log::{debug, info};

use crate::config::{Capacity, MemoryOptions};
use crate::error::AssemblyError;
use crate::memory::{MemoryImage, MemoryKind};
use crate::{MemoryAddress, SourceLine};

mod action;
mod driver;
mod stack;
mod symbols;

pub use action::{ActionQueue, BinaryOperator, DeferredAction, Operator, UnaryOperator};
pub use driver::{DriverState, ResolutionDriver};
pub use stack::EvaluationStack;
pub use symbols::{Symbol, SymbolTable};


/// Everything one assembly run owns: both memory images, the symbol table and the deferred action queue.
///
/// A front end drives pass 1 through this session. Values it can compute right away go straight into memory with the
/// `reserve_*` functions; anything depending on a symbol that may not be defined yet is recorded as a postfix
/// sequence of deferred actions with the `enqueue_*` functions. [`Self::resolve`] then runs pass 2.
#[derive(Debug)]
pub struct AssemblySession {
	options:            MemoryOptions,
	pub(crate) program: MemoryImage,
	pub(crate) data:    MemoryImage,
	pub(crate) symbols: SymbolTable,
	pub(crate) actions: ActionQueue,
}

impl AssemblySession {
	/// Creates a session with both memories entirely free.
	#[must_use]
	pub fn new(options: MemoryOptions) -> Self {
		let mut program = MemoryImage::new(MemoryKind::Program, options.program.count());
		let mut data = MemoryImage::new(MemoryKind::Data, options.data.count());
		program.mark_all_free();
		data.mark_all_free();
		debug!("new assembly session with {} and {}", options.program, options.data);
		Self { options, program, data, symbols: SymbolTable::new(), actions: ActionQueue::new() }
	}

	/// Places a program word at the program cursor.
	///
	/// # Errors
	/// [`AssemblyError::MemoryOverflow`] or [`AssemblyError::Collision`].
	#[inline]
	pub fn reserve_program_value(
		&mut self,
		value: i32,
		line: SourceLine,
	) -> Result<MemoryAddress, Box<AssemblyError>> {
		self.program.append(value, line)
	}

	/// Places a data word at the data cursor.
	///
	/// # Errors
	/// [`AssemblyError::MemoryOverflow`] or [`AssemblyError::Collision`].
	#[inline]
	pub fn reserve_data_value(
		&mut self,
		value: i32,
		line: SourceLine,
	) -> Result<MemoryAddress, Box<AssemblyError>> {
		self.data.append(value, line)
	}

	/// Defines a symbol. Redefinitions are accepted but never win a lookup.
	pub fn define_symbol(&mut self, name: impl Into<SharedStr>, value: i32, line: SourceLine) {
		self.symbols.insert(name, value, line);
	}

	/// Value of a symbol defined so far, for expressions the front end evaluates immediately.
	#[must_use]
	pub fn symbol_value(&self, name: &str) -> Option<i32> {
		self.symbols.get(name)
	}

	/// Defers pushing a literal.
	pub fn enqueue_literal(&mut self, value: i32, line: SourceLine) {
		self.actions.enqueue(DeferredAction::PushLiteral { value, line });
	}

	/// Defers pushing the value of a symbol.
	pub fn enqueue_symbol(&mut self, name: impl Into<SharedStr>, line: SourceLine) {
		self.actions.enqueue(DeferredAction::PushSymbol { name: name.into(), line });
	}

	/// Defers applying an operator. `swap_operands` only matters for binary operators.
	pub fn enqueue_operator(&mut self, operator: impl Into<Operator>, swap_operands: bool, line: SourceLine) {
		self.actions.enqueue(DeferredAction::ApplyOperator { operator: operator.into(), swap_operands, line });
	}

	/// Defers storing the top of the stack into data memory.
	pub fn enqueue_store_data(&mut self, address: MemoryAddress, line: SourceLine) {
		self.actions.enqueue(DeferredAction::StoreToData { address, line });
	}

	/// Defers adding the top of the stack to the literal field of a program word.
	pub fn enqueue_store_program(&mut self, address: MemoryAddress, line: SourceLine) {
		self.actions.enqueue(DeferredAction::StoreToProgram { address, line });
	}

	/// Address the next program word will be placed at.
	#[must_use]
	pub const fn program_position(&self) -> usize {
		self.program.cursor()
	}

	/// Address the next data word will be placed at.
	#[must_use]
	pub const fn data_position(&self) -> usize {
		self.data.cursor()
	}

	/// Number of deferred actions not yet replayed.
	#[must_use]
	pub fn queued_actions(&self) -> usize {
		self.actions.len()
	}

	/// Memory configuration of this session.
	#[must_use]
	pub const fn options(&self) -> MemoryOptions {
		self.options
	}

	/// Runs pass 2 to completion and freezes the memory images.
	///
	/// # Errors
	/// The first error raised while replaying the deferred actions.
	pub fn resolve(mut self) -> Result<AssembledImages, Box<AssemblyError>> {
		info!("Pass 1: OK");
		let pending = self.actions.len();
		ResolutionDriver::new(&mut self).run()?;
		info!("Pass 2: OK ({pending} deferred actions)");
		let images = AssembledImages { options: self.options, program: self.program, data: self.data };
		info!("Memory usage:\n{}", images.used_counts());
		Ok(images)
	}
}

/// The final, read-only result of an assembly run.
#[derive(Clone, Debug)]
pub struct AssembledImages {
	options: MemoryOptions,
	program: MemoryImage,
	data:    MemoryImage,
}

impl AssembledImages {
	/// The program memory image.
	#[must_use]
	pub const fn program(&self) -> &MemoryImage {
		&self.program
	}

	/// The data memory image.
	#[must_use]
	pub const fn data(&self) -> &MemoryImage {
		&self.data
	}

	/// Memory configuration the images were assembled for.
	#[must_use]
	pub const fn options(&self) -> MemoryOptions {
		self.options
	}

	/// Number of used cells in each image.
	#[must_use]
	pub fn used_counts(&self) -> MemoryUsage {
		MemoryUsage { program: self.program.count_used(), data: self.data.count_used() }
	}
}

/// Used cell counts of both memories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryUsage {
	/// Used program memory cells.
	pub program: usize,
	/// Used data memory cells.
	pub data:    usize,
}

impl Display for MemoryUsage {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "  - Program memory: {} instructions\n  - Data memory: {} words", self.program, self.data)
	}
}
