//! Program and data memory images.
//!
//! An image is a fixed backing array of [`BACKING_SIZE`] cells of which only a configured prefix is available for
//! sequential allocation. Pass 1 fills cells with [`MemoryImage::append`]; pass 2 patches already placed values with
//! [`MemoryImage::store_at`].

use std::fmt::{Debug, Display, Formatter};

use log::trace;

use crate::error::AssemblyError;
use crate::{MemoryAddress, SourceLine};


/// Number of cells in the backing array of every memory image.
pub const BACKING_SIZE: usize = 0x1_0000;

/// Sentinel bit marking a cell that has never been written.
pub const FREE_MARKER: u32 = 0x8000_0000;
/// Bits of a program word: 10 opcode bits above the 16-bit literal field.
pub const PROGRAM_WORD_MASK: u32 = 0x03FF_FFFF;
/// Bits of a data word.
pub const DATA_WORD_MASK: u32 = 0xFFFF;
/// The literal field of a program word, patched during pass 2.
pub const LITERAL_MASK: u32 = 0xFFFF;

/// The two address spaces of the JPU16.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MemoryKind {
	/// Instruction memory, 26-bit words.
	Program,
	/// Data memory (RAM), 16-bit words.
	Data,
}

impl MemoryKind {
	/// Bits of a value that are kept when it is appended to this memory.
	#[must_use]
	#[inline]
	pub const fn word_mask(self) -> u32 {
		match self {
			Self::Program => PROGRAM_WORD_MASK,
			Self::Data => DATA_WORD_MASK,
		}
	}

	/// What a single cell of this memory holds, in plural.
	#[must_use]
	pub const fn unit(self) -> &'static str {
		match self {
			Self::Program => "instructions",
			Self::Data => "words",
		}
	}
}

impl Display for MemoryKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Self::Program => "program memory",
			Self::Data => "data memory",
		})
	}
}

/// A single memory cell. The value occupies the low bits, bit 31 tags the cell as free.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Cell(u32);

impl Cell {
	/// A cell that was never written.
	pub const FREE: Self = Self(FREE_MARKER);

	/// A used cell holding the given value. The free marker is never part of the value.
	#[must_use]
	#[inline]
	pub const fn used(value: u32) -> Self {
		Self(value & !FREE_MARKER)
	}

	/// Whether this cell was never written.
	#[must_use]
	#[inline]
	pub const fn is_free(self) -> bool {
		self.0 & FREE_MARKER != 0
	}

	/// Whether this cell holds a value.
	#[must_use]
	#[inline]
	pub const fn is_used(self) -> bool {
		!self.is_free()
	}

	/// The value bits of this cell, without the free marker.
	#[must_use]
	#[inline]
	pub const fn value(self) -> u32 {
		self.0 & !FREE_MARKER
	}

	/// The raw cell contents including the free marker.
	#[must_use]
	#[inline]
	pub const fn raw(self) -> u32 {
		self.0
	}

	/// The low 16-bit literal field.
	#[must_use]
	#[inline]
	#[allow(clippy::cast_possible_truncation)]
	pub const fn literal(self) -> u16 {
		(self.0 & LITERAL_MASK) as u16
	}

	/// This cell with its literal field replaced and every other bit untouched, free marker included.
	#[must_use]
	#[inline]
	pub const fn with_literal(self, literal: u16) -> Self {
		Self((self.0 & !LITERAL_MASK) | literal as u32)
	}
}

impl Default for Cell {
	fn default() -> Self {
		Self::FREE
	}
}

impl Debug for Cell {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if self.is_free() { f.write_str("Cell(free)") } else { write!(f, "Cell({:#010x})", self.0) }
	}
}

/// One of the two address spaces with its allocation cursor.
#[derive(Clone)]
pub struct MemoryImage {
	kind:     MemoryKind,
	capacity: usize,
	cursor:   usize,
	cells:    Box<[Cell]>,
}

impl MemoryImage {
	/// Creates an image with every cell free and the cursor at address 0.
	///
	/// The capacity is clamped to the backing array.
	#[must_use]
	pub fn new(kind: MemoryKind, capacity: usize) -> Self {
		Self {
			kind,
			capacity: capacity.min(BACKING_SIZE),
			cursor: 0,
			cells: vec![Cell::FREE; BACKING_SIZE].into_boxed_slice(),
		}
	}

	/// Resets every cell of the backing array to free. The cursor is left alone.
	pub fn mark_all_free(&mut self) {
		self.cells.fill(Cell::FREE);
	}

	/// Places a value at the cursor and advances the cursor. The value is masked to the memory's word width.
	///
	/// Returns the address the value was placed at.
	///
	/// # Errors
	/// - [`AssemblyError::MemoryOverflow`] if the cursor has reached the capacity.
	/// - [`AssemblyError::Collision`] if the cell at the cursor is already used.
	///
	/// The cursor does not move in either case.
	#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
	pub fn append(&mut self, value: i32, line: SourceLine) -> Result<MemoryAddress, Box<AssemblyError>> {
		if self.cursor >= self.capacity {
			return Err(AssemblyError::MemoryOverflow { memory: self.kind, capacity: self.capacity, line }.into());
		}
		// The capacity never exceeds the backing array, so the cursor fits an address.
		let address = self.cursor as MemoryAddress;
		let cell = &mut self.cells[self.cursor];
		if cell.is_used() {
			return Err(AssemblyError::Collision { memory: self.kind, address, line }.into());
		}
		*cell = Cell::used(value as u32 & self.kind.word_mask());
		trace!("{} {:04X} <- {:?} (line {})", self.kind, address, cell, line);
		self.cursor += 1;
		Ok(address)
	}

	/// Writes a value resolved in pass 2 to a cell.
	///
	/// Data memory is overwritten with the value masked to 16 bits and the cell becomes used. Program memory adds the
	/// value to the cell's literal field modulo 2^16 and leaves every bit above the literal field as it was.
	#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
	pub fn store_at(&mut self, address: MemoryAddress, value: i32) {
		let cell = &mut self.cells[usize::from(address)];
		*cell = match self.kind {
			MemoryKind::Data => Cell::used(value as u32 & DATA_WORD_MASK),
			MemoryKind::Program => {
				let literal = (value as u32).wrapping_add(u32::from(cell.literal())) & LITERAL_MASK;
				cell.with_literal(literal as u16)
			},
		};
		trace!("{} {:04X} <- {:?} (patched with {})", self.kind, address, cell, value);
	}

	/// Number of used cells in the whole backing array.
	#[must_use]
	pub fn count_used(&self) -> usize {
		self.cells.iter().filter(|cell| cell.is_used()).count()
	}

	/// The cell at the given address.
	#[must_use]
	#[inline]
	pub fn cell(&self, address: MemoryAddress) -> Cell {
		self.cells[usize::from(address)]
	}

	/// The cells available for allocation, i.e. the prefix of the backing array up to the capacity.
	#[must_use]
	pub fn cells(&self) -> &[Cell] {
		&self.cells[.. self.capacity]
	}

	/// All used cells within the capacity, with their addresses.
	pub fn used_cells(&self) -> impl Iterator<Item = (usize, Cell)> + '_ {
		self.cells().iter().copied().enumerate().filter(|(_, cell)| cell.is_used())
	}

	/// The address the next appended value will be placed at.
	#[must_use]
	#[inline]
	pub const fn cursor(&self) -> usize {
		self.cursor
	}

	/// Number of cells available for allocation.
	#[must_use]
	#[inline]
	pub const fn capacity(&self) -> usize {
		self.capacity
	}

	/// Which memory this is.
	#[must_use]
	#[inline]
	pub const fn kind(&self) -> MemoryKind {
		self.kind
	}
}

impl Debug for MemoryImage {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryImage")
			.field("kind", &self.kind)
			.field("capacity", &self.capacity)
			.field("cursor", &self.cursor)
			.field("used", &self.count_used())
			.finish_non_exhaustive()
	}
}
