//! Memory capacity configuration.
//!
//! Both memories of the JPU16 are built from block RAMs, so their sizes come from a fixed set of powers of two. The
//! capacities here bound sequential allocation during pass 1 and determine the address bus widths and block counts of
//! the generated hardware descriptions.

use std::fmt::{Display, Formatter};

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

use crate::error::AssemblyError;
use crate::memory::MemoryKind;

/// Number of 32-bit program words held by one RAMB16 block.
pub const PROGRAM_BLOCK_WORDS: usize = 512;
/// Number of 16-bit data words held by one RAMB16 block.
pub const DATA_BLOCK_WORDS: usize = 1024;

/// A legal capacity for one of the two memories.
pub trait Capacity: Copy + FromPrimitive + ToPrimitive + 'static {
	/// The memory this capacity applies to.
	const MEMORY: MemoryKind;
	/// Words per block RAM of this memory.
	const BLOCK_WORDS: usize;
	/// All legal capacities, smallest first.
	const ALL: &'static [Self];

	/// Number of cells available for allocation.
	#[must_use]
	fn count(self) -> usize {
		self.to_usize().unwrap_or_default()
	}

	/// Width of the address bus needed to address every cell.
	#[must_use]
	fn address_bits(self) -> u32 {
		self.count().trailing_zeros()
	}

	/// Number of block RAMs needed for this capacity.
	#[must_use]
	fn block_count(self) -> usize {
		self.count() / Self::BLOCK_WORDS
	}

	/// Converts a number of words to a capacity.
	///
	/// # Errors
	/// If the number is not one of the legal capacities.
	fn from_count(count: usize) -> Result<Self, Box<AssemblyError>> {
		Self::from_usize(count).ok_or_else(|| {
			AssemblyError::InvalidCapacity {
				memory:    Self::MEMORY,
				requested: count,
				legal:     Self::ALL.iter().map(|capacity| capacity.count()).collect(),
			}
			.into()
		})
	}
}

/// Legal program memory sizes, in instructions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, FromPrimitive, ToPrimitive)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum ProgramCapacity {
	#[default]
	Instructions512   = 512,
	Instructions1024  = 1024,
	Instructions2048  = 2048,
	Instructions4096  = 4096,
	Instructions8192  = 8192,
	Instructions16384 = 16384,
}

impl Capacity for ProgramCapacity {
	const ALL: &'static [Self] = &[
		Self::Instructions512,
		Self::Instructions1024,
		Self::Instructions2048,
		Self::Instructions4096,
		Self::Instructions8192,
		Self::Instructions16384,
	];
	const BLOCK_WORDS: usize = PROGRAM_BLOCK_WORDS;
	const MEMORY: MemoryKind = MemoryKind::Program;
}

/// Legal data memory sizes, in 16-bit words.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, FromPrimitive, ToPrimitive)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum DataCapacity {
	#[default]
	Words1024  = 1024,
	Words2048  = 2048,
	Words4096  = 4096,
	Words8192  = 8192,
	Words16384 = 16384,
	Words32768 = 32768,
}

impl Capacity for DataCapacity {
	const ALL: &'static [Self] =
		&[Self::Words1024, Self::Words2048, Self::Words4096, Self::Words8192, Self::Words16384, Self::Words32768];
	const BLOCK_WORDS: usize = DATA_BLOCK_WORDS;
	const MEMORY: MemoryKind = MemoryKind::Data;
}

macro_rules! display_count {
	($($capacity:ty),+) => {
		$(impl Display for $capacity {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				write!(f, "{} {}", self.count(), Self::MEMORY.unit())
			}
		})+
	};
}

display_count!(ProgramCapacity, DataCapacity);

/// Capacities of both memories for one assembly run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MemoryOptions {
	/// Size of the program memory.
	pub program: ProgramCapacity,
	/// Size of the data memory.
	pub data:    DataCapacity,
}

impl MemoryOptions {
	/// Validates raw word counts, e.g. from the command line, into memory options.
	///
	/// # Errors
	/// If either count is not a legal capacity for its memory.
	pub fn from_counts(program: usize, data: usize) -> Result<Self, Box<AssemblyError>> {
		Ok(Self { program: ProgramCapacity::from_count(program)?, data: DataCapacity::from_count(data)? })
	}
}
