//! BMM output: the block RAM memory map that tells `data2mem` where a MEM file's words live in the bitstream.

use std::io::{self, Write};

use super::mem::DATA_BASE_ADDRESS;
use crate::assembler::AssembledImages;
use crate::config::Capacity;

/// Writes the memory map of both memories.
///
/// # Errors
/// Any I/O error of the sink.
pub fn write_bmm(images: &AssembledImages, out: &mut impl Write) -> io::Result<()> {
	let options = images.options();
	writeln!(out, "ADDRESS_MAP JPU16 PPC405 0")?;

	writeln!(out, "   ADDRESS_SPACE MemoriaPrograma RAMB16 [0x{:05X}:0x{:05X}]", 0, options.program.count() * 4 - 1)?;
	for block in 0 .. options.program.block_count() {
		writeln!(out, "      BUS_BLOCK\n         CPU/PROG_MEM/MemoriaProg{block} [31:0];\n      END_BUS_BLOCK;")?;
	}
	writeln!(out, "   END_ADDRESS_SPACE;")?;

	writeln!(
		out,
		"   ADDRESS_SPACE MemoriaRam RAMB16 [0x{:05X}:0x{:05X}]",
		DATA_BASE_ADDRESS,
		DATA_BASE_ADDRESS + options.data.count() * 2 - 1
	)?;
	for block in 0 .. options.data.block_count() {
		writeln!(out, "      BUS_BLOCK\n         CPU/RAM/MemoriaRam{block} [15:0];\n      END_BUS_BLOCK;")?;
	}
	writeln!(out, "   END_ADDRESS_SPACE;")?;
	write!(out, "END_ADDRESS_MAP;")
}
