//! VHDL output built from Xilinx RAMB16 primitives.
//!
//! Program memory uses one `RAMB16_S36` per 512 instructions, data memory one `RAMB16_S18` per 1024 words. Each block
//! is initialized through its 64 `INIT_xx` generics; with more than one block, the upper address bits select the
//! block.

use std::io::{self, Write};

use super::write_size_package;
use crate::assembler::AssembledImages;
use crate::config::{Capacity, DATA_BLOCK_WORDS, PROGRAM_BLOCK_WORDS};
use crate::memory::{Cell, DATA_WORD_MASK, PROGRAM_WORD_MASK};

const INIT_ROWS: usize = 0x40;
const PARITY_ROWS: usize = 8;

const PROGRAM_ENTITY: &str = "
---------------------------
-- Program memory entity --
---------------------------
library IEEE;
use IEEE.STD_LOGIC_1164.ALL;
use IEEE.STD_LOGIC_ARITH.ALL;
use IEEE.STD_LOGIC_UNSIGNED.ALL;
Library UNISIM;
use UNISIM.vcomponents.all;
use work.JPU16_MEM_SIZE_DEFS.all;

entity JPU16_PROG_MEM is
   generic (nBits_BusProg: integer := 26);
   Port (SysClk:    in  STD_LOGIC;
         SysHold:   in  STD_LOGIC;
         CicloInst: in  STD_LOGIC;
         Direccion: in  STD_LOGIC_VECTOR (nBits_DirProg - 1 downto 0);
         DatoProg:  out STD_LOGIC_VECTOR (nBits_BusProg - 1 downto 0));
end JPU16_PROG_MEM;

architecture Funcionamiento of JPU16_PROG_MEM is
";

const DATA_ENTITY: &str = "end Funcionamiento;

----------------
-- RAM entity --
----------------
library IEEE;
use IEEE.STD_LOGIC_1164.ALL;
use IEEE.STD_LOGIC_ARITH.ALL;
use IEEE.STD_LOGIC_UNSIGNED.ALL;
Library UNISIM;
use UNISIM.vcomponents.all;
use WORK.JPU16_MEM_SIZE_DEFS.ALL;

entity JPU16_RAM is
   generic (nBits_BusDatos: integer := 16);
   port (SysClk:    in  STD_LOGIC;
         SysHold:   in  STD_LOGIC;
         Ren:       in  STD_LOGIC;
         Wen:       in  STD_LOGIC;
         Direccion: in  STD_LOGIC_VECTOR (nBits_DirDatos-1 downto 0);
         DatoEnt:   in  STD_LOGIC_VECTOR (nBits_BusDatos-1 downto 0);
         DatoSal:   out STD_LOGIC_VECTOR (nBits_BusDatos-1 downto 0));
end JPU16_RAM;

architecture Funcionamiento of JPU16_RAM is
";

/// Writes both memories as VHDL instantiating RAMB16 block RAMs.
///
/// # Errors
/// Any I/O error of the sink.
pub fn write_vhdl_ramb16(images: &AssembledImages, out: &mut impl Write) -> io::Result<()> {
	write_size_package(images, out)?;

	let program_blocks = images.options().program.block_count();
	out.write_all(PROGRAM_ENTITY.as_bytes())?;
	writeln!(out, "   type PROG_DATA_BUS is array ({} downto 0) of STD_LOGIC_VECTOR (31 downto 0);", program_blocks - 1)?;
	writeln!(out, "\n   signal BusProg: PROG_DATA_BUS;")?;
	writeln!(out, "   signal CS: STD_LOGIC_VECTOR ({} downto 0);\nbegin", program_blocks - 1)?;
	if program_blocks > 1 {
		writeln!(out, "   Chip_Select: for i in 0 to {} generate", program_blocks - 1)?;
		writeln!(out, "      CS(i) <= '1' when CicloInst = '0' and SysHold = '0' and")?;
		writeln!(out, "               Direccion(nBits_DirProg-1 downto 9) = i else '0';\n   end generate;\n")?;
	} else {
		writeln!(out, "   CS(0) <= '1' when CicloInst = '0' and SysHold = '0' else '0';\n")?;
	}
	for (block, cells) in images.program().cells().chunks(PROGRAM_BLOCK_WORDS).enumerate() {
		write_program_block(out, block, cells)?;
	}
	if program_blocks > 1 {
		writeln!(
			out,
			"   DatoProg <= BusProg(conv_integer(Direccion(nBits_DirProg-1 downto 9)))(nBits_BusProg-1 downto 0);"
		)?;
	} else {
		writeln!(out, "   DatoProg <= BusProg(0)(nBits_BusProg-1 downto 0);")?;
	}

	let data_blocks = images.options().data.block_count();
	out.write_all(DATA_ENTITY.as_bytes())?;
	writeln!(
		out,
		"   type RAM_DATA_BUS is array ({} downto 0) of STD_LOGIC_VECTOR (nBits_BusDatos-1 downto 0);",
		data_blocks - 1
	)?;
	writeln!(out, "\n   signal BusRam: RAM_DATA_BUS;")?;
	writeln!(out, "   signal CS: STD_LOGIC_VECTOR ({} downto 0);\nbegin", data_blocks - 1)?;
	if data_blocks > 1 {
		writeln!(out, "   Chip_Select: for i in 0 to {} generate", data_blocks - 1)?;
		writeln!(out, "      CS(i) <= '1' when SysHold = '0' and (Ren = '1' or Wen = '1') and")?;
		writeln!(out, "               Direccion(nBits_DirDatos-1 downto 10) = i else '0';\n   end generate;\n")?;
	} else {
		writeln!(out, "   CS(0) <= '1' when SysHold = '0' and (Ren = '1' or Wen = '1') else '0';\n")?;
	}
	for (block, cells) in images.data().cells().chunks(DATA_BLOCK_WORDS).enumerate() {
		write_data_block(out, block, cells)?;
	}
	if data_blocks > 1 {
		writeln!(out, "   DatoSal <= BusRam(conv_integer(Direccion(nBits_DirDatos-1 downto 10)));")?;
	} else {
		writeln!(out, "   DatoSal <= BusRam(0);")?;
	}
	write!(out, "end Funcionamiento;")
}

fn write_program_block(out: &mut impl Write, block: usize, cells: &[Cell]) -> io::Result<()> {
	writeln!(out, "   MemoriaProg{block}: RAMB16_S36\n   generic map (")?;
	writeln!(out, "      INIT => X\"000000000\",       --Initial value of the output register")?;
	writeln!(out, "      SRVAL => X\"000000000\",      --Set/reset value of the output register")?;
	writeln!(out, "      WRITE_MODE => \"READ_FIRST\", --Read before write")?;
	write_init_rows(out, cells, PROGRAM_WORD_MASK, 8)?;
	writeln!(out, "   port map (")?;
	writeln!(out, "      DO => BusProg({block}),              --32-bit data output")?;
	writeln!(out, "      DOP => open,                   --4-bit parity output")?;
	writeln!(out, "      ADDR => Direccion(8 downto 0), --9-bit address input")?;
	writeln!(out, "      CLK => SysClk,                 --Clock input")?;
	writeln!(out, "      DI => X\"00000000\",             --32-bit data input")?;
	writeln!(out, "      DIP => \"0000\",                 --4-bit parity input")?;
	writeln!(out, "      EN => CS({block}),                   --Enable (chip select) input")?;
	writeln!(out, "      SSR => '0',                    --Synchronous set/reset input")?;
	writeln!(out, "      WE => '0'                      --Write enable input")?;
	writeln!(out, "   );\n")
}

fn write_data_block(out: &mut impl Write, block: usize, cells: &[Cell]) -> io::Result<()> {
	writeln!(out, "   MemoriaRam{block}: RAMB16_S18\n   generic map (")?;
	writeln!(out, "      INIT => X\"00000\",           --Initial value of the output register")?;
	writeln!(out, "      SRVAL => X\"00000\",          --Set/reset value of the output register")?;
	writeln!(out, "      WRITE_MODE => \"READ_FIRST\", --Read before write")?;
	write_init_rows(out, cells, DATA_WORD_MASK, 4)?;
	writeln!(out, "   port map (")?;
	writeln!(out, "      DO => BusRam({block}),               --16-bit data output")?;
	writeln!(out, "      DOP => open,                   --2-bit parity output")?;
	writeln!(out, "      ADDR => Direccion(9 downto 0), --10-bit address input")?;
	writeln!(out, "      CLK => SysClk,                 --Clock input")?;
	writeln!(out, "      DI => DatoEnt,                 --16-bit data input")?;
	writeln!(out, "      DIP => \"00\",                   --2-bit parity input")?;
	writeln!(out, "      EN => CS({block}),                   --Enable (chip select) input")?;
	writeln!(out, "      SSR => '0',                    --Synchronous set/reset input")?;
	writeln!(out, "      WE => Wen                      --Write enable input")?;
	writeln!(out, "   );\n")
}

/// Writes the `INIT_xx` rows of one block, highest address of each row first, followed by the all-zero parity rows
/// that close the generic map.
fn write_init_rows(out: &mut impl Write, cells: &[Cell], mask: u32, digits: usize) -> io::Result<()> {
	let words_per_row = cells.len() / INIT_ROWS;
	for (row, words) in cells.chunks(words_per_row).enumerate() {
		write!(out, "      INIT_{row:02X} => X\"")?;
		for word in words.iter().rev() {
			write!(out, "{:0digits$X}", word.value() & mask)?;
		}
		writeln!(out, "\",")?;
	}
	for row in 0 .. PARITY_ROWS {
		let terminator = if row == PARITY_ROWS - 1 { ")" } else { "," };
		writeln!(out, "      INITP_{row:02X} => X\"{}\"{terminator}", "0".repeat(64))?;
	}
	Ok(())
}
