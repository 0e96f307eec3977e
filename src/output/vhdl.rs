//! Generic VHDL output: both memories as behavioral arrays that synthesis tools map to whatever RAM is available.

use std::io::{self, Write};

use super::write_size_package;
use crate::assembler::AssembledImages;
use crate::memory::Cell;

const PROGRAM_ENTITY: &str = "
---------------------------
-- Program memory entity --
---------------------------
library IEEE;
use IEEE.STD_LOGIC_1164.ALL;
use IEEE.STD_LOGIC_ARITH.ALL;
use IEEE.STD_LOGIC_UNSIGNED.ALL;
use work.JPU16_MEM_SIZE_DEFS.all;

entity JPU16_PROG_MEM is
   generic (nBits_BusProg: integer := 26);
   Port (SysClk:    in  STD_LOGIC;
         SysHold:   in  STD_LOGIC;
         CicloInst: in  STD_LOGIC;
         Direccion: in  STD_LOGIC_VECTOR (nBits_DirProg - 1 downto 0);
         DatoProg:  out STD_LOGIC_VECTOR (nBits_BusProg - 1 downto 0) := (others => '0'));
end JPU16_PROG_MEM;

architecture Funcionamiento of JPU16_PROG_MEM is
   type PROG_DATA is array (2**nBits_DirProg-1 downto 0) of
      STD_LOGIC_VECTOR (nBits_BusProg-1 downto 0);

   constant MemoriaProg: PROG_DATA := (
";

const PROGRAM_ARCHITECTURE: &str = "   );
begin
   process (SysClk)
   begin
      if rising_edge(SysClk) then
         if CicloInst = '0' and SysHold = '0' then
            DatoProg  <= MemoriaProg(conv_integer(Direccion));
         end if;
      end if;
   end process;
end Funcionamiento;
";

const DATA_ENTITY: &str = "
----------------
-- RAM entity --
----------------
library IEEE;
use IEEE.STD_LOGIC_1164.ALL;
use IEEE.STD_LOGIC_ARITH.ALL;
use IEEE.STD_LOGIC_UNSIGNED.ALL;
use WORK.JPU16_MEM_SIZE_DEFS.ALL;

entity JPU16_RAM is
   generic (nBits_BusDatos: integer := 16);
   port (SysClk:    in  STD_LOGIC;
         SysHold:   in  STD_LOGIC;
         Ren:       in  STD_LOGIC;
         Wen:       in  STD_LOGIC;
         Direccion: in  STD_LOGIC_VECTOR (nBits_DirDatos-1 downto 0);
         DatoEnt:   in  STD_LOGIC_VECTOR (nBits_BusDatos-1 downto 0);
         DatoSal:   out STD_LOGIC_VECTOR (nBits_BusDatos-1 downto 0) := (others => '0'));
end JPU16_RAM;

architecture Funcionamiento of JPU16_RAM is
   type RAM_DATA is array (2**nBits_DirDatos-1 downto 0) of
      STD_LOGIC_VECTOR (nBits_BusDatos-1 downto 0);

   signal MemoriaRam: RAM_DATA := (
";

const DATA_ARCHITECTURE: &str = "   );
begin
   process (SysClk)
   begin
      if rising_edge(SysClk) then
         if SysHold = '0' and (Ren = '1' or Wen = '1') then
            if Wen = '1' then
               MemoriaRam(conv_integer(Direccion)) <= DatoEnt;
            end if;
            DatoSal <= MemoriaRam(conv_integer(Direccion));
         end if;
      end if;
   end process;
end Funcionamiento;";

/// Writes both memories as generic VHDL. Only used cells are listed; all others are zero.
///
/// # Errors
/// Any I/O error of the sink.
pub fn write_vhdl(images: &AssembledImages, out: &mut impl Write) -> io::Result<()> {
	write_size_package(images, out)?;

	out.write_all(PROGRAM_ENTITY.as_bytes())?;
	for (address, cell) in images.program().used_cells() {
		writeln!(out, "      {address} => B\"{}\",", program_word_bits(cell))?;
	}
	writeln!(out, "      others => B\"{}\"", program_word_bits(Cell::used(0)))?;
	out.write_all(PROGRAM_ARCHITECTURE.as_bytes())?;

	out.write_all(DATA_ENTITY.as_bytes())?;
	for (address, cell) in images.data().used_cells() {
		writeln!(out, "      {address} => X\"{:04X}\",", cell.value())?;
	}
	writeln!(out, "      others => X\"0000\"")?;
	out.write_all(DATA_ARCHITECTURE.as_bytes())
}

/// The 26 bits of a program word, grouped as they are split between opcode and literal field.
fn program_word_bits(cell: Cell) -> String {
	let word = cell.value();
	let mut bits = String::with_capacity(28);
	for bit in (0 ..= 25).rev() {
		bits.push(if word & (1 << bit) == 0 { '0' } else { '1' });
		if bit == 20 || bit == 16 {
			bits.push('_');
		}
	}
	bits
}
