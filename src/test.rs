//! End-to-end tests of both passes and the memory configuration.

use rstest::rstest;

use crate::config::DATA_BLOCK_WORDS;
use crate::{
	AssemblyError, AssemblySession, BinaryOperator, Capacity, DataCapacity, MemoryKind, MemoryOptions, ProgramCapacity,
	UnaryOperator,
};

#[rstest]
#[case(ProgramCapacity::Instructions512, 9, 1)]
#[case(ProgramCapacity::Instructions1024, 10, 2)]
#[case(ProgramCapacity::Instructions4096, 12, 8)]
#[case(ProgramCapacity::Instructions16384, 14, 32)]
fn program_capacity_geometry(#[case] capacity: ProgramCapacity, #[case] bits: u32, #[case] blocks: usize) {
	assert_eq!(capacity.address_bits(), bits);
	assert_eq!(capacity.block_count(), blocks);
	assert_eq!(ProgramCapacity::from_count(capacity.count()).unwrap(), capacity);
}

#[rstest]
#[case(DataCapacity::Words1024, 10)]
#[case(DataCapacity::Words8192, 13)]
#[case(DataCapacity::Words32768, 15)]
fn data_capacity_geometry(#[case] capacity: DataCapacity, #[case] bits: u32) {
	assert_eq!(capacity.address_bits(), bits);
	assert_eq!(capacity.block_count() * DATA_BLOCK_WORDS, capacity.count());
}

#[test]
fn capacity_defaults() {
	let options = MemoryOptions::default();
	assert_eq!(options.program.count(), 512);
	assert_eq!(options.data.count(), 1024);
	assert_eq!(ProgramCapacity::ALL.len(), 6);
	assert_eq!(DataCapacity::ALL.len(), 6);
	assert_eq!(options.program.to_string(), "512 instructions");
	assert_eq!(options.data.to_string(), "1024 words");
}

#[rstest]
#[case(0)]
#[case(511)]
#[case(768)]
#[case(32768)]
fn illegal_program_capacity(#[case] count: usize) {
	let error = ProgramCapacity::from_count(count).unwrap_err();
	assert!(matches!(
		&*error,
		AssemblyError::InvalidCapacity { memory: MemoryKind::Program, requested, legal }
			if *requested == count && legal == &[512, 1024, 2048, 4096, 8192, 16384]
	));
}

#[test]
fn memory_options_from_counts() {
	let options = MemoryOptions::from_counts(2048, 4096).unwrap();
	assert_eq!(options, MemoryOptions { program: ProgramCapacity::Instructions2048, data: DataCapacity::Words4096 });
	let error = MemoryOptions::from_counts(2048, 100).unwrap_err();
	assert!(matches!(*error, AssemblyError::InvalidCapacity { memory: MemoryKind::Data, requested: 100, .. }));
}

/// A small program as a front end would feed it: labels bound to cursor positions, a relative jump whose offset is
/// computed in pass 2 and a data table mixing immediate and deferred values.
#[test]
fn two_pass_program() {
	let mut session = AssemblySession::new(MemoryOptions::default());

	// start: ld r0, table       (table is a forward reference)
	let load = session.reserve_program_value(0x0080_0000, 1).unwrap();
	session.define_symbol("start", i32::from(load), 1);
	session.enqueue_symbol("table", 1);
	session.enqueue_store_program(load, 1);
	// loop: jr end              (offset = end - (loop + 1))
	let jump = session.reserve_program_value(0x0140_0000, 2).unwrap();
	session.define_symbol("loop", i32::from(jump), 2);
	session.enqueue_symbol("end", 2);
	session.enqueue_symbol("loop", 2);
	session.enqueue_literal(1, 2);
	session.enqueue_operator(BinaryOperator::Add, false, 2);
	session.enqueue_operator(BinaryOperator::Subtract, false, 2);
	session.enqueue_store_program(jump, 2);
	// jr loop                   (backward: offset is negative and truncated to the literal field)
	let back = session.reserve_program_value(0x0140_0000, 3).unwrap();
	let offset = session.symbol_value("loop").unwrap() - (i32::from(back) + 1);
	session.enqueue_literal(offset, 3);
	session.enqueue_store_program(back, 3);
	// end: halt
	session.define_symbol("end", i32::try_from(session.program_position()).unwrap(), 4);
	session.reserve_program_value(0x03FF_0000, 4).unwrap();

	// table: dw 0x1234, ~start, 2 ** 4
	let table = session.data_position();
	session.define_symbol("table", i32::try_from(table).unwrap(), 5);
	session.reserve_data_value(0x1234, 5).unwrap();
	let complement = session.reserve_data_value(0, 5).unwrap();
	session.enqueue_symbol("start", 5);
	session.enqueue_operator(UnaryOperator::Not, false, 5);
	session.enqueue_store_data(complement, 5);
	let power = session.reserve_data_value(0, 5).unwrap();
	session.enqueue_literal(4, 5);
	session.enqueue_literal(2, 5);
	session.enqueue_operator(BinaryOperator::Exponentiation, true, 5);
	session.enqueue_store_data(power, 5);

	assert_eq!(session.queued_actions(), 17);
	let images = session.resolve().unwrap();
	let program = images.program();
	assert_eq!(program.cell(load).value(), 0x0080_0000);
	assert_eq!(program.cell(jump).value(), 0x0140_0001);
	assert_eq!(program.cell(back).value(), 0x0140_FFFE);
	assert_eq!(program.cell(3).value(), 0x03FF_0000);
	assert_eq!(images.data().cell(0).value(), 0x1234);
	assert_eq!(images.data().cell(complement).value(), 0xFFFF);
	assert_eq!(images.data().cell(power).value(), 16);
	assert_eq!(images.used_counts().program, 4);
	assert_eq!(images.used_counts().data, 3);
	assert_eq!(images.used_counts().to_string(), "  - Program memory: 4 instructions\n  - Data memory: 3 words");
}

#[test]
fn overflow_stops_pass_one() {
	let mut session = AssemblySession::new(MemoryOptions::default());
	for line in 0 .. 1024 {
		session.reserve_data_value(0, line).unwrap();
	}
	let error = session.reserve_data_value(0, 1024).unwrap_err();
	assert!(matches!(*error, AssemblyError::MemoryOverflow { memory: MemoryKind::Data, capacity: 1024, line: 1024 }));
	assert_eq!(error.to_string(), "Line 1024: end of data memory exceeded (1024 words)");
	assert_eq!(session.data_position(), 1024);
}

#[test]
fn deferred_store_overwrites_placed_data() {
	let mut session = AssemblySession::new(MemoryOptions::default());
	// Pass 2 stores never collide, even into a cell placed in pass 1.
	let cell = session.reserve_data_value(5, 1).unwrap();
	session.enqueue_literal(6, 2);
	session.enqueue_store_data(cell, 2);
	let images = session.resolve().unwrap();
	assert_eq!(images.data().cell(cell).value(), 6);
}

#[test]
fn division_by_zero_aborts_resolution() {
	let mut session = AssemblySession::new(MemoryOptions::default());
	session.define_symbol("zero", 0, 1);
	session.enqueue_literal(10, 2);
	session.enqueue_symbol("zero", 2);
	session.enqueue_operator(BinaryOperator::Divide, false, 2);
	session.enqueue_store_data(0, 2);
	let error = session.resolve().unwrap_err();
	assert_eq!(error.to_string(), "Line 2: `/` by zero");
	assert_eq!(error.line(), Some(2));
}
