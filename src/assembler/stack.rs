//! Evaluation stack for replaying postfix expressions.

use log::debug;

use crate::SourceLine;
use crate::error::AssemblyError;

/// LIFO of signed values, shared by one pass 2 queue drain.
#[derive(Clone, Debug, Default)]
pub struct EvaluationStack {
	values: Vec<i32>,
}

impl EvaluationStack {
	/// Creates an empty stack.
	#[must_use]
	pub const fn new() -> Self {
		Self { values: Vec::new() }
	}

	/// Pushes a value.
	#[inline]
	pub fn push(&mut self, value: i32) {
		self.values.push(value);
	}

	/// Pops the most recently pushed value.
	///
	/// # Errors
	/// [`AssemblyError::StackUnderflow`] if the stack is empty. The line is that of the action which needed the
	/// value.
	#[inline]
	pub fn pop(&mut self, line: SourceLine) -> Result<i32, Box<AssemblyError>> {
		self.values.pop().ok_or_else(|| {
			debug!("stack underflow while replaying line {line}");
			AssemblyError::StackUnderflow { line }.into()
		})
	}

	/// Number of values on the stack.
	#[must_use]
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether the stack holds no values.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// The values on the stack, bottom first.
	#[must_use]
	pub fn values(&self) -> &[i32] {
		&self.values
	}
}
