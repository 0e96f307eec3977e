//! Deferred actions and the operators they apply.

use std::collections::VecDeque;
use std::fmt::{self, Display, Formatter};

use flexstr::SharedStr;
use log::debug;

use crate::error::AssemblyError;
use crate::{MemoryAddress, SourceLine};

/// Unary operators for deferred calculations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
	/// -expr
	Negate,
	/// ~expr
	Not,
}

impl UnaryOperator {
	/// Run the math operation this operator represents.
	#[must_use]
	pub const fn execute(self, value: i32) -> i32 {
		match self {
			Self::Not => !value,
			Self::Negate => value.wrapping_neg(),
		}
	}
}

impl Display for UnaryOperator {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}", match self {
			Self::Negate => '-',
			Self::Not => '~',
		})
	}
}

/// The kinds of binary operators supported for deferred calculations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
	/// expr | expr
	Or,
	/// expr ^ expr
	Xor,
	/// expr & expr
	And,
	/// expr << expr
	LeftShift,
	/// expr >> expr
	RightShift,
	/// expr + expr
	Add,
	/// expr - expr
	Subtract,
	/// expr * expr
	Multiply,
	/// expr / expr
	Divide,
	/// expr % expr
	Modulus,
	/// expr ** expr
	Exponentiation,
}

impl BinaryOperator {
	/// Run the math operation this binary operator represents.
	///
	/// Arithmetic wraps around in two's complement. Shifts are logical and produce 0 for shift amounts outside
	/// `0..=31`. Exponentiation is computed on reals and truncated toward zero.
	///
	/// # Errors
	/// - [`AssemblyError::DivisionByZero`] for a division or modulus with a zero right-hand side.
	/// - [`AssemblyError::ExponentOverflow`] if the power is not finite or does not fit 32 bits.
	pub fn execute(self, lhs: i32, rhs: i32, line: SourceLine) -> Result<i32, Box<AssemblyError>> {
		Ok(match self {
			Self::Or => lhs | rhs,
			Self::Xor => lhs ^ rhs,
			Self::And => lhs & rhs,
			Self::LeftShift => logical_shift(lhs, rhs, u32::checked_shl),
			Self::RightShift => logical_shift(lhs, rhs, u32::checked_shr),
			Self::Add => lhs.wrapping_add(rhs),
			Self::Subtract => lhs.wrapping_sub(rhs),
			Self::Multiply => lhs.wrapping_mul(rhs),
			Self::Divide | Self::Modulus if rhs == 0 =>
				return Err(AssemblyError::DivisionByZero { operator: self.into(), line }.into()),
			Self::Divide => lhs.wrapping_div(rhs),
			Self::Modulus => lhs.wrapping_rem(rhs),
			Self::Exponentiation => exponentiate(lhs, rhs, line)?,
		})
	}
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
fn logical_shift(value: i32, amount: i32, shift: fn(u32, u32) -> Option<u32>) -> i32 {
	u32::try_from(amount).ok().and_then(|amount| shift(value as u32, amount)).unwrap_or(0) as i32
}

#[allow(clippy::cast_possible_truncation)]
fn exponentiate(base: i32, exponent: i32, line: SourceLine) -> Result<i32, Box<AssemblyError>> {
	let power = f64::from(base).powf(f64::from(exponent)).trunc();
	if power.is_finite() && (f64::from(i32::MIN) ..= f64::from(i32::MAX)).contains(&power) {
		Ok(power as i32)
	} else {
		Err(AssemblyError::ExponentOverflow { base, exponent, line }.into())
	}
}

impl Display for BinaryOperator {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}", match self {
			Self::Add => "+",
			Self::Subtract => "-",
			Self::Multiply => "*",
			Self::Divide => "/",
			Self::Modulus => "%",
			Self::LeftShift => "<<",
			Self::RightShift => ">>",
			Self::And => "&",
			Self::Or => "|",
			Self::Xor => "^",
			Self::Exponentiation => "**",
		})
	}
}

/// Any operator a deferred action can apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
	/// Consumes one stack value.
	Unary(UnaryOperator),
	/// Consumes two stack values.
	Binary(BinaryOperator),
}

impl From<UnaryOperator> for Operator {
	fn from(operator: UnaryOperator) -> Self {
		Self::Unary(operator)
	}
}

impl From<BinaryOperator> for Operator {
	fn from(operator: BinaryOperator) -> Self {
		Self::Binary(operator)
	}
}

impl Display for Operator {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unary(operator) => Display::fmt(operator, f),
			Self::Binary(operator) => Display::fmt(operator, f),
		}
	}
}

/// Work recorded during pass 1 that can only be done once every symbol is known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeferredAction {
	/// Push a known value onto the evaluation stack.
	PushLiteral {
		/// The value.
		value: i32,
		/// Source line the action was recorded for.
		line:  SourceLine,
	},
	/// Push the value of a symbol onto the evaluation stack.
	PushSymbol {
		/// Name of the symbol.
		name: SharedStr,
		/// Source line the action was recorded for.
		line: SourceLine,
	},
	/// Replace the topmost operand(s) with the result of an operator.
	ApplyOperator {
		/// The operator.
		operator:      Operator,
		/// For binary operators: the left operand is on top of the stack instead of the right one.
		swap_operands: bool,
		/// Source line the action was recorded for.
		line:          SourceLine,
	},
	/// Pop a value and overwrite a data memory cell with it.
	StoreToData {
		/// Target cell.
		address: MemoryAddress,
		/// Source line the action was recorded for.
		line:    SourceLine,
	},
	/// Pop a value and add it to the literal field of a program memory cell.
	StoreToProgram {
		/// Target cell.
		address: MemoryAddress,
		/// Source line the action was recorded for.
		line:    SourceLine,
	},
}

impl DeferredAction {
	/// Source line the action was recorded for.
	#[must_use]
	pub const fn line(&self) -> SourceLine {
		match self {
			Self::PushLiteral { line, .. }
			| Self::PushSymbol { line, .. }
			| Self::ApplyOperator { line, .. }
			| Self::StoreToData { line, .. }
			| Self::StoreToProgram { line, .. } => *line,
		}
	}
}

impl Display for DeferredAction {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::PushLiteral { value, line } => write!(f, "line {line}: push {value:#x}"),
			Self::PushSymbol { name, line } => write!(f, "line {line}: push {name}"),
			Self::ApplyOperator { operator, swap_operands: true, line } => write!(f, "line {line}: apply {operator} (swapped)"),
			Self::ApplyOperator { operator, line, .. } => write!(f, "line {line}: apply {operator}"),
			Self::StoreToData { address, line } => write!(f, "line {line}: store to data {address:04X}"),
			Self::StoreToProgram { address, line } => write!(f, "line {line}: store to program {address:04X}"),
		}
	}
}

/// FIFO of deferred actions, filled during pass 1 and drained during pass 2.
#[derive(Clone, Debug, Default)]
pub struct ActionQueue {
	actions: VecDeque<DeferredAction>,
}

impl ActionQueue {
	/// Creates an empty queue.
	#[must_use]
	pub const fn new() -> Self {
		Self { actions: VecDeque::new() }
	}

	/// Appends an action after every action recorded so far.
	pub fn enqueue(&mut self, action: DeferredAction) {
		debug!("deferring {action}");
		self.actions.push_back(action);
	}

	/// Removes the oldest action.
	pub fn dequeue(&mut self) -> Option<DeferredAction> {
		self.actions.pop_front()
	}

	/// Number of pending actions.
	#[must_use]
	pub fn len(&self) -> usize {
		self.actions.len()
	}

	/// Whether no actions are pending.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.actions.is_empty()
	}

	/// The pending actions, oldest first.
	pub fn iter(&self) -> impl Iterator<Item = &DeferredAction> {
		self.actions.iter()
	}
}
