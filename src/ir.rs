//! The IR: a closed mnemonic set, three-operand instructions, and the
//! builder that assembles them.

pub mod builder;
pub mod instruction;
pub mod mnemonic;
pub mod operand;

pub use builder::InstructionBuilder;
pub use instruction::{DualInstruction, Instruction};
pub use mnemonic::{Arity, Mnemonic};
pub use operand::Operand;
