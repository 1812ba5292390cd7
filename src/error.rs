//! Error taxonomy shared by the IR builder and the SMT translator.

use thiserror::Error;

/// Everything that can go wrong building an [`crate::ir::Instruction`] or
/// translating one into SMT assertions.
#[derive(Debug, Error)]
pub enum Error {
    /// A mnemonic string did not match any entry in the closed mnemonic set.
    #[error("invalid mnemonic: {0:?}")]
    InvalidMnemonic(String),

    /// An instruction was constructed with a number of operands other than
    /// three.
    #[error("invalid operand arity: expected 3, got {0}")]
    InvalidOperandArity(usize),

    /// An operand variant appeared in a slot that forbids it, e.g. an
    /// [`crate::ir::Operand::Immediate`] used as a destination.
    #[error("invalid operand type in {context}: {detail}")]
    InvalidOperandType {
        /// Where the bad operand was found, e.g. `"STR destination"`.
        context: &'static str,
        detail: String,
    },

    /// `UNKN` was translated; it is intentionally unencodable.
    #[error("unsupported instruction: {0}")]
    UnsupportedInstruction(&'static str),

    /// Operand sizes violate the per-mnemonic width discipline.
    #[error("width mismatch in {mnemonic}: {detail}")]
    WidthMismatch {
        mnemonic: &'static str,
        detail: String,
    },

    /// An error surfaced verbatim from the SMT backend.
    #[error("solver error: {0}")]
    SolverError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
