//! The fixed three-operand IR instruction record.

use std::fmt;

use super::mnemonic::Mnemonic;
use super::operand::Operand;

/// A single IR instruction: a mnemonic and exactly three operand slots,
/// `Empty`-padded when unused, plus optional address/comment metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub operands: [Operand; 3],
    pub address: Option<u64>,
    pub comment: Option<String>,
}

impl Instruction {
    pub fn oprnd1(&self) -> &Operand {
        &self.operands[0]
    }

    pub fn oprnd2(&self) -> &Operand {
        &self.operands[1]
    }

    pub fn oprnd3(&self) -> &Operand {
        &self.operands[2]
    }

    pub fn with_address(mut self, address: u64) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<5} [{}, {}, {}]",
            self.mnemonic, self.operands[0], self.operands[1], self.operands[2]
        )
    }
}

/// A machine instruction paired with its (ordered) IR expansion, keyed by
/// address. Structural equality uses `(address, machine_instr)` only — the
/// IR expansion is derived from those two and does not participate in
/// equality.
#[derive(Clone, Debug)]
pub struct DualInstruction<M> {
    pub address: u64,
    pub machine_instr: M,
    pub ir_instrs: Vec<Instruction>,
}

impl<M: PartialEq> PartialEq for DualInstruction<M> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.machine_instr == other.machine_instr
    }
}

impl<M: Eq> Eq for DualInstruction<M> {}
