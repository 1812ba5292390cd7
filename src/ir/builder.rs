//! Instruction builder: one constructor per mnemonic, each enforcing
//! the fixed three-operand shape and per-mnemonic arity.

use super::instruction::Instruction;
use super::mnemonic::{Arity, Mnemonic};
use super::operand::Operand;
use crate::error::Error;

/// Generates well-typed [`Instruction`]s. Stateless — every method is a
/// thin, validated wrapper around [`InstructionBuilder::build`].
#[derive(Clone, Copy, Debug, Default)]
pub struct InstructionBuilder;

macro_rules! three_op_ctor {
    ($name:ident, $mnemonic:expr) => {
        pub fn $name(self, src1: Operand, src2: Operand, dst: Operand) -> Result<Instruction, Error> {
            self.build($mnemonic, src1, src2, dst)
        }
    };
}

macro_rules! src_dst_ctor {
    ($name:ident, $mnemonic:expr) => {
        pub fn $name(self, src: Operand, dst: Operand) -> Result<Instruction, Error> {
            self.build($mnemonic, src, Operand::Empty, dst)
        }
    };
}

macro_rules! niladic_ctor {
    ($name:ident, $mnemonic:expr) => {
        pub fn $name(self) -> Result<Instruction, Error> {
            self.build($mnemonic, Operand::Empty, Operand::Empty, Operand::Empty)
        }
    };
}

impl InstructionBuilder {
    // Arithmetic instructions
    three_op_ctor!(add, Mnemonic::Add);
    three_op_ctor!(sub, Mnemonic::Sub);
    three_op_ctor!(mul, Mnemonic::Mul);
    three_op_ctor!(div, Mnemonic::Div);
    three_op_ctor!(rem, Mnemonic::Mod);
    three_op_ctor!(bsh, Mnemonic::Bsh);

    // Bitwise instructions
    three_op_ctor!(and, Mnemonic::And);
    three_op_ctor!(or, Mnemonic::Or);
    three_op_ctor!(xor, Mnemonic::Xor);

    // Data transfer instructions
    src_dst_ctor!(ldm, Mnemonic::Ldm);
    src_dst_ctor!(stm, Mnemonic::Stm);
    src_dst_ctor!(str_, Mnemonic::Str);

    // Conditional instructions
    src_dst_ctor!(bisz, Mnemonic::Bisz);
    src_dst_ctor!(jcc, Mnemonic::Jcc);

    // Other instructions
    niladic_ctor!(unkn, Mnemonic::Unkn);
    niladic_ctor!(undef, Mnemonic::Undef);
    niladic_ctor!(nop, Mnemonic::Nop);

    // Ad hoc instructions
    niladic_ctor!(ret, Mnemonic::Ret);

    /// Validate and assemble an instruction for an arbitrary mnemonic.
    ///
    /// `oprnd2` is ignored (and forced to `Empty`) for [`Arity::SrcDst`]
    /// mnemonics, and both `oprnd2`/`oprnd3` are ignored (forced to
    /// `Empty`) for [`Arity::None`] mnemonics, so callers may always pass
    /// `Operand::Empty` in unused slots without tripping a validation
    /// error — this mirrors the `gen_*` convenience constructors, which
    /// never ask the caller for slots the mnemonic does not use.
    pub fn build(
        self,
        mnemonic: Mnemonic,
        oprnd1: Operand,
        oprnd2: Operand,
        oprnd3: Operand,
    ) -> Result<Instruction, Error> {
        let operands = match mnemonic.arity() {
            Arity::Three => {
                for (slot, op) in [("oprnd1", &oprnd1), ("oprnd2", &oprnd2), ("oprnd3", &oprnd3)] {
                    if op.is_empty() {
                        return Err(Error::InvalidOperandType {
                            context: "three-operand instruction",
                            detail: format!("{slot} must not be Empty for {mnemonic}"),
                        });
                    }
                }
                check_not_immediate(mnemonic, "oprnd3", &oprnd3)?;
                [oprnd1, oprnd2, oprnd3]
            }
            Arity::SrcDst => {
                if oprnd1.is_empty() {
                    return Err(Error::InvalidOperandType {
                        context: "src/dst instruction",
                        detail: format!("oprnd1 (source) must not be Empty for {mnemonic}"),
                    });
                }
                if oprnd3.is_empty() {
                    return Err(Error::InvalidOperandType {
                        context: "src/dst instruction",
                        detail: format!("oprnd3 must not be Empty for {mnemonic}"),
                    });
                }
                // Only LDM/STR/BISZ write oprnd3 as an SSA destination.
                // STM's oprnd3 is a memory address (read, not written) and
                // JCC's is a jump target — both may be an Immediate.
                if matches!(mnemonic, Mnemonic::Ldm | Mnemonic::Str | Mnemonic::Bisz) {
                    check_not_immediate(mnemonic, "oprnd3", &oprnd3)?;
                }
                [oprnd1, Operand::Empty, oprnd3]
            }
            Arity::None => {
                let _ = (oprnd1, oprnd2, oprnd3);
                [Operand::Empty, Operand::Empty, Operand::Empty]
            }
        };

        Ok(Instruction {
            mnemonic,
            operands,
            address: None,
            comment: None,
        })
    }
}

fn check_not_immediate(mnemonic: Mnemonic, slot: &'static str, op: &Operand) -> Result<(), Error> {
    if matches!(op, Operand::Immediate { .. }) {
        return Err(Error::InvalidOperandType {
            context: "destination operand",
            detail: format!("{slot} of {mnemonic} must not be Immediate"),
        });
    }
    Ok(())
}
