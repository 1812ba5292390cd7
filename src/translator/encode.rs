//! Per-mnemonic encoders, dispatched from an exhaustive `match` over
//! [`Mnemonic`] so the compiler guarantees every mnemonic is handled.

use super::{DstTranslation, Translator};
use crate::arch::ArchitectureDescriptor;
use crate::error::Error;
use crate::ir::{Instruction, Mnemonic};
use crate::smt::{term, SmtBackend, Term};

pub(super) fn dispatch<B: SmtBackend, A: ArchitectureDescriptor>(
    t: &mut Translator<B, A>,
    instr: &Instruction,
) -> Result<Vec<Term>, Error> {
    match instr.mnemonic {
        Mnemonic::Add => encode_binop(t, instr, "add", |a, b| a + b),
        Mnemonic::Sub => encode_binop(t, instr, "sub", |a, b| a - b),
        Mnemonic::Mul => encode_binop(t, instr, "mul", |a, b| a * b),
        Mnemonic::And => encode_binop(t, instr, "and", |a, b| a & b),
        Mnemonic::Or => encode_binop(t, instr, "or", |a, b| a | b),
        Mnemonic::Xor => encode_binop(t, instr, "xor", |a, b| a ^ b),
        Mnemonic::Div => encode_divmod(t, instr, "div", term::udiv),
        Mnemonic::Mod => encode_divmod(t, instr, "mod", term::urem),
        Mnemonic::Bsh => encode_bsh(t, instr),
        Mnemonic::Ldm => encode_ldm(t, instr),
        Mnemonic::Stm => encode_stm(t, instr),
        Mnemonic::Str => encode_str(t, instr),
        Mnemonic::Bisz => encode_bisz(t, instr),
        Mnemonic::Jcc => Ok(Vec::new()),
        Mnemonic::Unkn => Err(Error::UnsupportedInstruction("UNKN")),
        Mnemonic::Undef | Mnemonic::Nop | Mnemonic::Ret => Ok(Vec::new()),
    }
}

/// ADD/SUB/MUL/AND/OR/XOR share the same size-coercion shape: zero-extend
/// both sources when the destination is wider, truncate the result when
/// it is narrower, otherwise apply `op` directly.
///
/// The preservation list is appended here too: a sub-register write
/// through any of these mnemonics needs the same "other bytes of the base
/// register are unchanged" guarantee as a plain move.
fn encode_binop<B: SmtBackend, A: ArchitectureDescriptor>(
    t: &mut Translator<B, A>,
    instr: &Instruction,
    mnemonic: &'static str,
    op: impl Fn(Term, Term) -> Term,
) -> Result<Vec<Term>, Error> {
    let m1 = super::require_size(instr.oprnd1(), mnemonic)?;
    let m2 = super::require_size(instr.oprnd2(), mnemonic)?;
    let n = super::require_size(instr.oprnd3(), mnemonic)?;
    super::require_equal_size(m1, m2, mnemonic)?;

    let s1 = t.translate_src_operand(instr.oprnd1())?;
    let s2 = t.translate_src_operand(instr.oprnd2())?;
    let DstTranslation { term: d, preservation } = t.translate_dst_operand(instr.oprnd3())?;

    let expr = if n > m1 {
        term::eq(d, op(term::zextend(s1, n), term::zextend(s2, n)))
    } else if n < m1 {
        term::eq(d, term::extract(op(s1, s2), 0, n))
    } else {
        term::eq(d, op(s1, s2))
    };

    let mut out = vec![expr];
    out.extend(preservation);
    Ok(out)
}

/// DIV/MOD: all three operand sizes equal; unsigned division/remainder.
fn encode_divmod<B: SmtBackend, A: ArchitectureDescriptor>(
    t: &mut Translator<B, A>,
    instr: &Instruction,
    mnemonic: &'static str,
    op: impl Fn(Term, Term) -> Term,
) -> Result<Vec<Term>, Error> {
    let m1 = super::require_size(instr.oprnd1(), mnemonic)?;
    let m2 = super::require_size(instr.oprnd2(), mnemonic)?;
    let n = super::require_size(instr.oprnd3(), mnemonic)?;
    super::require_equal_size(m1, m2, mnemonic)?;
    super::require_equal_size(m2, n, mnemonic)?;

    let s1 = t.translate_src_operand(instr.oprnd1())?;
    let s2 = t.translate_src_operand(instr.oprnd2())?;
    let DstTranslation { term: d, preservation } = t.translate_dst_operand(instr.oprnd3())?;

    let mut out = vec![term::eq(d, op(s1, s2))];
    out.extend(preservation);
    Ok(out)
}

/// BSH: shift-by-signed-amount. Sources share width `M`; the destination
/// may have a different width `N`. The direction test uses *signed*
/// `>= 0`, not unsigned — the shift amount's sign determines direction.
fn encode_bsh<B: SmtBackend, A: ArchitectureDescriptor>(
    t: &mut Translator<B, A>,
    instr: &Instruction,
) -> Result<Vec<Term>, Error> {
    let m1 = super::require_size(instr.oprnd1(), "bsh")?;
    let m2 = super::require_size(instr.oprnd2(), "bsh")?;
    let n = super::require_size(instr.oprnd3(), "bsh")?;
    super::require_equal_size(m1, m2, "bsh")?;

    let s1 = t.translate_src_operand(instr.oprnd1())?;
    let s2 = t.translate_src_operand(instr.oprnd2())?;
    let DstTranslation { term: d, preservation } = t.translate_dst_operand(instr.oprnd3())?;

    let shift_left = term::extract(term::shl(s1.clone(), s2.clone()), 0, n);
    let shift_right = term::extract(term::lshr(s1, term::neg(s2.clone())), 0, n);
    let is_nonneg = term::sge(s2, Term::bitvec(m1, 0));

    let mut out = vec![term::eq(d, term::ite_bv(n, is_nonneg, shift_left, shift_right))];
    out.extend(preservation);
    Ok(out)
}

/// LDM: load `N` bits from address `s1`, byte by byte, in descending
/// offset order, for deterministic assertion ordering.
fn encode_ldm<B: SmtBackend, A: ArchitectureDescriptor>(
    t: &mut Translator<B, A>,
    instr: &Instruction,
) -> Result<Vec<Term>, Error> {
    let addr_size = t.address_size;
    let s1_size = super::require_size(instr.oprnd1(), "ldm")?;
    if s1_size != addr_size {
        return Err(Error::WidthMismatch {
            mnemonic: "ldm",
            detail: format!("address operand is {s1_size} bits, address_size is {addr_size}"),
        });
    }
    let n = super::require_size(instr.oprnd3(), "ldm")?;

    let addr = t.translate_src_operand(instr.oprnd1())?;
    let DstTranslation { term: d, preservation } = t.translate_dst_operand(instr.oprnd3())?;
    let mem = t.memory();

    let mut out = Vec::new();
    let mut i = n;
    while i > 0 {
        i -= 8;
        let offset = Term::bitvec(addr_size, u64::from(i / 8));
        let byte = term::select(mem.clone(), addr.clone() + offset);
        out.push(term::eq(byte, term::extract(d.clone(), i, 8)));
    }
    out.extend(preservation);
    Ok(out)
}

/// STM: store `M` bits of `s1` at address `s3`, byte by byte in ascending
/// offset order, then version the memory array: allocates `MEM_{k+1}` up
/// front and asserts it equal to a chain of `store`s over `MEM_k`.
fn encode_stm<B: SmtBackend, A: ArchitectureDescriptor>(
    t: &mut Translator<B, A>,
    instr: &Instruction,
) -> Result<Vec<Term>, Error> {
    let addr_size = t.address_size;
    let m = super::require_size(instr.oprnd1(), "stm")?;
    let dst_size = super::require_size(instr.oprnd3(), "stm")?;
    if dst_size != addr_size {
        return Err(Error::WidthMismatch {
            mnemonic: "stm",
            detail: format!("address operand is {dst_size} bits, address_size is {addr_size}"),
        });
    }

    let src = t.translate_src_operand(instr.oprnd1())?;
    let addr = t.translate_src_operand(instr.oprnd3())?;

    let mut updated = t.memory();
    let mut i = 0;
    while i < m {
        let offset = Term::bitvec(addr_size, u64::from(i / 8));
        let byte = term::extract(src.clone(), i, 8);
        updated = term::store(updated, addr.clone() + offset, byte);
        i += 8;
    }

    t.mem_instance += 1;
    let name = format!("MEM_{}", t.mem_instance);
    let (new_mem, _) = t.backend.mk_array(addr_size, &name);
    t.memory = new_mem.clone();

    Ok(vec![term::eq(new_mem, updated)])
}

/// STR: register-to-register move, with size coercion. The widening
/// branch always constrains the destination's high `(N - M)` bits to
/// zero, so no garbage bits leak into the widened value.
fn encode_str<B: SmtBackend, A: ArchitectureDescriptor>(
    t: &mut Translator<B, A>,
    instr: &Instruction,
) -> Result<Vec<Term>, Error> {
    let m = super::require_size(instr.oprnd1(), "str")?;
    let n = super::require_size(instr.oprnd3(), "str")?;

    let s1 = t.translate_src_operand(instr.oprnd1())?;
    let DstTranslation { term: d, preservation } = t.translate_dst_operand(instr.oprnd3())?;

    let mut out = Vec::new();
    if m == n {
        out.push(term::eq(s1, d));
    } else if m < n {
        out.push(term::eq(s1, term::extract(d.clone(), 0, m)));
        let pad_width = n - m;
        out.push(term::eq(Term::bitvec(pad_width, 0), term::extract(d, m, pad_width)));
    } else {
        out.push(term::eq(term::extract(s1, 0, n), d));
    }
    out.extend(preservation);
    Ok(out)
}

/// BISZ: `d = (s1 == 0) ? 1 : 0`, in the destination's width.
fn encode_bisz<B: SmtBackend, A: ArchitectureDescriptor>(
    t: &mut Translator<B, A>,
    instr: &Instruction,
) -> Result<Vec<Term>, Error> {
    let m = super::require_size(instr.oprnd1(), "bisz")?;
    let n = super::require_size(instr.oprnd3(), "bisz")?;

    let s1 = t.translate_src_operand(instr.oprnd1())?;
    let DstTranslation { term: d, preservation } = t.translate_dst_operand(instr.oprnd3())?;

    let is_zero = term::eq(s1, Term::bitvec(m, 0));
    let mut out = vec![term::eq(
        d,
        term::ite_bv(n, is_zero, Term::bitvec(n, 1), Term::bitvec(n, 0)),
    )];
    out.extend(preservation);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::StaticArch;
    use crate::ir::{InstructionBuilder, Operand};
    use crate::smt::reference::{Model, ReferenceBackend};

    fn reg(name: &str, size: u32) -> Operand {
        Operand::register(name, size).unwrap()
    }

    fn imm(value: i64, size: u32) -> Operand {
        Operand::immediate(value, size).unwrap()
    }

    fn translator(arch: StaticArch) -> Translator<ReferenceBackend, StaticArch> {
        Translator::new(ReferenceBackend::new(), arch)
    }

    #[test]
    fn add_widening_accepts_correct_sum_rejects_wrong_one() {
        let mut t = translator(StaticArch::new(32).with_register("t", 64));
        let ins = InstructionBuilder.add(imm(3, 32), imm(5, 32), reg("t", 64)).unwrap();
        let assertions = t.translate(&ins).unwrap();
        assert_eq!(assertions.len(), 1);
        assert_eq!(t.current_name("t"), "t_1");

        let mut accepted = Model::new();
        accepted.set_var("t_1", 8);
        assert!(accepted.holds(&assertions[0]).unwrap());

        let mut rejected = Model::new();
        rejected.set_var("t_1", 7);
        assert!(!rejected.holds(&assertions[0]).unwrap());
    }

    #[test]
    fn sub_register_write_preserves_high_bytes() {
        let arch = StaticArch::new(32)
            .with_register("R", 32)
            .with_alias("Rlo", "R", 0xFFFF, 0);
        let mut t = translator(arch);
        let ins = InstructionBuilder.str_(imm(0xBEEF, 16), reg("Rlo", 16)).unwrap();
        let assertions = t.translate(&ins).unwrap();

        // expr (widths equal, no zero-pad constraint) + 2 preservation bytes (16..24, 24..32)
        assert_eq!(assertions.len(), 3);
        let mut model = Model::new();
        model.set_var("R_0", 0xDEAD_0000);
        model.set_var("R_1", 0xDEAD_BEEF);
        for a in &assertions {
            assert!(model.holds(a).unwrap());
        }
    }

    #[test]
    fn bsh_shifts_left_for_nonnegative_and_right_for_negative() {
        let mut t = translator(StaticArch::new(32).with_register("y", 8));
        let ins = InstructionBuilder.bsh(reg("x", 8), imm(2, 8), reg("y", 8)).unwrap();
        let assertions = t.translate(&ins).unwrap();
        let y_1 = t.current_name("y");
        let mut model = Model::new();
        model.set_var("x_0", 0b0000_0011);
        model.set_var(y_1.as_str(), 0b0000_1100);
        assert!(model.holds(&assertions[0]).unwrap());

        t.reset().unwrap();
        let ins = InstructionBuilder.bsh(reg("x", 8), imm(-1, 8), reg("y", 8)).unwrap();
        let assertions = t.translate(&ins).unwrap();
        let y_1 = t.current_name("y");
        let mut model = Model::new();
        model.set_var("x_0", 0b0000_0011);
        model.set_var(y_1.as_str(), 0b0000_0001);
        assert!(model.holds(&assertions[0]).unwrap());
    }

    #[test]
    fn load_after_store_round_trips() {
        let mut t = translator(StaticArch::new(32).with_register("w", 32));
        let stm = InstructionBuilder.stm(reg("v", 32), reg("p", 32)).unwrap();
        t.translate(&stm).unwrap();
        let ldm = InstructionBuilder.ldm(reg("p", 32), reg("w", 32)).unwrap();
        let assertions = t.translate(&ldm).unwrap();
        assert_eq!(assertions.len(), 4);
        let w_1 = t.current_name("w");

        let mut model = Model::new();
        model.set_var("v_0", 0xDEAD_BEEF);
        model.set_var("p_0", 0x1000);
        model.set_var(w_1.as_str(), 0xDEAD_BEEF);
        for i in 0..4u64 {
            model.set_byte("MEM_1", 0x1000 + i, ((0xDEAD_BEEFu32 >> (i * 8)) & 0xFF) as u8);
        }
        for a in &assertions {
            assert!(model.holds(a).unwrap());
        }
    }

    #[test]
    fn divide_and_modulo_equal_widths() {
        let mut t = translator(StaticArch::new(32).with_register("q", 16));
        let div = InstructionBuilder.div(imm(20, 16), imm(3, 16), reg("q", 16)).unwrap();
        let assertions = t.translate(&div).unwrap();
        let q_1 = t.current_name("q");
        let mut model = Model::new();
        model.set_var(q_1.as_str(), 6);
        assert!(model.holds(&assertions[0]).unwrap());

        t.reset().unwrap();
        let rem = InstructionBuilder.rem(imm(20, 16), imm(3, 16), reg("q", 16)).unwrap();
        let assertions = t.translate(&rem).unwrap();
        let q_1 = t.current_name("q");
        let mut model = Model::new();
        model.set_var(q_1.as_str(), 2);
        assert!(model.holds(&assertions[0]).unwrap());
    }

    #[test]
    fn bisz_is_the_logical_not_of_zero_test() {
        let mut t = translator(StaticArch::new(32).with_register("f", 1));
        let ins = InstructionBuilder.bisz(reg("z", 8), reg("f", 1)).unwrap();
        let assertions = t.translate(&ins).unwrap();
        let f_1 = t.current_name("f");

        let mut model = Model::new();
        model.set_var("z_0", 0);
        model.set_var(f_1.as_str(), 1);
        assert!(model.holds(&assertions[0]).unwrap());

        t.reset().unwrap();
        let ins = InstructionBuilder.bisz(reg("z", 8), reg("f", 1)).unwrap();
        let assertions = t.translate(&ins).unwrap();
        let f_1 = t.current_name("f");
        let mut model = Model::new();
        model.set_var("z_0", 1);
        model.set_var(f_1.as_str(), 0);
        assert!(model.holds(&assertions[0]).unwrap());
    }

    #[test]
    fn div_rejects_mismatched_widths_without_asserting() {
        let mut t = translator(StaticArch::new(32).with_register("q", 32));
        let ins = InstructionBuilder.div(imm(20, 16), imm(3, 16), reg("q", 32)).unwrap();
        assert!(matches!(t.translate(&ins), Err(Error::WidthMismatch { .. })));
        assert!(t.backend.assertions.is_empty());
    }

    #[test]
    fn ldm_rejects_address_of_wrong_width() {
        let mut t = translator(StaticArch::new(32).with_register("w", 32));
        let ins = InstructionBuilder.ldm(reg("p", 16), reg("w", 32)).unwrap();
        assert!(matches!(t.translate(&ins), Err(Error::WidthMismatch { .. })));
    }
}
