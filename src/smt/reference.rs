//! An in-crate `SmtBackend` used only by this crate's own tests.
//!
//! `ReferenceBackend` records declarations and assertions exactly as a real
//! `QF_ABV` solver's front end would, without attempting to decide
//! satisfiability. Its companion, [`Model`], assigns concrete values to
//! free variables and bytes to array addresses, then evaluates [`Term`]s
//! against that assignment — enough to check concrete translation
//! scenarios without linking an external solver process, which stays
//! outside this crate's scope.

use std::collections::BTreeMap;

use super::backend::SmtBackend;
use super::term::Term;
use crate::error::Error;

#[derive(Clone, Debug, Default)]
pub struct ReferenceBackend {
    bitvecs: BTreeMap<String, u32>,
    arrays: BTreeMap<String, u32>,
    /// Assertions accumulated in the order `assert_term` was called.
    pub assertions: Vec<Term>,
}

impl ReferenceBackend {
    pub fn new() -> Self {
        ReferenceBackend::default()
    }
}

impl SmtBackend for ReferenceBackend {
    fn mk_bitvec(&mut self, size: u32, name: &str) -> Term {
        self.bitvecs.entry(name.to_string()).or_insert(size);
        Term::Var {
            name: name.into(),
            size,
        }
    }

    fn mk_array(&mut self, addr_size: u32, name: &str) -> (Term, Term) {
        self.arrays.entry(name.to_string()).or_insert(addr_size);
        let handle = Term::Array {
            name: name.into(),
            addr_size,
        };
        (handle.clone(), handle)
    }

    fn assert_term(&mut self, term: Term) -> Result<(), Error> {
        self.assertions.push(term);
        Ok(())
    }

    fn reset(&mut self, full: bool) -> Result<(), Error> {
        self.assertions.clear();
        if full {
            self.bitvecs.clear();
            self.arrays.clear();
        }
        Ok(())
    }
}

/// A concrete assignment of values to free variables and bytes to array
/// addresses, used to evaluate [`Term`]s built by the translator.
#[derive(Clone, Debug, Default)]
pub struct Model {
    vars: BTreeMap<String, u64>,
    arrays: BTreeMap<String, BTreeMap<u64, u8>>,
}

impl Model {
    pub fn new() -> Self {
        Model::default()
    }

    /// Assign a concrete value to a free bit-vector variable (e.g. `t_0`).
    pub fn set_var(&mut self, name: impl Into<String>, value: u64) -> &mut Self {
        self.vars.insert(name.into(), value);
        self
    }

    /// Assign a concrete byte at `address` within the named array.
    /// Unassigned addresses evaluate to `0`.
    pub fn set_byte(&mut self, array: impl Into<String>, address: u64, value: u8) -> &mut Self {
        self.arrays.entry(array.into()).or_default().insert(address, value);
        self
    }

    /// Evaluate `term` under this assignment.
    pub fn eval(&self, term: &Term) -> Result<u64, Error> {
        self.eval_inner(term)
    }

    /// Evaluate `term` and check it equals `1` (the 1-bit "true" encoding
    /// `Eq`/`Uge`/`Sge`/`ITE_bv` boolean terms use).
    pub fn holds(&self, term: &Term) -> Result<bool, Error> {
        Ok(self.eval_inner(term)? == 1)
    }

    fn eval_inner(&self, term: &Term) -> Result<u64, Error> {
        let value = match term {
            Term::BitVec { value, .. } => *value,
            Term::Var { name, .. } => *self
                .vars
                .get(name.as_ref())
                .ok_or_else(|| Error::SolverError(format!("unassigned variable: {name}")))?,
            Term::Array { .. } => {
                return Err(Error::SolverError(
                    "array terms are not scalar-evaluable; use eval_byte/select".to_string(),
                ))
            }
            Term::Add(a, b) => self.eval_inner(a)?.wrapping_add(self.eval_inner(b)?),
            Term::Sub(a, b) => self.eval_inner(a)?.wrapping_sub(self.eval_inner(b)?),
            Term::Mul(a, b) => self.eval_inner(a)?.wrapping_mul(self.eval_inner(b)?),
            Term::Udiv(a, b) => {
                let divisor = self.eval_inner(b)?;
                if divisor == 0 {
                    return Err(Error::SolverError("division by zero".to_string()));
                }
                self.eval_inner(a)? / divisor
            }
            Term::Urem(a, b) => {
                let divisor = self.eval_inner(b)?;
                if divisor == 0 {
                    return Err(Error::SolverError("division by zero".to_string()));
                }
                self.eval_inner(a)? % divisor
            }
            Term::Neg(a) => mask(term.width(), self.eval_inner(a)?.wrapping_neg()),
            Term::And(a, b) => self.eval_inner(a)? & self.eval_inner(b)?,
            Term::Or(a, b) => self.eval_inner(a)? | self.eval_inner(b)?,
            Term::Xor(a, b) => self.eval_inner(a)? ^ self.eval_inner(b)?,
            Term::Not(a) => mask(term.width(), !self.eval_inner(a)?),
            Term::Shl(a, b) => mask(a.width(), self.eval_inner(a)?.wrapping_shl(self.eval_inner(b)? as u32)),
            Term::Lshr(a, b) => self.eval_inner(a)?.wrapping_shr(self.eval_inner(b)? as u32),
            Term::Eq(a, b) => bool_bit(self.eval_inner(a)? == self.eval_inner(b)?),
            Term::Uge(a, b) => bool_bit(self.eval_inner(a)? >= self.eval_inner(b)?),
            Term::Sge(a, b) => {
                let width = a.width();
                let signed_a = sign_extend_to_i64(self.eval_inner(a)?, width);
                let signed_b = sign_extend_to_i64(self.eval_inner(b)?, width);
                bool_bit(signed_a >= signed_b)
            }
            Term::Extract { term: inner, lo, width } => {
                let value = self.eval_inner(inner)?;
                mask(*width, value >> lo)
            }
            Term::Zextend { term: inner, .. } => self.eval_inner(inner)?,
            Term::IteBv {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                if self.eval_inner(cond)? == 1 {
                    self.eval_inner(then_branch)?
                } else {
                    self.eval_inner(else_branch)?
                }
            }
            Term::Select { array, address } => {
                let name = array_name(array)?;
                let addr = self.eval_inner(address)?;
                self.arrays
                    .get(name)
                    .and_then(|bytes| bytes.get(&addr))
                    .copied()
                    .unwrap_or(0) as u64
            }
            Term::Store { .. } => {
                return Err(Error::SolverError(
                    "store terms denote a new array, not a scalar; evaluate a Select against the \
                     resulting array's Model assignment instead"
                        .to_string(),
                ))
            }
        };
        Ok(mask(term.width(), value))
    }
}

fn array_name(term: &Term) -> Result<&str, Error> {
    match term {
        Term::Array { name, .. } => Ok(name),
        _ => Err(Error::SolverError("expected an array term".to_string())),
    }
}

fn mask(width: u32, value: u64) -> u64 {
    if width == 0 {
        0
    } else if width >= 64 {
        value
    } else {
        value & ((1u64 << width) - 1)
    }
}

fn bool_bit(b: bool) -> u64 {
    if b {
        1
    } else {
        0
    }
}

fn sign_extend_to_i64(value: u64, width: u32) -> i64 {
    if width == 0 || width >= 64 {
        return value as i64;
    }
    let shift = 64 - width;
    ((value << shift) as i64) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smt::term::*;

    #[test]
    fn evaluates_arithmetic() {
        let model = Model::new();
        let t = Term::bitvec(32, 3) + Term::bitvec(32, 5);
        assert_eq!(model.eval(&t).unwrap(), 8);
    }

    #[test]
    fn signed_comparison_treats_high_bit_as_sign() {
        let model = Model::new();
        // -1 as an 8-bit value is 0xFF; as unsigned it's >= 0, as signed it
        // is < 0.
        let neg_one = Term::bitvec(8, 0xFF);
        let zero = Term::bitvec(8, 0);
        assert_eq!(model.eval(&uge(neg_one.clone(), zero.clone())).unwrap(), 1);
        assert_eq!(model.eval(&sge(neg_one, zero)).unwrap(), 0);
    }

    #[test]
    fn select_reads_assigned_bytes_and_defaults_to_zero() {
        let mut model = Model::new();
        model.set_byte("MEM_0", 0x10, 0xAB);
        let array = Term::Array {
            name: "MEM_0".into(),
            addr_size: 32,
        };
        let read = select(array.clone(), Term::bitvec(32, 0x10));
        assert_eq!(model.eval(&read).unwrap(), 0xAB);
        let unset = select(array, Term::bitvec(32, 0x11));
        assert_eq!(model.eval(&unset).unwrap(), 0);
    }
}
