//! The SMT translator: converts IR instructions into SMT assertions,
//! managing memory versioning and register aliasing along the way.

mod encode;

use tracing::{debug, trace};

use crate::arch::{ArchitectureDescriptor, RegisterAccess};
use crate::error::Error;
use crate::ir::{Instruction, Operand};
use crate::namer::VariableNamer;
use crate::smt::{term, SmtBackend, Term};

/// Translator state: owns the backend and architecture descriptor
/// exclusively — no term ever references the translator back.
pub struct Translator<B: SmtBackend, A: ArchitectureDescriptor> {
    backend: B,
    arch: A,
    address_size: u32,
    memory: Term,
    memory_initial: Term,
    mem_instance: u64,
    namers: crate::common::Map<String, VariableNamer>,
}

/// The destination half of operand translation: a fresh bit-vector term
/// for the write, plus the preservation constraints (if any) that must
/// hold for the parent register's untouched bytes.
struct DstTranslation {
    term: Term,
    preservation: Vec<Term>,
}

impl<B: SmtBackend, A: ArchitectureDescriptor> Translator<B, A> {
    pub fn new(backend: B, arch: A) -> Self {
        let address_size = arch.address_size();
        let mut backend = backend;
        let (memory, memory_initial) = backend.mk_array(address_size, "MEM_0");
        Translator {
            backend,
            arch,
            address_size,
            memory,
            memory_initial,
            mem_instance: 0,
            namers: crate::common::Map::new(),
        }
    }

    /// Translate one IR instruction into SMT assertions, asserting them
    /// into the backend as a side effect.
    ///
    /// Preconditions (arity, operand variant, width discipline) are
    /// checked while building the assertion list; if any check fails, no
    /// assertion reaches the backend.
    pub fn translate(&mut self, instr: &Instruction) -> Result<Vec<Term>, Error> {
        trace!(mnemonic = %instr.mnemonic, "translating instruction");
        let assertions = encode::dispatch(self, instr)?;
        for assertion in &assertions {
            self.backend.assert_term(assertion.clone())?;
        }
        debug!(mnemonic = %instr.mnemonic, count = assertions.len(), "asserted");
        Ok(assertions)
    }

    /// The current-version SSA name for `name`, e.g. `"eax_3"`.
    pub fn current_name(&mut self, name: &str) -> String {
        self.namer(name).current()
    }

    /// The initial SSA name for `name`, e.g. `"eax_0"`.
    pub fn init_name(&mut self, name: &str) -> String {
        self.namer(name).init()
    }

    /// The current memory array handle.
    pub fn memory(&self) -> Term {
        self.memory.clone()
    }

    /// The immutable initial memory array handle (`MEM_0`).
    pub fn memory_initial(&self) -> Term {
        self.memory_initial.clone()
    }

    /// A term for a `Register`/`Immediate` operand without asserting
    /// anything — for callers (e.g. path-condition construction) that
    /// need a term but are not translating a full instruction.
    pub fn to_bitvec(&mut self, operand: &Operand) -> Result<Term, Error> {
        self.translate_src_operand(operand)
    }

    /// Full clear: resets the backend, rebuilds a fresh memory array at
    /// version 0, and clears all SSA name counters.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.backend.reset(true)?;
        self.mem_instance = 0;
        let (memory, memory_initial) = self.backend.mk_array(self.address_size, "MEM_0");
        self.memory = memory;
        self.memory_initial = memory_initial;
        self.namers.clear();
        Ok(())
    }

    fn namer(&mut self, name: &str) -> &mut VariableNamer {
        self.namers
            .entry(name.to_string())
            .or_insert_with(|| VariableNamer::new(name))
    }

    /// Resolve an alias name to its base register's access info, or `None`
    /// if the name is an independent symbol.
    fn access(&self, name: &str) -> Option<RegisterAccess> {
        self.arch.access(name)
    }

    fn base_size(&self, base_name: &str, fallback: u32) -> u32 {
        self.arch.register_size(base_name).unwrap_or(fallback)
    }

    /// Translate a source operand into a bit-vector term.
    fn translate_src_operand(&mut self, operand: &Operand) -> Result<Term, Error> {
        match operand {
            Operand::Immediate { value, size } => Ok(Term::bitvec(*size, *value)),
            Operand::Register { name, size } => match self.access(name) {
                Some(RegisterAccess { base, shift, .. }) => {
                    let base_size = self.base_size(&base, *size + shift);
                    let base_name = self.current_name(&base);
                    let base_term = self.backend.mk_bitvec(base_size, &base_name);
                    Ok(term::extract(base_term, shift, *size))
                }
                None => {
                    let var_name = self.current_name(name);
                    Ok(self.backend.mk_bitvec(*size, &var_name))
                }
            },
            Operand::Empty => Err(Error::InvalidOperandType {
                context: "source operand",
                detail: "Empty cannot be translated to a term".to_string(),
            }),
        }
    }

    /// Translate a destination operand into a fresh term and its
    /// preservation constraints.
    fn translate_dst_operand(&mut self, operand: &Operand) -> Result<DstTranslation, Error> {
        let (name, size) = match operand {
            Operand::Register { name, size } => (name.clone(), *size),
            Operand::Immediate { .. } => {
                return Err(Error::InvalidOperandType {
                    context: "destination operand",
                    detail: "Immediate cannot be a destination".to_string(),
                })
            }
            Operand::Empty => {
                return Err(Error::InvalidOperandType {
                    context: "destination operand",
                    detail: "Empty cannot be a destination".to_string(),
                })
            }
        };

        match self.access(&name) {
            Some(RegisterAccess { base, shift, .. }) => {
                let base_size = self.base_size(&base, size + shift);
                let old_name = self.current_name(&base);
                let old_base = self.backend.mk_bitvec(base_size, &old_name);

                let new_name = self.namer(&base).next();
                let new_base = self.backend.mk_bitvec(base_size, &new_name);

                let dst_term = term::extract(new_base.clone(), shift, size);

                let mut preservation = Vec::new();
                let mut i = 0;
                while i < base_size {
                    if !(i >= shift && i < shift + size) {
                        let new_byte = term::extract(new_base.clone(), i, 8);
                        let old_byte = term::extract(old_base.clone(), i, 8);
                        preservation.push(term::eq(new_byte, old_byte));
                    }
                    i += 8;
                }

                Ok(DstTranslation {
                    term: dst_term,
                    preservation,
                })
            }
            None => {
                let new_name = self.namer(&name).next();
                let new_term = self.backend.mk_bitvec(size, &new_name);
                Ok(DstTranslation {
                    term: new_term,
                    preservation: Vec::new(),
                })
            }
        }
    }
}

fn require_size(operand: &Operand, context: &'static str) -> Result<u32, Error> {
    operand.size().ok_or_else(|| Error::InvalidOperandType {
        context,
        detail: "operand must not be Empty".to_string(),
    })
}

fn require_equal_size(a: u32, b: u32, mnemonic: &'static str) -> Result<(), Error> {
    if a != b {
        return Err(Error::WidthMismatch {
            mnemonic,
            detail: format!("source sizes differ: {a} vs {b}"),
        });
    }
    Ok(())
}
