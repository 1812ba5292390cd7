//! SMT backend interface: the minimal contract an off-the-shelf
//! `QF_ABV` solver must satisfy for the translator to target it.

use super::term::Term;
use crate::error::Error;

/// An abstract SMT solver supporting bit-vector variables, array variables
/// (`addr -> byte`), assertions, and context reset.
///
/// Implementations translate [`Term`] into whatever wire format or FFI
/// call their underlying solver expects; this crate ships one reference
/// implementation, [`crate::smt::reference::ReferenceBackend`], used only
/// by this crate's own tests.
pub trait SmtBackend {
    /// Declare (or look up) a bit-vector variable of the given size.
    fn mk_bitvec(&mut self, size: u32, name: &str) -> Term;

    /// Declare a fresh array `BitVec(addr_size) -> BitVec(8)` under `name`.
    ///
    /// Returns `(current, initial)`: a mutable working handle and an
    /// immutable snapshot of the array at the moment of creation. For a
    /// brand-new array the two coincide.
    fn mk_array(&mut self, addr_size: u32, name: &str) -> (Term, Term);

    /// Assert `term` (expected to have width 1, i.e. a boolean term) into
    /// the solver's current context.
    fn assert_term(&mut self, term: Term) -> Result<(), Error>;

    /// Reset the solver context. `full` clears all declarations in
    /// addition to assertions; the translator always resets with
    /// `full = true`.
    fn reset(&mut self, full: bool) -> Result<(), Error>;
}
