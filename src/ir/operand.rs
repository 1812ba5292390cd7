//! IR operands: `Immediate`, `Register`, and `Empty`.

use derive_more::Display;

use crate::error::Error;

/// An operand of an IR instruction.
///
/// Equality is structural: two operands are equal iff they share the same
/// variant, size, and (value | name).
#[derive(Clone, Debug, Display, Eq, PartialEq, Hash)]
pub enum Operand {
    /// A constant, stored in two's-complement modulo `2^size`.
    #[display("{value:#x}")]
    Immediate { value: u64, size: u32 },
    /// A symbolic register, identified by name. The architecture
    /// descriptor may map this name onto a sub-range of a wider base
    /// register; if it does not, the name denotes an independent symbol
    /// of `size` bits.
    #[display("{name}")]
    Register { name: String, size: u32 },
    /// An unused operand slot.
    #[display("empty")]
    Empty,
}

impl Operand {
    /// Build an [`Operand::Immediate`], normalizing `value` modulo `2^size`.
    ///
    /// `value` is taken as the bit pattern of a two's-complement integer of
    /// width `size`: pass a negative number's `i64` bits (e.g. `(-1i64) as
    /// u64`) to get two's-complement wraparound, or an already-non-negative
    /// `u64` for an unsigned literal.
    pub fn immediate(value: i64, size: u32) -> Result<Operand, Error> {
        if size == 0 {
            return Err(Error::InvalidOperandType {
                context: "Immediate",
                detail: "size must be positive".to_string(),
            });
        }
        let normalized = normalize(value as u64, size);
        Ok(Operand::Immediate {
            value: normalized,
            size,
        })
    }

    /// Build an [`Operand::Immediate`] directly from an already-unsigned bit
    /// pattern, normalizing modulo `2^size`.
    pub fn immediate_unsigned(value: u64, size: u32) -> Result<Operand, Error> {
        if size == 0 {
            return Err(Error::InvalidOperandType {
                context: "Immediate",
                detail: "size must be positive".to_string(),
            });
        }
        Ok(Operand::Immediate {
            value: normalize(value, size),
            size,
        })
    }

    /// Build an [`Operand::Register`].
    pub fn register(name: impl Into<String>, size: u32) -> Result<Operand, Error> {
        if size == 0 {
            return Err(Error::InvalidOperandType {
                context: "Register",
                detail: "size must be positive".to_string(),
            });
        }
        Ok(Operand::Register {
            name: name.into(),
            size,
        })
    }

    /// The bit-width of this operand, or `None` for [`Operand::Empty`].
    pub fn size(&self) -> Option<u32> {
        match self {
            Operand::Immediate { size, .. } => Some(*size),
            Operand::Register { size, .. } => Some(*size),
            Operand::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Operand::Empty)
    }
}

/// Normalize `value`'s low `size` bits modulo `2^size` (size in `1..=64`).
fn normalize(value: u64, size: u32) -> u64 {
    if size >= 64 {
        value
    } else {
        value & ((1u64 << size) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_normalizes_negative_values() {
        let op = Operand::immediate(-1, 8).unwrap();
        assert_eq!(op, Operand::Immediate { value: 0xFF, size: 8 });
    }

    #[test]
    fn immediate_normalizes_overflow() {
        let op = Operand::immediate_unsigned(0x1_00, 8).unwrap();
        assert_eq!(op, Operand::Immediate { value: 0, size: 8 });
    }

    #[test]
    fn equality_is_structural() {
        let a = Operand::register("eax", 32).unwrap();
        let b = Operand::register("eax", 32).unwrap();
        let c = Operand::register("eax", 16).unwrap();
        let d = Operand::register("ebx", 32).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_ne!(a, Operand::Empty);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(Operand::register("eax", 0).is_err());
        assert!(Operand::immediate(0, 0).is_err());
    }

    #[test]
    fn empty_has_no_size() {
        assert_eq!(Operand::Empty.size(), None);
        assert!(Operand::Empty.is_empty());
    }
}
