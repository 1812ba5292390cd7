//! The closed set of IR mnemonics.

use derive_more::Display;

use crate::error::Error;

/// An IR mnemonic.
///
/// Bidirectional string conversion ([`Mnemonic::as_str`]/
/// [`Mnemonic::from_str`]) is total over this set: every variant has a
/// lowercase string form, and every such string parses back to the same
/// variant.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Mnemonic {
    // Arithmetic instructions
    #[display("add")]
    Add,
    #[display("sub")]
    Sub,
    #[display("mul")]
    Mul,
    #[display("div")]
    Div,
    #[display("mod")]
    Mod,
    #[display("bsh")]
    Bsh,

    // Bitwise instructions
    #[display("and")]
    And,
    #[display("or")]
    Or,
    #[display("xor")]
    Xor,

    // Data transfer instructions
    #[display("ldm")]
    Ldm,
    #[display("stm")]
    Stm,
    #[display("str")]
    Str,

    // Conditional instructions
    #[display("bisz")]
    Bisz,
    #[display("jcc")]
    Jcc,

    // Other instructions
    #[display("unkn")]
    Unkn,
    #[display("undef")]
    Undef,
    #[display("nop")]
    Nop,

    // Ad hoc instructions
    #[display("ret")]
    Ret,
}

/// Arity class of a mnemonic, used by the instruction builder to
/// validate operand slots.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arity {
    /// All three operand slots carry meaningful operands.
    Three,
    /// Only the first and third slots are used; the second is `Empty`.
    SrcDst,
    /// All three slots are `Empty`.
    None,
}

impl Mnemonic {
    /// All mnemonics in the closed set.
    pub const ALL: [Mnemonic; 18] = [
        Mnemonic::Add,
        Mnemonic::Sub,
        Mnemonic::Mul,
        Mnemonic::Div,
        Mnemonic::Mod,
        Mnemonic::Bsh,
        Mnemonic::And,
        Mnemonic::Or,
        Mnemonic::Xor,
        Mnemonic::Ldm,
        Mnemonic::Stm,
        Mnemonic::Str,
        Mnemonic::Bisz,
        Mnemonic::Jcc,
        Mnemonic::Unkn,
        Mnemonic::Undef,
        Mnemonic::Nop,
        Mnemonic::Ret,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Add => "add",
            Mnemonic::Sub => "sub",
            Mnemonic::Mul => "mul",
            Mnemonic::Div => "div",
            Mnemonic::Mod => "mod",
            Mnemonic::Bsh => "bsh",
            Mnemonic::And => "and",
            Mnemonic::Or => "or",
            Mnemonic::Xor => "xor",
            Mnemonic::Ldm => "ldm",
            Mnemonic::Stm => "stm",
            Mnemonic::Str => "str",
            Mnemonic::Bisz => "bisz",
            Mnemonic::Jcc => "jcc",
            Mnemonic::Unkn => "unkn",
            Mnemonic::Undef => "undef",
            Mnemonic::Nop => "nop",
            Mnemonic::Ret => "ret",
        }
    }

    pub fn from_str(s: &str) -> Result<Mnemonic, Error> {
        Ok(match s {
            "add" => Mnemonic::Add,
            "sub" => Mnemonic::Sub,
            "mul" => Mnemonic::Mul,
            "div" => Mnemonic::Div,
            "mod" => Mnemonic::Mod,
            "bsh" => Mnemonic::Bsh,
            "and" => Mnemonic::And,
            "or" => Mnemonic::Or,
            "xor" => Mnemonic::Xor,
            "ldm" => Mnemonic::Ldm,
            "stm" => Mnemonic::Stm,
            "str" => Mnemonic::Str,
            "bisz" => Mnemonic::Bisz,
            "jcc" => Mnemonic::Jcc,
            "unkn" => Mnemonic::Unkn,
            "undef" => Mnemonic::Undef,
            "nop" => Mnemonic::Nop,
            "ret" => Mnemonic::Ret,
            other => return Err(Error::InvalidMnemonic(other.to_string())),
        })
    }

    /// The fixed arity class this mnemonic belongs to.
    pub fn arity(self) -> Arity {
        match self {
            Mnemonic::Add
            | Mnemonic::Sub
            | Mnemonic::Mul
            | Mnemonic::Div
            | Mnemonic::Mod
            | Mnemonic::Bsh
            | Mnemonic::And
            | Mnemonic::Or
            | Mnemonic::Xor => Arity::Three,
            Mnemonic::Ldm
            | Mnemonic::Stm
            | Mnemonic::Str
            | Mnemonic::Bisz
            | Mnemonic::Jcc => Arity::SrcDst,
            Mnemonic::Unkn | Mnemonic::Undef | Mnemonic::Nop | Mnemonic::Ret => Arity::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_total() {
        for m in Mnemonic::ALL {
            assert_eq!(Mnemonic::from_str(m.as_str()).unwrap(), m);
        }
    }

    #[test]
    fn to_string_is_injective() {
        let mut seen = std::collections::BTreeSet::new();
        for m in Mnemonic::ALL {
            assert!(seen.insert(m.as_str()), "duplicate string form: {}", m.as_str());
        }
    }

    #[test]
    fn from_string_rejects_unknown() {
        assert!(Mnemonic::from_str("wat").is_err());
    }

    #[test]
    fn display_matches_as_str() {
        for m in Mnemonic::ALL {
            assert_eq!(m.to_string(), m.as_str());
        }
    }
}
