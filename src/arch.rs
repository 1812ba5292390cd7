//! Architecture descriptor interface, consumed by the translator and
//! provided by the disassembler/lifter side.

use crate::common::Map;

/// How an alias register projects onto a wider base register:
/// `value = (base >> shift) & mask_bits(size)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegisterAccess {
    pub base: String,
    pub mask: u64,
    pub shift: u32,
}

/// Register-size and alias information for one architecture.
///
/// When [`ArchitectureDescriptor::access`] returns `None` for a register
/// name, the translator treats the operand as a first-class independent
/// symbol of its declared size.
pub trait ArchitectureDescriptor {
    /// The architecture's pointer width, in bits.
    fn address_size(&self) -> u32;

    /// The bit-width of a base register, by name.
    fn register_size(&self, base_name: &str) -> Option<u32>;

    /// The alias mapping for a register name, if it is a sub-range of a
    /// wider base register.
    fn access(&self, alias_name: &str) -> Option<RegisterAccess>;
}

/// A table-driven [`ArchitectureDescriptor`] backed by [`Map`]s —
/// the reference implementation most callers reach for first.
#[derive(Clone, Debug, Default)]
pub struct StaticArch {
    address_size: u32,
    register_sizes: Map<String, u32>,
    register_accesses: Map<String, RegisterAccess>,
}

impl StaticArch {
    pub fn new(address_size: u32) -> Self {
        StaticArch {
            address_size,
            register_sizes: Map::new(),
            register_accesses: Map::new(),
        }
    }

    /// Register a base register's size.
    pub fn with_register(mut self, name: impl Into<String>, size: u32) -> Self {
        self.register_sizes.insert(name.into(), size);
        self
    }

    /// Register an alias name that projects onto a base register.
    pub fn with_alias(
        mut self,
        alias: impl Into<String>,
        base: impl Into<String>,
        mask: u64,
        shift: u32,
    ) -> Self {
        self.register_accesses.insert(
            alias.into(),
            RegisterAccess {
                base: base.into(),
                mask,
                shift,
            },
        );
        self
    }
}

impl ArchitectureDescriptor for StaticArch {
    fn address_size(&self) -> u32 {
        self.address_size
    }

    fn register_size(&self, base_name: &str) -> Option<u32> {
        self.register_sizes.get(base_name).copied()
    }

    fn access(&self, alias_name: &str) -> Option<RegisterAccess> {
        self.register_accesses.get(alias_name).cloned()
    }
}
