//! Common definitions shared across the IR, the architecture descriptor,
//! and the translator.

// Use sorted maps/sets for deterministic iteration order wherever one is
// walked — translation output must not depend on hash-map iteration order.
pub use std::collections::{BTreeMap as Map, BTreeSet as Set};
