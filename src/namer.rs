//! SSA-style per-name version counter.

/// Issues successive SSA versions `name_0`, `name_1`, … for one logical
/// name.
#[derive(Clone, Debug)]
pub struct VariableNamer {
    base: String,
    /// `None` until [`VariableNamer::next`] has been called at least once.
    current: Option<u64>,
}

impl VariableNamer {
    pub fn new(base: impl Into<String>) -> Self {
        VariableNamer {
            base: base.into(),
            current: None,
        }
    }

    /// The fixed `name_0` form. Never changes, regardless of how many
    /// times [`VariableNamer::next`] has been called.
    pub fn init(&self) -> String {
        format!("{}_0", self.base)
    }

    /// The most recently issued version, or `name_0` if [`next`] has never
    /// been called.
    ///
    /// [`next`]: VariableNamer::next
    pub fn current(&self) -> String {
        match self.current {
            Some(v) => format!("{}_{}", self.base, v),
            None => self.init(),
        }
    }

    /// Issue and return a fresh, strictly greater version.
    pub fn next(&mut self) -> String {
        let next_version = self.current.map_or(1, |v| v + 1);
        self.current = Some(next_version);
        format!("{}_{}", self.base, next_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_fixed() {
        let mut namer = VariableNamer::new("eax");
        assert_eq!(namer.init(), "eax_0");
        namer.next();
        namer.next();
        assert_eq!(namer.init(), "eax_0");
    }

    #[test]
    fn current_defaults_to_version_zero() {
        let namer = VariableNamer::new("eax");
        assert_eq!(namer.current(), "eax_0");
    }

    #[test]
    fn current_is_idempotent_between_next_calls() {
        let mut namer = VariableNamer::new("eax");
        namer.next();
        let a = namer.current();
        let b = namer.current();
        assert_eq!(a, b);
    }

    #[test]
    fn successive_versions_strictly_increase() {
        let mut namer = VariableNamer::new("t");
        let mut versions = vec![];
        for _ in 0..5 {
            let name = namer.next();
            let v: u64 = name.rsplit('_').next().unwrap().parse().unwrap();
            versions.push(v);
        }
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
