use crate::error::{Error, Result};
use crate::options::ParseOptions;

/// Accounts for entity replacement text against the size of the input.
///
/// Every substitution is bracketed by [`enter`](Self::enter) and [`exit`](Self::exit).
#[derive(Clone, Debug)]
pub struct EntityExpansionGuard {
    initial: usize,
    expanded: usize,
    threshold: usize,
    max_amplification: f64,
    depth: usize,
    outermost: Option<String>,
}

impl EntityExpansionGuard {
    pub fn new(initial: usize, options: &ParseOptions) -> Self {
        EntityExpansionGuard {
            initial: initial.max(1),
            expanded: 0,
            threshold: options.entity_expansion_threshold,
            max_amplification: options.entity_expansion_max_amplification,
            depth: 0,
            outermost: None,
        }
    }

    /// Records the substitution of `entity` by `replacement_len` characters.
    ///
    /// Fails once the total exceeds the threshold and the amplification ratio at the same time.
    pub fn enter(&mut self, entity: &str, replacement_len: usize) -> Result<()> {
        if self.depth == 0 {
            self.outermost = Some(entity.to_string());
        }
        self.depth += 1;
        self.expanded += replacement_len;

        let ratio = self.expanded as f64 / self.initial as f64;
        if self.expanded > self.threshold && ratio > self.max_amplification {
            return Err(Error::EntityExpansion {
                entity: self
                    .outermost
                    .clone()
                    .unwrap_or_else(|| entity.to_string()),
                expanded: self.expanded,
                initial: self.initial,
            });
        }

        Ok(())
    }

    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.outermost = None;
        }
    }

    pub fn expanded(&self) -> usize {
        self.expanded
    }
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn options(threshold: usize, ratio: f64) -> ParseOptions {
        ParseOptions::new()
            .entity_expansion_threshold(threshold)
            .entity_expansion_max_amplification(ratio)
    }

    #[test]
    fn test_below_threshold() {
        let mut guard = EntityExpansionGuard::new(1, &options(100, 1.0));
        guard.enter("a", 60).unwrap();
        guard.enter("b", 40).unwrap();
        assert_eq!(100, guard.expanded());
        guard.exit();
        guard.exit();
    }

    #[test]
    fn test_below_ratio() {
        let mut guard = EntityExpansionGuard::new(100, &options(10, 5.0));
        guard.enter("a", 500).unwrap();
        guard.exit();
    }

    #[test]
    fn test_outermost_reported() {
        let mut guard = EntityExpansionGuard::new(10, &options(20, 2.0));
        guard.enter("outer", 10).unwrap();
        guard.enter("inner", 5).unwrap();
        guard.exit();
        let err = guard.enter("inner", 10).err().unwrap();
        assert_eq!(ErrorKind::ResourceLimit, err.kind());
        assert_eq!(
            Error::EntityExpansion {
                entity: "outer".to_string(),
                expanded: 25,
                initial: 10,
            },
            err
        );
    }

    #[test]
    fn test_outermost_cleared() {
        let mut guard = EntityExpansionGuard::new(1, &options(3, 1.0));
        guard.enter("a", 1).unwrap();
        guard.exit();
        let err = guard.enter("b", 3).err().unwrap();
        match err {
            Error::EntityExpansion { entity, .. } => assert_eq!("b", entity),
            _ => unreachable!(),
        }
    }
}

// -----------------------------------------------------------------------------------------------
