// ─────────────────────────────────────────────────────────────────────
// Morpho Kernel — Shared Morphology Handle
// ─────────────────────────────────────────────────────────────────────
//! Library-level access contract: read-only analysis may run
//! concurrently, a repair pass holds exclusive access for its whole
//! duration.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::morphology::Morphology;

/// Cloneable handle to one morphology guarded by a `parking_lot::RwLock`.
#[derive(Debug, Clone)]
pub struct SharedMorphology {
    inner: Arc<RwLock<Morphology>>,
}

impl SharedMorphology {
    pub fn new(morphology: Morphology) -> Self {
        Self {
            inner: Arc::new(RwLock::new(morphology)),
        }
    }

    /// Run a read-only query under a shared lock.
    pub fn read<R>(&self, f: impl FnOnce(&Morphology) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run a mutating pass under the exclusive lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut Morphology) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Run `f` on a working copy with no lock held, then store the copy.
    ///
    /// `f` may call `read` on this handle. The stored state is the working
    /// copy, so writes made through the handle while `f` runs are lost. On
    /// error nothing is stored.
    pub fn edit_detached<R, E>(
        &self,
        f: impl FnOnce(&mut Morphology) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut working = self.snapshot();
        let value = f(&mut working)?;
        *self.inner.write() = working;
        Ok(value)
    }

    /// Clone the current state out of the lock.
    pub fn snapshot(&self) -> Morphology {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::section::SectionArena;
    use crate::soma::Soma;

    fn morphology() -> Morphology {
        let soma = Soma::new(Point3::origin(), 1.0, vec![Point3::new(1.0, 0.0, 0.0)], vec![]).unwrap();
        Morphology::new("shared", soma, SectionArena::new(), vec![], vec![], vec![]).unwrap()
    }

    #[test]
    fn test_read_and_write() {
        let shared = SharedMorphology::new(morphology());
        assert_eq!(shared.read(|m| m.label().to_string()), "shared");
        shared.write(|m| m.stats.total_length = Some(3.0));
        assert_eq!(shared.snapshot().stats.total_length, Some(3.0));
    }

    #[test]
    fn test_edit_detached_allows_reads_during_edit() {
        let shared = SharedMorphology::new(morphology());
        let seen: Result<Option<f64>, ()> = shared.edit_detached(|m| {
            m.stats.total_length = Some(5.0);
            Ok(shared.read(|current| current.stats.total_length))
        });
        assert_eq!(seen, Ok(None));
        assert_eq!(shared.snapshot().stats.total_length, Some(5.0));
    }

    #[test]
    fn test_edit_detached_error_stores_nothing() {
        let shared = SharedMorphology::new(morphology());
        let result: Result<(), &str> = shared.edit_detached(|m| {
            m.stats.total_volume = Some(1.0);
            Err("rejected")
        });
        assert_eq!(result, Err("rejected"));
        assert!(shared.snapshot().stats.is_empty());
    }

    #[test]
    fn test_concurrent_readers() {
        let shared = SharedMorphology::new(morphology());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let s = shared.clone();
                std::thread::spawn(move || s.read(|m| m.arbor_count()))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 0);
        }
    }
}
