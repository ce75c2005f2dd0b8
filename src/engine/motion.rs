//! Reduced-motion preference
//!
//! One boolean shared by the sampler and every strategy. The host's change
//! subscription is the only writer.

use std::cell::Cell;
use std::rc::Rc;

/// Live handle to the system reduced-motion setting
#[derive(Debug, Clone, Default)]
pub struct MotionPreference {
    reduced: Rc<Cell<bool>>,
}

impl MotionPreference {
    /// Seed from the value read synchronously at mount
    pub fn new(initial: bool) -> Self {
        Self {
            reduced: Rc::new(Cell::new(initial)),
        }
    }

    pub fn is_reduced_motion_preferred(&self) -> bool {
        self.reduced.get()
    }

    /// Apply a change notification. Returns true if the value flipped.
    pub fn set(&self, reduced: bool) -> bool {
        self.reduced.replace(reduced) != reduced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_observe_updates() {
        let pref = MotionPreference::new(false);
        let reader = pref.clone();
        assert!(!reader.is_reduced_motion_preferred());

        assert!(pref.set(true));
        assert!(reader.is_reduced_motion_preferred());
    }

    #[test]
    fn test_set_reports_only_changes() {
        let pref = MotionPreference::new(true);
        assert!(!pref.set(true));
        assert!(pref.set(false));
        assert!(!pref.set(false));
    }
}
