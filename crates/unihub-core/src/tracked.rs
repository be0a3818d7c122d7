/// A value with a revision counter.
///
/// `set` only bumps the revision when the new value differs, so anything keyed
/// on the revision (effects, memoized views) re-runs exactly when the value
/// changed.
#[derive(Debug, Clone, Default)]
pub struct Tracked<T> {
    value: T,
    revision: u64,
}

impl<T: PartialEq> Tracked<T> {
    pub fn new(value: T) -> Self {
        Self { value, revision: 0 }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.revision = self.revision.wrapping_add(1);
        true
    }

    pub fn update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set(next)
    }
}

#[cfg(test)]
mod tests {
    use super::Tracked;

    #[test]
    fn set_with_same_value_keeps_revision() {
        let mut tracked = Tracked::new("a".to_string());
        assert!(!tracked.set("a".to_string()));
        assert_eq!(tracked.revision(), 0);

        assert!(tracked.set("b".to_string()));
        assert_eq!(tracked.revision(), 1);
        assert_eq!(tracked.value(), "b");
    }

    #[test]
    fn update_derives_from_previous_value() {
        let mut tracked = Tracked::new(1u32);
        assert!(tracked.update(|value| value + 1));
        assert_eq!(*tracked.value(), 2);
    }
}
