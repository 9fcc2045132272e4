//! Memoized measurements.

/// A cached derived value with an explicit dirty flag.
///
/// Font and scale factor changes mark measurements dirty; the next read recomputes them. A value of
/// zero is a legitimate measurement and is never mistaken for "unset".
#[derive(Debug, Clone, Default)]
pub struct Memo<T> {
    value: Option<T>,
    dirty: bool,
}

impl<T: Copy> Memo<T> {
    pub fn new() -> Memo<T> {
        Memo {
            value: None,
            dirty: true,
        }
    }

    /// Returns the cached value, recomputing it first if it is dirty.
    pub fn get_or_update(&mut self, compute: impl FnOnce() -> T) -> T {
        match self.value {
            Some(value) if !self.dirty => value,
            _ => {
                let value = compute();
                self.value = Some(value);
                self.dirty = false;
                value
            }
        }
    }

    /// Returns the last computed value, even if it has since been marked dirty.
    pub fn last(&self) -> Option<T> {
        self.value
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty || self.value.is_none()
    }

    /// Marks the value for recomputation on the next read.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }
}
