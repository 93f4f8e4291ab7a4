//! Clamped hit-point pool.

/// Notification produced by every successful write to a [`Life`].
///
/// Writes that clamp back to the current value still produce one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct LifeChanged {
    pub value: i32,
    pub max_value: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Life {
    value: i32,
    max_value: i32,
}

impl Life {
    /// Full life pool. A negative maximum is treated as zero.
    pub fn new(max_value: i32) -> Self {
        let max_value = max_value.max(0);
        Self {
            value: max_value,
            max_value,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    pub fn is_empty(&self) -> bool {
        self.value <= 0
    }

    pub fn is_full(&self) -> bool {
        self.value >= self.max_value
    }

    pub fn set_value(&mut self, value: i32) -> LifeChanged {
        self.value = value.clamp(0, self.max_value);
        self.changed()
    }

    /// Adds `amount` (which may be negative) to the current value.
    pub fn add(&mut self, amount: i32) -> LifeChanged {
        self.set_value(self.value.saturating_add(amount))
    }

    /// Changes the maximum and re-clamps the current value into range.
    pub fn set_max_value(&mut self, max_value: i32) -> LifeChanged {
        self.max_value = max_value.max(0);
        self.set_value(self.value)
    }

    pub fn maximize(&mut self) -> LifeChanged {
        self.set_value(self.max_value)
    }

    fn changed(&self) -> LifeChanged {
        LifeChanged {
            value: self.value,
            max_value: self.max_value,
        }
    }
}
