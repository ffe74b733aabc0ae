//! Non-blocking debouncer
//!
//! A raw level must hold for the debounce time before it becomes the new
//! stable level. Sampling never waits; the caller feeds one raw reading per
//! tick together with the current time.

/// Debouncer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// Raw level equals the stable level
    Idle,
    /// Raw level differs from the stable level since `since_ms`
    Debouncing { candidate: bool, since_ms: u32 },
}

/// Debounced digital input
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    stable: bool,
    state: DebounceState,
    debounce_ms: u32,
}

impl Debouncer {
    /// Create a debouncer with an initial stable level
    pub const fn new(initial: bool, debounce_ms: u32) -> Self {
        Self {
            stable: initial,
            state: DebounceState::Idle,
            debounce_ms,
        }
    }

    /// Current stable level
    pub fn level(&self) -> bool {
        self.stable
    }

    /// Current state
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Force the stable level, dropping any pending change
    pub fn reset(&mut self, level: bool) {
        self.stable = level;
        self.state = DebounceState::Idle;
    }

    /// Feed one raw reading
    ///
    /// Returns the new stable level when it changes.
    pub fn update(&mut self, raw: bool, now_ms: u32) -> Option<bool> {
        if raw == self.stable {
            self.state = DebounceState::Idle;
            return None;
        }

        let since_ms = match self.state {
            DebounceState::Debouncing { candidate, since_ms } if candidate == raw => since_ms,
            _ => {
                self.state = DebounceState::Debouncing {
                    candidate: raw,
                    since_ms: now_ms,
                };
                now_ms
            }
        };

        if now_ms.wrapping_sub(since_ms) >= self.debounce_ms {
            self.stable = raw;
            self.state = DebounceState::Idle;
            Some(raw)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_after_hold() {
        let mut db = Debouncer::new(false, 50);

        assert_eq!(db.update(true, 0), None);
        assert_eq!(
            db.state(),
            DebounceState::Debouncing {
                candidate: true,
                since_ms: 0
            }
        );
        assert_eq!(db.update(true, 30), None);
        assert_eq!(db.update(true, 50), Some(true));
        assert!(db.level());
        assert_eq!(db.state(), DebounceState::Idle);

        // Already stable, no repeat
        assert_eq!(db.update(true, 100), None);
    }

    #[test]
    fn test_bounce_restarts_timer() {
        let mut db = Debouncer::new(false, 50);

        db.update(true, 0);
        db.update(false, 20);
        assert_eq!(db.state(), DebounceState::Idle);

        assert_eq!(db.update(true, 30), None);
        assert_eq!(db.update(true, 60), None);
        assert_eq!(db.update(true, 80), Some(true));
    }

    #[test]
    fn test_zero_debounce_is_immediate() {
        let mut db = Debouncer::new(true, 0);
        assert_eq!(db.update(false, 7), Some(false));
    }

    #[test]
    fn test_timer_wraps() {
        let mut db = Debouncer::new(false, 50);
        db.update(true, u32::MAX - 10);
        assert_eq!(db.update(true, 20), None);
        assert_eq!(db.update(true, 40), Some(true));
    }

    #[test]
    fn test_reset() {
        let mut db = Debouncer::new(false, 50);
        db.update(true, 0);
        db.reset(true);
        assert!(db.level());
        assert_eq!(db.state(), DebounceState::Idle);
    }
}
