use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    Next,
    Previous,
}

/// Emitted on every successful `next` / `previous` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub direction: NavDirection,
    pub from_step: usize,
    pub to_step: usize,
}

/// Tracks the current step of a multi-step popup.
///
/// `step` is always inside `[0, len)` when `len > 0`, and `0` otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepNavigator {
    step: usize,
    len: usize,
}

impl StepNavigator {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { step: 0, len }
    }

    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.step == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.step + 1 >= self.len
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<NavigationEvent> {
        if self.is_last() {
            return None;
        }
        let from_step = self.step;
        self.step += 1;
        Some(NavigationEvent {
            direction: NavDirection::Next,
            from_step,
            to_step: self.step,
        })
    }

    pub fn previous(&mut self) -> Option<NavigationEvent> {
        if self.is_first() {
            return None;
        }
        let from_step = self.step;
        self.step -= 1;
        Some(NavigationEvent {
            direction: NavDirection::Previous,
            from_step,
            to_step: self.step,
        })
    }

    /// Jump straight to `step`. Out-of-range requests are ignored.
    pub fn go_to(&mut self, step: usize) -> bool {
        if step < self.len {
            self.step = step;
            true
        } else {
            false
        }
    }

    /// Re-sync after the draft changed: a shrunk section list or multi-step
    /// being switched off sends the navigator back to the first step.
    pub fn sync(&mut self, len: usize, is_multi_step: bool) {
        self.len = len;
        if !is_multi_step || self.step >= len {
            self.step = 0;
        }
    }

    /// The popup became visible again.
    pub fn open(&mut self) {
        self.step = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_stops_at_last_step() {
        let mut nav = StepNavigator::new(3);
        assert_eq!(
            nav.next(),
            Some(NavigationEvent {
                direction: NavDirection::Next,
                from_step: 0,
                to_step: 1
            })
        );
        assert!(nav.next().is_some());
        assert_eq!(nav.next(), None);
        assert_eq!(nav.step(), 2);
    }

    #[test]
    fn previous_stops_at_zero() {
        let mut nav = StepNavigator::new(2);
        assert_eq!(nav.previous(), None);
        nav.next();
        let event = nav.previous().expect("moved back");
        assert_eq!(event.direction, NavDirection::Previous);
        assert_eq!((event.from_step, event.to_step), (1, 0));
    }

    #[test]
    fn go_to_ignores_out_of_range() {
        let mut nav = StepNavigator::new(3);
        assert!(nav.go_to(2));
        assert!(!nav.go_to(3));
        assert!(!nav.go_to(usize::MAX));
        assert_eq!(nav.step(), 2);
    }

    #[test]
    fn steps_never_leave_bounds() {
        let mut nav = StepNavigator::new(4);
        for i in 0..20 {
            if i % 3 == 0 {
                nav.previous();
            } else {
                nav.next();
            }
            assert!(nav.step() < nav.len());
        }
    }

    #[test]
    fn sync_resets_when_list_shrinks() {
        let mut nav = StepNavigator::new(3);
        nav.go_to(2);
        nav.sync(2, true);
        assert_eq!(nav.step(), 0);
    }

    #[test]
    fn sync_resets_when_multi_step_turned_off() {
        let mut nav = StepNavigator::new(3);
        nav.go_to(1);
        nav.sync(3, false);
        assert_eq!(nav.step(), 0);
    }

    #[test]
    fn sync_keeps_step_when_still_valid() {
        let mut nav = StepNavigator::new(3);
        nav.go_to(1);
        nav.sync(4, true);
        assert_eq!(nav.step(), 1);
    }

    #[test]
    fn open_resets_to_first_step() {
        let mut nav = StepNavigator::new(3);
        nav.go_to(2);
        nav.open();
        assert_eq!(nav.step(), 0);
    }

    #[test]
    fn empty_navigator_never_moves() {
        let mut nav = StepNavigator::new(0);
        assert!(nav.is_empty());
        assert_eq!(nav.next(), None);
        assert_eq!(nav.previous(), None);
        assert!(!nav.go_to(0));
    }
}
