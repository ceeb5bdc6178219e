use crate::settings::{NavigationSettings, DEFAULT_STACK_CAPACITY, DEFAULT_TITLE_CAPACITY};
use thiserror::Error;

/// Label reported for the current screen when there is no usable title.
pub const ROOT_TITLE: &str = "Root";

/// Id reported for the current screen while at the root.
pub const ROOT_ID: i32 = 0;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    #[error("navigation stack capacity must be at least 1")]
    ZeroCapacity,
}

/// One pushed screen.
///
/// The title text lives in a slot-owned `String` whose capacity survives
/// pops, so re-pushing a similarly sized title does not allocate.
#[derive(Debug, Clone, Default)]
pub struct ScreenEntry {
    id: i32,
    title: String,
    titled: bool,
}

impl ScreenEntry {
    fn with_title_capacity(capacity: usize) -> Self {
        ScreenEntry {
            id: ROOT_ID,
            title: String::with_capacity(capacity),
            titled: false,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    /// The title given on push, if any. May be present but empty.
    pub fn title(&self) -> Option<&str> {
        self.titled.then_some(self.title.as_str())
    }

    fn fill(&mut self, id: i32, title: Option<&str>) {
        self.id = id;
        self.title.clear();
        if let Some(title) = title {
            self.title.push_str(title);
        }
        self.titled = title.is_some();
    }

    fn clear(&mut self) {
        self.id = ROOT_ID;
        self.title.clear();
        self.titled = false;
    }
}

/// Fixed-capacity LIFO record of the screens above the root.
///
/// All slots are allocated once in [`NavigationStack::new`]; the stack never
/// grows. Hitting the capacity on `push` or the root on `pop` is an ordinary
/// outcome reported as `false`, not an error.
///
/// ```txt
///   depth = 2, capacity = 4
///   +---------+---------+---------+---------+
///   | (1,Nav) | (2, -)  |  empty  |  empty  |
///   +---------+---------+---------+---------+
///     index 0   top                 cleared
/// ```
#[derive(Debug, Clone)]
pub struct NavigationStack {
    slots: Box<[ScreenEntry]>,
    depth: usize,
}

impl NavigationStack {
    /// Builds a stack holding at most `capacity` screens.
    pub fn new(capacity: usize) -> Result<Self, NavigationError> {
        Self::with_title_capacity(capacity, DEFAULT_TITLE_CAPACITY)
    }

    /// Builds a stack and reserves `title_capacity` bytes in every title slot.
    pub fn with_title_capacity(
        capacity: usize,
        title_capacity: usize,
    ) -> Result<Self, NavigationError> {
        if capacity == 0 {
            return Err(NavigationError::ZeroCapacity);
        }

        Ok(Self::allocate(capacity, title_capacity))
    }

    fn allocate(capacity: usize, title_capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| ScreenEntry::with_title_capacity(title_capacity))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        NavigationStack { slots, depth: 0 }
    }

    pub fn from_settings(settings: &NavigationSettings) -> Result<Self, NavigationError> {
        Self::with_title_capacity(settings.capacity, settings.title_capacity)
    }

    /// Pushes a screen on top of the stack.
    ///
    /// The title is copied into the slot, so the caller is free to reuse
    /// its own buffer afterwards. Returns `false` and leaves the stack
    /// untouched when it is full.
    pub fn push(&mut self, id: i32, title: Option<&str>) -> bool {
        if self.is_full() {
            tracing::debug!(
                id,
                capacity = self.capacity(),
                "navigation stack full, push ignored"
            );
            return false;
        }

        self.slots[self.depth].fill(id, title);
        self.depth += 1;
        tracing::trace!(id, depth = self.depth, "pushed screen");

        true
    }

    /// Drops the top screen. Returns `false` when already at the root.
    pub fn pop(&mut self) -> bool {
        if self.is_root() {
            tracing::debug!("navigation stack empty, pop ignored");
            return false;
        }

        self.depth -= 1;
        self.slots[self.depth].clear();
        tracing::trace!(depth = self.depth, "popped screen");

        true
    }

    /// Returns to the root, clearing every pushed screen.
    pub fn reset(&mut self) {
        if self.is_root() {
            return;
        }

        for slot in &mut self.slots[..self.depth] {
            slot.clear();
        }
        self.depth = 0;
        tracing::trace!("navigation stack reset");
    }

    /// Id of the top screen, or [`ROOT_ID`] at the root.
    pub fn current_id(&self) -> i32 {
        self.top().map_or(ROOT_ID, ScreenEntry::id)
    }

    /// Title of the top screen.
    ///
    /// Falls back to [`ROOT_TITLE`] both at the root and when the top
    /// screen was pushed without a title, so it can't tell those apart.
    pub fn current_title(&self) -> &str {
        self.top().and_then(ScreenEntry::title).unwrap_or(ROOT_TITLE)
    }

    /// Live entries from the one nearest the root to the top.
    pub fn entries(&self) -> &[ScreenEntry] {
        &self.slots[..self.depth]
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    pub fn is_full(&self) -> bool {
        self.depth == self.slots.len()
    }

    #[inline]
    fn top(&self) -> Option<&ScreenEntry> {
        self.entries().last()
    }
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::allocate(DEFAULT_STACK_CAPACITY, DEFAULT_TITLE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Step {
        Push(i32, Option<String>),
        Pop,
        Reset,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            4 => (any::<i32>(), proptest::option::of("[a-z]{0,6}"))
                .prop_map(|(id, title)| Step::Push(id, title)),
            3 => Just(Step::Pop),
            1 => Just(Step::Reset),
        ]
    }

    /// Capacity, screens already pushed, and how many more fit.
    fn round_trip_strategy() -> impl Strategy<Value = (usize, usize, usize)> {
        (1usize..=8)
            .prop_flat_map(|capacity| (Just(capacity), 0..=capacity))
            .prop_flat_map(|(capacity, base)| (Just(capacity), Just(base), 0..=capacity - base))
    }

    fn snapshot(stack: &NavigationStack) -> Vec<(i32, Option<String>)> {
        stack
            .entries()
            .iter()
            .map(|entry| (entry.id(), entry.title().map(str::to_string)))
            .collect()
    }

    fn vacated_slots_are_clear(stack: &NavigationStack) -> bool {
        stack.slots[stack.depth..]
            .iter()
            .all(|slot| slot.id == ROOT_ID && slot.title.is_empty() && !slot.titled)
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            NavigationStack::new(0).unwrap_err(),
            NavigationError::ZeroCapacity
        );
    }

    #[test]
    fn default_stack_starts_at_root() {
        let stack = NavigationStack::default();
        assert_eq!(stack.capacity(), 8);
        assert_eq!(stack.depth(), 0);
        assert!(stack.is_root());
        assert_eq!(stack.current_id(), ROOT_ID);
        assert_eq!(stack.current_title(), ROOT_TITLE);
    }

    #[test]
    fn push_reports_current_screen() {
        let mut stack = NavigationStack::default();

        assert!(stack.push(1, Some("Nav")));
        assert_eq!(stack.current_id(), 1);
        assert_eq!(stack.current_title(), "Nav");

        assert!(stack.push(2, None));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current_id(), 2);
        assert_eq!(stack.current_title(), ROOT_TITLE);
    }

    #[test]
    fn empty_title_is_kept_as_given() {
        let mut stack = NavigationStack::default();
        stack.push(5, Some(""));

        assert_eq!(stack.entries()[0].title(), Some(""));
        assert_eq!(stack.current_title(), "");
    }

    #[test]
    fn push_on_full_stack_changes_nothing() {
        let mut stack = NavigationStack::new(3).unwrap();
        for id in 1..=3 {
            assert!(stack.push(id, Some("screen")));
        }
        assert!(stack.is_full());

        let before = snapshot(&stack);
        assert!(!stack.push(99, Some("overflow")));
        assert_eq!(stack.depth(), 3);
        assert_eq!(snapshot(&stack), before);
        assert_eq!(stack.current_id(), 3);
    }

    #[test]
    fn pop_on_empty_stack_changes_nothing() {
        let mut stack = NavigationStack::new(2).unwrap();
        assert!(!stack.pop());
        assert_eq!(stack.depth(), 0);
        assert!(vacated_slots_are_clear(&stack));
    }

    #[test]
    fn pop_clears_vacated_slot() {
        let mut stack = NavigationStack::default();
        stack.push(1, Some("Nav"));
        stack.push(2, Some("Detail"));

        assert!(stack.pop());
        assert_eq!(stack.current_title(), "Nav");
        assert!(vacated_slots_are_clear(&stack));
    }

    #[test]
    fn push_then_pop_restores_initial_state() {
        let mut stack = NavigationStack::new(4).unwrap();
        stack.push(7, Some("Base"));
        let before = snapshot(&stack);

        for id in 10..13 {
            assert!(stack.push(id, Some("tmp")));
        }
        for _ in 10..13 {
            assert!(stack.pop());
        }

        assert_eq!(stack.depth(), 1);
        assert_eq!(snapshot(&stack), before);
        assert!(vacated_slots_are_clear(&stack));
    }

    #[test]
    fn reset_returns_to_root() {
        let mut stack = NavigationStack::default();
        stack.push(1, Some("A"));
        stack.push(2, Some("B"));

        stack.reset();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current_id(), ROOT_ID);
        assert_eq!(stack.current_title(), ROOT_TITLE);
        assert!(vacated_slots_are_clear(&stack));

        stack.reset();
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn caller_buffer_can_be_reused_after_push() {
        let mut stack = NavigationStack::default();
        let mut title = String::from("Inventory");

        stack.push(3, Some(title.as_str()));
        title.clear();
        title.push_str("Changed");

        assert_eq!(stack.current_title(), "Inventory");
    }

    #[test]
    fn title_slots_keep_their_capacity() {
        let mut stack = NavigationStack::with_title_capacity(1, 16).unwrap();
        stack.push(1, Some("Settings"));
        stack.pop();

        assert!(stack.slots[0].title.capacity() >= 16);
    }

    #[test]
    fn from_settings_uses_configured_capacity() {
        let settings = NavigationSettings {
            capacity: 2,
            title_capacity: 8,
        };
        let mut stack = NavigationStack::from_settings(&settings).unwrap();

        assert!(stack.push(1, None));
        assert!(stack.push(2, None));
        assert!(!stack.push(3, None));
    }

    proptest! {
        /// Any push/pop/reset sequence behaves like a `Vec` bounded by the capacity.
        #[test]
        fn any_sequence_matches_bounded_vec(
            capacity in 1usize..=5,
            steps in proptest::collection::vec(step_strategy(), 0..64),
        ) {
            let mut stack = NavigationStack::new(capacity).unwrap();
            let mut model: Vec<(i32, Option<String>)> = Vec::new();

            for step in steps {
                match step {
                    Step::Push(id, title) => {
                        let pushed = stack.push(id, title.as_deref());
                        prop_assert_eq!(pushed, model.len() < capacity);
                        if pushed {
                            model.push((id, title));
                        }
                    }
                    Step::Pop => {
                        prop_assert_eq!(stack.pop(), model.pop().is_some());
                    }
                    Step::Reset => {
                        stack.reset();
                        model.clear();
                    }
                }

                prop_assert!(stack.depth() <= stack.capacity());
                prop_assert_eq!(stack.depth(), model.len());
                prop_assert_eq!(
                    stack.current_id(),
                    model.last().map_or(ROOT_ID, |(id, _)| *id)
                );
                prop_assert_eq!(snapshot(&stack), model.clone());
                prop_assert!(vacated_slots_are_clear(&stack));
            }
        }

        /// Pushing n screens that fit and popping n restores the prior stack.
        #[test]
        fn push_n_pop_n_restores_state((capacity, base, n) in round_trip_strategy()) {
            let mut stack = NavigationStack::new(capacity).unwrap();
            for id in 0..base {
                prop_assert!(stack.push(id as i32, Some("base")));
            }
            let before = snapshot(&stack);

            for id in 0..n {
                prop_assert!(stack.push(100 + id as i32, Some("pushed")));
            }
            for _ in 0..n {
                prop_assert!(stack.pop());
            }

            prop_assert_eq!(stack.depth(), base);
            prop_assert_eq!(snapshot(&stack), before);
            prop_assert!(vacated_slots_are_clear(&stack));
        }
    }
}
