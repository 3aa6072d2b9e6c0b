/// Page history: the current page plus back/forward stacks.
///
/// Every operation returns `true` when it committed a page change. Targets are
/// clamped, so no request is ever out of range.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    current: usize,
    past: Vec<usize>,
    future: Vec<usize>,
    last: usize,
}

impl NavigationHistory {
    pub fn new(page_count: usize) -> Self {
        Self {
            current: 0,
            past: Vec::new(),
            future: Vec::new(),
            last: page_count.saturating_sub(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.last + 1
    }

    #[cfg(test)]
    pub fn past(&self) -> &[usize] {
        &self.past
    }

    #[cfg(test)]
    pub fn future(&self) -> &[usize] {
        &self.future
    }

    /// Jump to `target`. A target equal to the top of `future` is a redo and
    /// is checked before the top of `past`; if both match, forward wins.
    pub fn goto_page(&mut self, target: usize) -> bool {
        let target = target.min(self.last);
        if target == self.current {
            return false;
        }
        if self.future.last() == Some(&target) {
            return self.forward();
        }
        if self.past.last() == Some(&target) {
            return self.back();
        }
        self.past.push(self.current);
        self.future.clear();
        self.current = target;
        true
    }

    pub fn next(&mut self) -> bool {
        self.goto_page(self.current + 1)
    }

    pub fn prev(&mut self) -> bool {
        self.goto_page(self.current.saturating_sub(1))
    }

    pub fn home(&mut self) -> bool {
        self.goto_page(0)
    }

    pub fn end(&mut self) -> bool {
        self.goto_page(self.last)
    }

    pub fn back(&mut self) -> bool {
        match self.past.pop() {
            Some(page) => {
                self.future.push(self.current);
                self.current = page;
                true
            }
            None => false,
        }
    }

    pub fn forward(&mut self) -> bool {
        match self.future.pop() {
            Some(page) => {
                self.past.push(self.current);
                self.current = page;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_back_then_fresh_jump() {
        let mut history = NavigationHistory::new(10);
        history.next();
        history.next();
        history.next();
        assert_eq!(history.current(), 3);
        assert_eq!(history.past(), [0, 1, 2]);

        assert!(history.back());
        assert_eq!(history.current(), 2);
        assert_eq!(history.past(), [0, 1]);
        assert_eq!(history.future(), [3]);

        assert!(history.goto_page(5));
        assert_eq!(history.current(), 5);
        assert_eq!(history.past(), [0, 1, 2]);
        assert!(history.future().is_empty());
    }

    #[test]
    fn test_targets_are_clamped() {
        let mut history = NavigationHistory::new(4);
        assert!(history.goto_page(99));
        assert_eq!(history.current(), 3);
        assert!(!history.next());
        assert!(!history.end());
        assert_eq!(history.current(), 3);

        history.home();
        assert!(!history.prev());
        assert_eq!(history.current(), 0);
    }

    #[test]
    fn test_goto_current_is_noop() {
        let mut history = NavigationHistory::new(5);
        history.goto_page(2);
        let (past, future) = (history.past().to_vec(), history.future().to_vec());
        assert!(!history.goto_page(2));
        assert_eq!(history.past(), past);
        assert_eq!(history.future(), future);
    }

    #[test]
    fn test_back_then_forward_restores_state() {
        let mut history = NavigationHistory::new(10);
        for target in [4, 7, 2] {
            history.goto_page(target);
        }
        history.back();
        let before = (
            history.current(),
            history.past().to_vec(),
            history.future().to_vec(),
        );
        assert!(history.back());
        assert!(history.forward());
        assert_eq!(
            (
                history.current(),
                history.past().to_vec(),
                history.future().to_vec()
            ),
            before
        );
    }

    #[test]
    fn test_back_and_forward_on_empty_stacks() {
        let mut history = NavigationHistory::new(3);
        assert!(!history.back());
        assert!(!history.forward());
        assert_eq!(history.current(), 0);
        assert!(history.past().is_empty());
        assert!(history.future().is_empty());
    }

    #[test]
    fn test_goto_future_top_is_redo() {
        let mut history = NavigationHistory::new(10);
        history.goto_page(6);
        history.back();
        assert_eq!(history.future(), [6]);
        assert!(history.goto_page(6));
        assert_eq!(history.past(), [0]);
        assert!(history.future().is_empty());
    }

    #[test]
    fn test_goto_past_top_is_undo() {
        let mut history = NavigationHistory::new(10);
        history.goto_page(3);
        history.goto_page(8);
        assert!(history.goto_page(3));
        assert_eq!(history.past(), [0]);
        assert_eq!(history.future(), [8]);
    }

    #[test]
    fn test_future_wins_when_both_tops_match() {
        let mut history = NavigationHistory {
            current: 2,
            past: vec![0, 5],
            future: vec![5],
            last: 9,
        };
        assert!(history.goto_page(5));
        assert_eq!(history.past(), [0, 5, 2]);
        assert!(history.future().is_empty());
    }

    #[test]
    fn test_current_never_leaves_range() {
        let mut history = NavigationHistory::new(7);
        let targets = [3, 0, 6, 12, 1, 1, 5, 100, 0, 4];
        for (i, target) in targets.into_iter().enumerate() {
            history.goto_page(target);
            if i % 3 == 0 {
                history.back();
            }
            assert!(history.current() < history.page_count());
        }
    }

    #[test]
    fn test_fresh_jump_clears_future() {
        let mut history = NavigationHistory::new(10);
        history.goto_page(4);
        history.goto_page(8);
        history.back();
        history.back();
        assert_eq!(history.future(), [8, 4]);
        assert!(history.goto_page(9));
        assert!(history.future().is_empty());
    }
}
