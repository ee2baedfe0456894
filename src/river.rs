use smallvec::{smallvec, SmallVec};

/// Base alignment column: the length of "SELECT", the widest of the
/// common clause keywords.
const BASE_RIVER: usize = 6;

/// Statements that open with a parenthesis shift the base one column
/// right to make room for it.
const PAREN_BASE_RIVER: usize = 7;

/// Ordered stack of alignment columns, one per open nesting level
/// (top-level statement, each open parenthesis, each sub-query).
///
/// The top of the stack is the column at which aligned keyword text ends;
/// clause bodies start at top + 1.
#[derive(Debug, Clone)]
pub struct RiverStack {
    columns: SmallVec<[usize; 8]>,
}

impl RiverStack {
    pub fn seeded(paren_initial: bool) -> Self {
        let base = if paren_initial {
            PAREN_BASE_RIVER
        } else {
            BASE_RIVER
        };
        Self {
            columns: smallvec![base],
        }
    }

    pub fn push(&mut self, column: usize) {
        self.columns.push(column);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.columns.pop()
    }

    /// Current alignment column; 0 if the stack has been exhausted.
    pub fn top(&self) -> usize {
        self.columns.last().copied().unwrap_or(0)
    }

    pub fn depth(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_values() {
        assert_eq!(RiverStack::seeded(false).top(), 6);
        assert_eq!(RiverStack::seeded(true).top(), 7);
    }

    #[test]
    fn test_push_pop() {
        let mut stack = RiverStack::seeded(false);
        stack.push(13);
        assert_eq!(stack.top(), 13);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Some(13));
        assert_eq!(stack.top(), 6);
        assert_eq!(stack.pop(), Some(6));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.top(), 0);
    }
}
