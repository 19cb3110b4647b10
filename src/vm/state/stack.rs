//! This module contains the implementation of the interpreter's symbolic
//! stack, along with its call-frame cache and label snapshots.

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
};

use itertools::Itertools;

use crate::{
    constant::MAXIMUM_STACK_DEPTH,
    error::execution::Error,
    utility::compress_digit_runs,
    vm::value::SymbolicValue,
};

/// The result type for stack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The representation of the interpreter's stack.
///
/// # Indexing
///
/// Indexing into this stack is zero-based, where frame 0 is the top stack
/// frame.
///
/// # Depth
///
/// In a true EVM, it is a depth [`MAXIMUM_STACK_DEPTH`] stack, where each item
/// is word (256-bit) sized. Here, the interpreter maintains the same maximum
/// depth, but stores [`SymbolicValue`]s instead of words.
///
/// # Call Frames
///
/// When a macro is entered, [`Stack::cache`] hides everything below the
/// callee's inputs. The matching [`Stack::uncache`] on exit brings the hidden
/// values back beneath the callee's outputs.
///
/// # Labels
///
/// The stack remembers its contents at each label definition so that a later
/// jump to that label can resume with the same shape. A jump to a label that
/// has not been seen yet remembers the contents at the jump instead, to be
/// picked up when the label is defined. Only one shape is kept per label, and
/// incoming shapes are never merged.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stack {
    data: Vec<SymbolicValue>,

    /// The stacks hidden by the call frames that are currently open.
    cache: Vec<Vec<SymbolicValue>>,

    /// Contents of the stack at each label definition.
    labels: HashMap<String, Vec<SymbolicValue>>,

    /// Contents of the stack at jumps to labels that were not yet defined.
    pending_jumps: HashMap<String, Vec<SymbolicValue>>,
}

impl Stack {
    /// Creates a new stack without any items on it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the visible contents of the stack with `values`, given in
    /// top-first order.
    ///
    /// Any hidden call frames are discarded, as are values beyond the maximum
    /// stack depth, counting from the top.
    pub fn reset(&mut self, values: impl IntoIterator<Item = SymbolicValue>) {
        let mut data: Vec<SymbolicValue> =
            values.into_iter().take(MAXIMUM_STACK_DEPTH).collect();
        data.reverse();
        self.data = data;
        self.cache.clear();
    }

    /// Pushes the provided value onto the top of the stack.
    ///
    /// # Errors
    ///
    /// If the stack cannot grow to accommodate the requested `value`.
    pub fn push(&mut self, value: SymbolicValue) -> Result<()> {
        if self.data.len() + 1 > MAXIMUM_STACK_DEPTH {
            return Err(Error::StackDepthExceeded {
                requested: self.data.len() + 1,
            });
        }
        self.data.push(value);
        Ok(())
    }

    /// Pops the top value from the stack.
    ///
    /// # Errors
    ///
    /// If the stack has no item to pop.
    pub fn pop(&mut self) -> Result<SymbolicValue> {
        self.data.pop().ok_or(Error::StackUnderflow)
    }

    /// Reads from the stack frame at the provided `depth`.
    ///
    /// # Errors
    ///
    /// If `depth` does not exist in the stack.
    pub fn read(&self, depth: usize) -> Result<&SymbolicValue> {
        let index = self.index_of(depth)?;
        Ok(&self.data[index])
    }

    /// Duplicates the `n`th item from the top (counting from 1) onto the top
    /// of the stack, as `DUPN` does.
    ///
    /// # Errors
    ///
    /// If there is no `n`th item, or the stack is full.
    pub fn dup(&mut self, n: usize) -> Result<()> {
        let depth = n.checked_sub(1).ok_or(Error::NoSuchStackFrame { depth: 0 })?;
        let value = self.read(depth)?.clone();
        self.push(value)
    }

    /// Exchanges the top item with the item at `depth`, as `SWAPN` does for
    /// `depth == N`.
    ///
    /// # Errors
    ///
    /// If either the top or the target stack frame do not exist.
    pub fn swap(&mut self, depth: usize) -> Result<()> {
        let top = self.index_of(0)?;
        let other = self.index_of(depth)?;
        self.data.swap(top, other);

        Ok(())
    }

    /// Hides the stack behind a new call frame, leaving only the top `keep`
    /// values visible.
    ///
    /// If fewer than `keep` values are present, all of them stay visible.
    pub fn cache(&mut self, keep: usize) {
        let split = self.data.len().saturating_sub(keep);
        let visible = self.data.split_off(split);
        let hidden = std::mem::replace(&mut self.data, visible);
        self.cache.push(hidden);
    }

    /// Closes the most recent call frame, placing the top `keep` values of the
    /// discarded frame back on top of the values that the frame hid.
    ///
    /// When no call frame is open this keeps only the top `keep` values, and
    /// returns `false`.
    pub fn uncache(&mut self, keep: usize) -> bool {
        let split = self.data.len().saturating_sub(keep);
        let returned = self.data.split_off(split);
        let restored = self.cache.pop();
        let had_frame = restored.is_some();

        self.data = restored.unwrap_or_default();
        self.data.extend(returned);
        let overflow = self.data.len().saturating_sub(MAXIMUM_STACK_DEPTH);
        self.data.drain(..overflow);

        had_frame
    }

    /// Gets the number of call frames that are currently open.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.cache.len()
    }

    /// Records the current contents of the stack as the shape at `label`.
    ///
    /// If an earlier jump to `label` left a shape behind, the stack takes on
    /// that shape first.
    pub fn define_label(&mut self, label: &str) {
        if let Some(data) = self.pending_jumps.remove(label) {
            self.data = data;
        }
        self.labels.insert(label.to_string(), self.data.clone());
    }

    /// Performs a jump to `label`.
    ///
    /// The stack resumes with the shape recorded at `label` if there is one,
    /// returning `true`. Otherwise the current contents are remembered for
    /// when `label` is defined and the stack is left as is.
    pub fn jump_to(&mut self, label: &str) -> bool {
        if let Some(data) = self.labels.get(label) {
            self.data = data.clone();
            true
        } else {
            self.pending_jumps
                .entry(label.to_string())
                .or_insert_with(|| self.data.clone());
            false
        }
    }

    /// Forgets all recorded label shapes.
    pub fn clear_labels(&mut self) {
        self.labels.clear();
        self.pending_jumps.clear();
    }

    /// Gets the visible values in top-first order.
    pub fn values(&self) -> impl Iterator<Item = &SymbolicValue> {
        self.data.iter().rev()
    }

    /// Gets the current size of the visible stack.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Checks if the visible stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Renders the visible stack as `[top, next, ...]` with long digit runs
    /// compressed.
    #[must_use]
    pub fn display_string(&self) -> String {
        self.to_string()
    }

    /// Gets the index into `data` of the frame at `depth`.
    fn index_of(&self, depth: usize) -> Result<usize> {
        self.data
            .len()
            .checked_sub(depth + 1)
            .ok_or(Error::NoSuchStackFrame { depth })
    }
}

impl Display for Stack {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .values()
            .map(|value| compress_digit_runs(value.text()))
            .join(", ");
        write!(f, "[{rendered}]")
    }
}

#[cfg(test)]
mod test {
    use crate::{
        constant::MAXIMUM_STACK_DEPTH,
        vm::{state::stack::Stack, value::SymbolicValue},
    };

    /// Constructs a new stack with `item_count` literals pushed onto it, so
    /// that the top item is `item_count - 1`.
    fn new_stack_with_items(item_count: usize) -> anyhow::Result<Stack> {
        let mut stack = Stack::new();
        for i in 0..item_count {
            stack.push(SymbolicValue::literal(i.to_string()))?;
        }

        Ok(stack)
    }

    #[test]
    fn can_construct_new_stack() {
        let stack = Stack::new();
        assert_eq!(stack.size(), 0);
        assert_eq!(stack.to_string(), "[]");
    }

    #[test]
    fn cannot_push_outside_of_capacity() -> anyhow::Result<()> {
        let mut stack = new_stack_with_items(MAXIMUM_STACK_DEPTH)?;
        stack
            .push(SymbolicValue::symbolic("x"))
            .expect_err("Pushing onto a full stack did not error");

        Ok(())
    }

    #[test]
    fn cannot_pop_item_when_empty() {
        let mut stack = Stack::default();
        stack.pop().expect_err("Did not error when popping empty stack");
    }

    #[test]
    fn renders_top_first() -> anyhow::Result<()> {
        let stack = new_stack_with_items(3)?;
        assert_eq!(stack.to_string(), "[2, 1, 0]");
        assert_eq!(stack.read(2)?.text(), "0");

        Ok(())
    }

    #[test]
    fn dup_then_pop_is_identity() -> anyhow::Result<()> {
        let mut stack = new_stack_with_items(5)?;
        let original = stack.clone();

        stack.dup(3)?;
        assert_eq!(stack.to_string(), "[2, 4, 3, 2, 1, 0]");
        stack.pop()?;
        assert_eq!(stack, original);

        Ok(())
    }

    #[test]
    fn cannot_dup_nonexistent_item() -> anyhow::Result<()> {
        let mut stack = new_stack_with_items(10)?;
        stack.dup(11).expect_err("Duplicated a nonexistent stack item");
        stack.dup(0).expect_err("Duplicated the zeroth stack item");

        Ok(())
    }

    #[test]
    fn swap_twice_is_identity() -> anyhow::Result<()> {
        let mut stack = new_stack_with_items(4)?;
        let original = stack.clone();

        stack.swap(1)?;
        assert_eq!(stack.to_string(), "[2, 3, 1, 0]");
        stack.swap(1)?;
        assert_eq!(stack, original);

        stack.swap(3)?;
        assert_eq!(stack.to_string(), "[0, 2, 1, 3]");

        Ok(())
    }

    #[test]
    fn cannot_swap_with_invalid_item() -> anyhow::Result<()> {
        let mut stack = new_stack_with_items(4)?;
        stack.swap(4).expect_err("Swapped with an invalid stack item");
        Stack::new()
            .swap(0)
            .expect_err("Swapped when the stack was empty");

        Ok(())
    }

    #[test]
    fn cache_hides_all_but_the_inputs() -> anyhow::Result<()> {
        let mut stack = new_stack_with_items(4)?;
        stack.cache(2);
        assert_eq!(stack.to_string(), "[3, 2]");
        assert_eq!(stack.frame_count(), 1);

        stack.pop()?;
        stack.pop()?;
        stack.push(SymbolicValue::literal("0x03"))?;
        stack.push(SymbolicValue::literal("0x04"))?;
        stack.push(SymbolicValue::literal("0x05"))?;

        assert!(stack.uncache(2));
        assert_eq!(stack.to_string(), "[0x05, 0x04, 1, 0]");
        assert_eq!(stack.frame_count(), 0);

        Ok(())
    }

    #[test]
    fn uncache_without_a_frame_keeps_the_outputs() -> anyhow::Result<()> {
        let mut stack = new_stack_with_items(4)?;
        assert!(!stack.uncache(1));
        assert_eq!(stack.to_string(), "[3]");

        Ok(())
    }

    #[test]
    fn reset_takes_values_top_first() {
        let mut stack = Stack::new();
        stack.cache(0);
        stack.reset([SymbolicValue::symbolic("takes[0]"), SymbolicValue::symbolic("takes[1]")]);

        assert_eq!(stack.to_string(), "[takes[0], takes[1]]");
        assert_eq!(stack.frame_count(), 0);
    }

    #[test]
    fn reset_keeps_the_top_values_when_too_deep() {
        let mut stack = Stack::new();
        stack.reset(
            (0..MAXIMUM_STACK_DEPTH + 2).map(|i| SymbolicValue::symbolic(format!("takes[{i}]"))),
        );

        assert_eq!(stack.size(), MAXIMUM_STACK_DEPTH);
        assert!(stack.to_string().starts_with("[takes[0], takes[1],"));
        assert!(stack.to_string().ends_with(&format!("takes[{}]]", MAXIMUM_STACK_DEPTH - 1)));
    }

    #[test]
    fn backward_jumps_restore_the_label_shape() -> anyhow::Result<()> {
        let mut stack = new_stack_with_items(2)?;
        stack.define_label("loop");
        stack.push(SymbolicValue::symbolic("x"))?;

        assert!(stack.jump_to("loop"));
        assert_eq!(stack.to_string(), "[1, 0]");

        Ok(())
    }

    #[test]
    fn forward_jumps_shape_the_label() -> anyhow::Result<()> {
        let mut stack = new_stack_with_items(2)?;
        assert!(!stack.jump_to("end"));
        stack.push(SymbolicValue::symbolic("fallthrough"))?;

        stack.define_label("end");
        assert_eq!(stack.to_string(), "[1, 0]");

        stack.clear_labels();
        stack.push(SymbolicValue::symbolic("y"))?;
        assert!(!stack.jump_to("end"));
        assert_eq!(stack.to_string(), "[y, 1, 0]");

        Ok(())
    }

    #[test]
    fn compresses_rendered_values() -> anyhow::Result<()> {
        let mut stack = Stack::new();
        stack.push(SymbolicValue::literal("10"))?;
        stack.push(SymbolicValue::literal("1000000000"))?;
        assert_eq!(stack.to_string(), "[100...0, 10]");

        Ok(())
    }
}
