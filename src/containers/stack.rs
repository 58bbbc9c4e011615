//! LIFO stack over a slot array.

use crate::array::{NumericArray, Slot};
use crate::core::{ArrayConfig, ArrayError, Result};
use std::fmt;

/// Stack of `i64` values
pub type LongStack = Stack<i64>;

/// Stack of `f64` values
pub type DoubleStack = Stack<f64>;

/// Values pushed to and popped from slot 0.
pub struct Stack<T: Slot> {
    array: NumericArray<T>,
}

impl<T: Slot> Stack<T> {
    /// Create an empty stack that grows one slot at a time up to 1024 values.
    pub fn new() -> Result<Self> {
        Self::with_config(ArrayConfig::stack())
    }

    /// Create an empty stack from explicit array parameters; the array is
    /// never sorted.
    pub fn with_config(config: ArrayConfig) -> Result<Self> {
        let config = ArrayConfig { sorted: false, ..config };
        Ok(Stack {
            array: NumericArray::new(config)?,
        })
    }

    /// Push each value in turn, so the last value ends on top.
    ///
    /// A push that stops part way reports `PartialInsertFailure` with the
    /// number of values already pushed.
    pub fn push(&mut self, values: &[T]) -> Result<()> {
        for (pushed, value) in values.iter().enumerate() {
            self.array
                .roll_right(0, *value)
                .map_err(|e| ArrayError::partial(pushed, e))?;
        }
        Ok(())
    }

    /// Remove and return the top value, or `None` when empty.
    pub fn pop(&mut self) -> Result<Option<T>> {
        if self.is_empty() {
            self.array.raw().ensure_live()?;
            return Ok(None);
        }
        self.array.remove_at(0).map(Some)
    }

    /// Top value without removing it, or `None` when empty.
    pub fn peek(&self) -> Result<Option<T>> {
        if self.is_empty() {
            self.array.raw().ensure_live()?;
            return Ok(None);
        }
        self.array.get(0).map(Some)
    }

    /// Value `index` positions below the top.
    pub fn get(&self, index: usize) -> Result<T> {
        self.array.get(index)
    }

    /// Number of values
    pub fn size(&self) -> usize {
        self.array.size()
    }

    /// Allocated slots
    pub fn capacity(&self) -> usize {
        self.array.capacity()
    }

    /// Returns true if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Values that can still be pushed before overflow
    pub fn empty_slots_free(&self) -> usize {
        self.array.max_capacity().saturating_sub(self.size())
    }

    /// Remove every value.
    pub fn clear(&mut self) -> Result<()> {
        self.array.clear()
    }

    /// Values from top to bottom
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.array.to_vec()
    }

    /// Copy into a new stack with its own region.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Stack {
            array: self.array.try_clone()?,
        })
    }

    /// Release the slot region. Idempotent.
    pub fn destroy(&mut self) {
        self.array.destroy();
    }
}

impl<T: Slot> fmt::Display for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Stack]\n\tSize:{}\n\tFree Slots:{}\n\tCapacity:{}",
            self.size(),
            self.empty_slots_free(),
            self.capacity()
        )
    }
}

impl<T: Slot> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("values", &self.array.to_vec().ok())
            .field("capacity", &self.capacity())
            .finish()
    }
}
