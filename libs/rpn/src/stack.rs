//! Fixed-capacity quantity stack.
//!
//! Pushing onto a full stack drops the bottom element instead of failing.

use unitdc_units::Quantity;

use crate::error::{Error, Result};

pub const STACK_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct Stack {
    slots: [Quantity; STACK_CAPACITY],
    depth: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Quantity::default()),
            depth: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    pub fn push(&mut self, quantity: Quantity) {
        if self.depth == STACK_CAPACITY {
            self.slots.rotate_left(1);
            self.slots[STACK_CAPACITY - 1] = quantity;
        } else {
            self.slots[self.depth] = quantity;
            self.depth += 1;
        }
    }

    pub fn pop(&mut self) -> Result<Quantity> {
        if self.depth == 0 {
            return Err(Error::EmptyStack);
        }
        self.depth -= 1;
        Ok(std::mem::take(&mut self.slots[self.depth]))
    }

    pub fn top(&self) -> Option<&Quantity> {
        self.as_slice().last()
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots[..self.depth] {
            *slot = Quantity::default();
        }
        self.depth = 0;
    }

    /// Live entries, bottom first.
    pub fn as_slice(&self) -> &[Quantity] {
        &self.slots[..self.depth]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quantity> {
        self.as_slice().iter()
    }
}
