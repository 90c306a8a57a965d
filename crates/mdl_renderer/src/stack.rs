//! Stack of coordinate systems.

use mdl_math::DMat4;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    #[error("cannot pop the last coordinate system")]
    Underflow,
}

pub type StackResult<T> = Result<T, StackError>;

/// Nested coordinate systems; never empty.
///
/// The top frame is the transform applied to newly drawn geometry.
#[derive(Debug, Clone)]
pub struct CoordinateStack {
    frames: Vec<DMat4>,
}

impl Default for CoordinateStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateStack {
    /// A stack holding a single identity frame.
    pub fn new() -> Self {
        Self {
            frames: vec![DMat4::IDENTITY],
        }
    }

    /// Duplicate the top frame.
    pub fn push(&mut self) {
        let top = self.top();
        self.frames.push(top);
    }

    /// Discard the top frame. The last frame cannot be popped.
    pub fn pop(&mut self) -> StackResult<DMat4> {
        if self.frames.len() <= 1 {
            return Err(StackError::Underflow);
        }
        self.frames.pop().ok_or(StackError::Underflow)
    }

    pub fn top(&self) -> DMat4 {
        self.frames.last().copied().unwrap_or(DMat4::IDENTITY)
    }

    /// Post-multiply the top frame: `top = top * transform`.
    pub fn compose(&mut self, transform: DMat4) {
        if let Some(top) = self.frames.last_mut() {
            *top *= transform;
        }
    }

    /// Number of frames, at least one.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdl_math::{rotate, scale, translate, Axis, DVec3};

    #[test]
    fn test_starts_with_identity() {
        let stack = CoordinateStack::new();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), DMat4::IDENTITY);
    }

    #[test]
    fn test_push_pop_restores_top() {
        let mut stack = CoordinateStack::new();
        stack.compose(translate(1.0, 2.0, 3.0));
        let before = stack.top();

        stack.push();
        stack.compose(scale(2.0, 2.0, 2.0));
        assert_ne!(stack.top(), before);
        stack.pop().unwrap();
        assert_eq!(stack.top(), before);
    }

    #[test]
    fn test_pop_last_frame_rejected() {
        let mut stack = CoordinateStack::new();
        assert_eq!(stack.pop(), Err(StackError::Underflow));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_compose_is_local() {
        let mut stack = CoordinateStack::new();
        stack.compose(translate(10.0, 0.0, 0.0));
        stack.compose(scale(2.0, 2.0, 2.0));
        // Scale applies first, then the earlier translate
        let p = stack.top().transform_point3(DVec3::X);
        assert_eq!(p, DVec3::new(12.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotation_round_trip() {
        let mut stack = CoordinateStack::new();
        stack.compose(rotate(Axis::X, 90.0));
        stack.compose(rotate(Axis::X, -90.0));
        assert!(stack.top().abs_diff_eq(DMat4::IDENTITY, 1e-12));
    }
}
