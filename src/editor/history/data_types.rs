//! State captured by commands so they can be reversed.

use crate::canvas::{Placement, Shape};

/// Everything needed to restore a removed shape.
#[derive(Clone, Debug)]
pub struct ShapeSnapshot {
    pub shape: Shape,
    /// Position and rank the shape held when it was removed
    pub placement: Placement,
}
