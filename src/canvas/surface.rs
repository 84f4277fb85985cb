//! Front-to-back ordering of the drawables on one canvas.
//!
//! Members form a sequence (new members are appended) and a parallel rank
//! array records where the member at each position sits in render order
//! (0 = furthest back). Layer operations address members by position, not by
//! rank. Every reordering is built from pairwise rank exchanges, so the ranks
//! always stay a permutation of `0..len` and every move can be undone with
//! the same small set of operations.

use bevy::prelude::*;

use super::DrawableHandle;
use crate::error::{DrawError, DrawResult, Extreme};

/// Where a member sat before it was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub position: usize,
    pub rank: usize,
}

#[derive(Debug, Clone, Default)]
pub struct OrderedSurface {
    /// Handles by position. Backward/forward steps move a member one
    /// position; nothing else reorders them.
    members: Vec<DrawableHandle>,
    /// `layer_of[i]` is the render rank of `members[i]`.
    layer_of: Vec<usize>,
    /// Pairwise rank exchanges performed so far.
    swaps: u64,
}

impl OrderedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, handle: &DrawableHandle) -> bool {
        self.members.contains(handle)
    }

    /// Handles by position.
    pub fn members(&self) -> &[DrawableHandle] {
        &self.members
    }

    /// Ranks parallel to [`members`](Self::members).
    #[allow(dead_code)]
    pub fn ranks(&self) -> &[usize] {
        &self.layer_of
    }

    pub fn swap_count(&self) -> u64 {
        self.swaps
    }

    pub fn rank_of(&self, handle: &DrawableHandle) -> DrawResult<usize> {
        self.position_of(handle).map(|index| self.layer_of[index])
    }

    /// Handles sorted back to front.
    pub fn render_order(&self) -> Vec<&DrawableHandle> {
        let mut order: Vec<(usize, &DrawableHandle)> = self
            .layer_of
            .iter()
            .copied()
            .zip(self.members.iter())
            .collect();
        order.sort_by_key(|(rank, _)| *rank);
        order.into_iter().map(|(_, handle)| handle).collect()
    }

    /// Append a member on top of everything else. Returns its rank.
    pub fn add(&mut self, handle: DrawableHandle) -> DrawResult<usize> {
        if self.contains(&handle) {
            return Err(DrawError::InvalidArgument(format!(
                "'{}' is already on this canvas",
                handle
            )));
        }
        let rank = self.members.len();
        self.members.push(handle);
        self.layer_of.push(rank);
        Ok(rank)
    }

    /// Remove a member, returning where it sat.
    ///
    /// Ranks above the removed one shift down by one so the remaining members
    /// keep their relative order and the ranks stay dense.
    pub fn remove(&mut self, handle: &DrawableHandle) -> DrawResult<Placement> {
        let position = self.position_of(handle)?;
        self.members.remove(position);
        let rank = self.layer_of.remove(position);
        for other in self.layer_of.iter_mut() {
            if *other > rank {
                *other -= 1;
            }
        }
        Ok(Placement { position, rank })
    }

    /// Put a member back where [`remove`](Self::remove) found it, shifting
    /// the ranks at or above its rank up by one.
    pub fn insert(&mut self, handle: DrawableHandle, placement: Placement) -> DrawResult<()> {
        if self.contains(&handle) {
            return Err(DrawError::InvalidArgument(format!(
                "'{}' is already on this canvas",
                handle
            )));
        }
        let Placement { position, rank } = placement;
        if position > self.len() || rank > self.len() {
            return Err(DrawError::InvalidArgument(format!(
                "cannot restore '{}' at position {} with layer {} among {} objects",
                handle,
                position,
                rank,
                self.len()
            )));
        }
        for other in self.layer_of.iter_mut() {
            if *other >= rank {
                *other += 1;
            }
        }
        self.members.insert(position, handle);
        self.layer_of.insert(position, rank);
        Ok(())
    }

    /// Trade render order with the member at the previous position; the
    /// member then occupies that position. Returns the previous position.
    pub fn send_backward(&mut self, handle: &DrawableHandle) -> DrawResult<usize> {
        self.require_layers()?;
        let index = self.position_of(handle)?;
        if index == 0 {
            return Err(DrawError::AlreadyAtExtreme {
                handle: handle.clone(),
                extreme: Extreme::Back,
            });
        }
        self.step(index, index - 1);
        trace!("{} backward: position {} -> {}", handle, index, index - 1);
        Ok(index)
    }

    /// Trade render order with the member at the next position. Returns the
    /// previous position.
    pub fn bring_forward(&mut self, handle: &DrawableHandle) -> DrawResult<usize> {
        self.require_layers()?;
        let index = self.position_of(handle)?;
        if index + 1 == self.len() {
            return Err(DrawError::AlreadyAtExtreme {
                handle: handle.clone(),
                extreme: Extreme::Front,
            });
        }
        self.step(index, index + 1);
        trace!("{} forward: position {} -> {}", handle, index, index + 1);
        Ok(index)
    }

    /// Walk a member down to position 0, one backward step at a time.
    /// Returns the original position.
    pub fn send_to_back(&mut self, handle: &DrawableHandle) -> DrawResult<usize> {
        self.require_layers()?;
        let original = self.position_of(handle)?;
        if original == 0 {
            return Err(DrawError::AlreadyAtExtreme {
                handle: handle.clone(),
                extreme: Extreme::Back,
            });
        }
        for _ in 0..original {
            self.send_backward(handle)?;
        }
        Ok(original)
    }

    /// Walk a member up to the last position, one forward step at a time.
    /// Returns the original position.
    pub fn bring_to_front(&mut self, handle: &DrawableHandle) -> DrawResult<usize> {
        self.require_layers()?;
        let original = self.position_of(handle)?;
        let last = self.len() - 1;
        if original == last {
            return Err(DrawError::AlreadyAtExtreme {
                handle: handle.clone(),
                extreme: Extreme::Front,
            });
        }
        for _ in original..last {
            self.bring_forward(handle)?;
        }
        Ok(original)
    }

    /// Exchange the rank at the member's position with the rank at position
    /// `position`. Nobody changes position and every other member keeps its
    /// rank, so repeating the call undoes it. Returns the previous rank.
    pub fn move_to_layer(&mut self, handle: &DrawableHandle, position: usize) -> DrawResult<usize> {
        if self.len() < 2 {
            return Err(DrawError::InvalidArgument(
                "layer changes need at least two objects on the canvas".to_string(),
            ));
        }
        if position >= self.len() {
            return Err(DrawError::InvalidArgument(format!(
                "layer {} is out of range 0..{}",
                position,
                self.len()
            )));
        }
        let index = self.position_of(handle)?;
        let previous = self.layer_of[index];
        if index != position {
            self.layer_of.swap(index, position);
            self.swaps += 1;
        }
        debug!(
            "{} took layer {} (was {})",
            handle, self.layer_of[index], previous
        );
        Ok(previous)
    }

    /// Step a member to `position` with single backward/forward steps.
    /// Undoes [`send_to_back`](Self::send_to_back) and
    /// [`bring_to_front`](Self::bring_to_front) given their return value.
    pub fn walk_to_position(&mut self, handle: &DrawableHandle, position: usize) -> DrawResult<usize> {
        if position >= self.len() {
            return Err(DrawError::InvalidArgument(format!(
                "position {} is out of range 0..{}",
                position,
                self.len()
            )));
        }
        let previous = self.position_of(handle)?;
        for _ in position..previous {
            self.send_backward(handle)?;
        }
        for _ in previous..position {
            self.bring_forward(handle)?;
        }
        Ok(previous)
    }

    fn require_layers(&self) -> DrawResult<()> {
        if self.len() < 2 {
            return Err(DrawError::NotApplicable);
        }
        Ok(())
    }

    pub fn position_of(&self, handle: &DrawableHandle) -> DrawResult<usize> {
        self.members
            .iter()
            .position(|member| member == handle)
            .ok_or_else(|| DrawError::HandleNotFound(handle.clone()))
    }

    /// Move the member at `from` to `to`. The two members trade ranks since
    /// ranks stay attached to positions.
    fn step(&mut self, from: usize, to: usize) {
        self.members.swap(from, to);
        self.swaps += 1;
    }
}
