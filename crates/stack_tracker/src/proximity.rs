//! Axis-aligned proximity test used by both trackers.
//!
//! The box is built from the *incoming* object's truncated coordinates and
//! then tested as an open interval against the candidate's exact
//! coordinates. When both objects see the sky the vertical axis is skipped,
//! so outdoor piles at different heights still merge while stacks in
//! stacked rooms do not merge through floors.

use crate::entity::Tracked;
use crate::types::Position;

/// Open box of half-width `radius` around a truncated position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeBox {
    start: (i64, i64, i64),
    end: (i64, i64, i64),
}

impl MergeBox {
    /// Builds the box around `origin`. Returns `None` for a non-positive
    /// radius, which disables merging.
    pub fn around(origin: &Position, radius: i32) -> Option<Self> {
        if radius <= 0 {
            return None;
        }
        let radius = i64::from(radius);
        let (x, y, z) = origin.truncated();
        Some(Self {
            start: (
                x.saturating_sub(radius),
                y.saturating_sub(radius),
                z.saturating_sub(radius),
            ),
            end: (
                x.saturating_add(radius),
                y.saturating_add(radius),
                z.saturating_add(radius),
            ),
        })
    }

    /// Strict containment on X and Z, and on Y unless `ignore_vertical`.
    pub fn contains(&self, candidate: &Position, ignore_vertical: bool) -> bool {
        let inside = |start: i64, end: i64, value: f64| (start as f64) < value && value < (end as f64);

        inside(self.start.0, self.end.0, candidate.x)
            && inside(self.start.2, self.end.2, candidate.z)
            && (ignore_vertical || inside(self.start.1, self.end.1, candidate.y))
    }
}

/// Full proximity predicate: distinct, both alive, and within the box built
/// around `incoming`.
pub fn in_range<A, B>(incoming: &A, candidate: &B, radius: i32, incoming_sky: bool, candidate_sky: bool) -> bool
where
    A: Tracked + ?Sized,
    B: Tracked + ?Sized,
{
    match MergeBox::around(&incoming.position(), radius) {
        Some(merge_box) => in_box(&merge_box, incoming, candidate, incoming_sky && candidate_sky),
        None => false,
    }
}

/// Same as [`in_range`] with a box computed once per event.
pub fn in_box<A, B>(merge_box: &MergeBox, incoming: &A, candidate: &B, both_see_sky: bool) -> bool
where
    A: Tracked + ?Sized,
    B: Tracked + ?Sized,
{
    incoming.id() != candidate.id()
        && incoming.is_alive()
        && candidate.is_alive()
        && merge_box.contains(&candidate.position(), both_see_sky)
}
