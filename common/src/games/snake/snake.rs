use std::collections::{HashSet, VecDeque};

use crate::error::{SnakeError, SnakeResult};
use super::types::{Direction, Point};

/// Head-first body plus an occupancy set kept in sync with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

impl Snake {
    /// Lays out `length` segments from `head` backwards, away from `facing`.
    pub fn new(head: Point, facing: Direction, length: usize) -> Self {
        let behind = facing.opposite();
        let mut body = VecDeque::with_capacity(length);
        let mut segment = head;
        for _ in 0..length {
            body.push_back(segment);
            segment = segment.offset(behind);
        }
        let body_set = body.iter().copied().collect();

        Self { body, body_set }
    }

    pub fn from_segments(segments: impl IntoIterator<Item = Point>) -> SnakeResult<Self> {
        let body: VecDeque<Point> = segments.into_iter().collect();
        if body.is_empty() {
            return Err(SnakeError::invalid_argument("snake must have at least one segment"));
        }

        let body_set: HashSet<Point> = body.iter().copied().collect();
        if body_set.len() != body.len() {
            return Err(SnakeError::invalid_argument("snake segments must be unique"));
        }

        Ok(Self { body, body_set })
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn tail(&self) -> Point {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.body_set.contains(point)
    }

    /// Segments head first.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Point> + '_ {
        self.body.iter()
    }

    pub(crate) fn has_duplicates(&self) -> bool {
        self.body_set.len() != self.body.len()
    }

    /// The snake after moving onto `new_head`, keeping the tail when `grow`.
    pub fn advanced(&self, new_head: Point, grow: bool) -> Self {
        let mut next = self.clone();
        next.body.push_front(new_head);
        next.body_set.insert(new_head);

        if !grow && let Some(tail) = next.body.pop_back() {
            next.body_set.remove(&tail);
        }

        next
    }
}
