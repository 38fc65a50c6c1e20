//! Bounded FIFO of pending steps for one mobile.
//!
//! The server sends discrete position/facing updates. [`MotionQueue::enqueue_step`]
//! turns each update into one to three [`Step`]s: an optional turn in place,
//! the translation itself, and an optional final turn to the requested facing.
//! The motion system then consumes the queue front one step at a time.
//!
//! The queue never holds more than [`MAX_STEP_COUNT`] steps. A request that
//! does not fit is rejected as a whole and the caller retries on a later tick.
//!
//! # Related
//!
//! - [`crate::systems::motion`] – interpolates and commits the queue front
//! - [`crate::components::direction::resolve_direction`] – travel direction

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Component;
use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::direction::{Direction, resolve_direction};
use crate::components::tileposition::TilePosition;

/// Maximum number of queued steps per mobile.
pub const MAX_STEP_COUNT: usize = 5;

/// One queued transition of position and/or facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub position: TilePosition,
    pub direction: Direction,
    pub run: bool,
}

impl Step {
    pub fn new(position: TilePosition, direction: Direction, run: bool) -> Self {
        Self {
            position,
            direction,
            run,
        }
    }
}

/// Position and facing a mobile has, or will have once its queue drains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndState {
    pub position: TilePosition,
    pub direction: Direction,
}

impl EndState {
    pub fn new(position: TilePosition, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

/// Pending steps plus the timestamp the current leg of motion started at.
#[derive(Component, Clone, Debug, Default)]
pub struct MotionQueue {
    steps: ArrayVec<Step, MAX_STEP_COUNT>,
    /// World tick at which the step at the front started.
    pub last_step_time: u64,
    /// Whether any step was ever queued; before that `last_step_time` means nothing.
    stepped: bool,
}

impl MotionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.steps.is_full()
    }

    /// A mobile is moving while it has queued steps.
    pub fn is_moving(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Moving, or moved within `window` ticks of `now`.
    pub fn is_walking(&self, now: u64, window: u64) -> bool {
        self.is_moving() || (self.stepped && self.last_step_time.saturating_add(window) > now)
    }

    pub fn front(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn back(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn pop_front(&mut self) -> Option<Step> {
        self.steps.pop_at(0)
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Tail step state, or `live` when nothing is queued.
    pub fn end_state(&self, live: EndState) -> EndState {
        match self.steps.last() {
            Some(step) => EndState::new(step.position, step.direction),
            None => live,
        }
    }

    /// Queue the steps needed to reach `target` facing `direction`.
    ///
    /// Returns `false` without touching the queue when the steps do not fit.
    /// A target equal to the current end state is accepted as a no-op.
    pub fn enqueue_step(
        &mut self,
        live: EndState,
        target: TilePosition,
        direction: Direction,
        run: bool,
        now: u64,
    ) -> bool {
        if self.is_full() {
            debug!("motion queue full, rejecting step to {:?}", target);
            return false;
        }

        let end = self.end_state(live);
        if end.position == target && end.direction.same_compass(direction) {
            return true;
        }

        let travel = resolve_direction(end.position.x, end.position.y, target.x, target.y);

        let mut staged: SmallVec<[Step; 3]> = SmallVec::new();
        if travel != Direction::None {
            if !travel.same_compass(end.direction) {
                staged.push(Step::new(end.position, travel, run));
            }
            staged.push(Step::new(target, travel, run));
        }
        if direction != Direction::None && !direction.same_compass(travel) {
            staged.push(Step::new(target, direction, run));
        }

        if staged.is_empty() {
            return true;
        }
        if self.steps.len() + staged.len() > MAX_STEP_COUNT {
            debug!(
                "motion queue has {} of {} slots used, {} steps do not fit",
                self.steps.len(),
                MAX_STEP_COUNT,
                staged.len()
            );
            return false;
        }

        if !self.is_moving() {
            self.last_step_time = now;
        }
        self.steps.extend(staged);
        self.stepped = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::direction::Compass;

    fn live(x: i32, y: i32, compass: Compass) -> EndState {
        EndState::new(TilePosition::new(x, y, 0), Direction::new(compass))
    }

    #[test]
    fn test_straight_step_in_facing_direction_queues_one() {
        let mut queue = MotionQueue::new();
        let ok = queue.enqueue_step(
            live(10, 10, Compass::East),
            TilePosition::new(11, 10, 0),
            Direction::new(Compass::East),
            false,
            100,
        );
        assert!(ok);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.last_step_time, 100);
        assert_eq!(queue.front().unwrap().position, TilePosition::new(11, 10, 0));
    }

    #[test]
    fn test_diagonal_from_cardinal_facing_turns_first() {
        let mut queue = MotionQueue::new();
        assert!(queue.enqueue_step(
            live(10, 10, Compass::South),
            TilePosition::new(11, 11, 0),
            Direction::new(Compass::SouthEast),
            false,
            0,
        ));
        assert_eq!(queue.len(), 2);
        let turn = queue.front().unwrap();
        assert_eq!(turn.position, TilePosition::new(10, 10, 0));
        assert_eq!(turn.direction, Direction::new(Compass::SouthEast));
        let walk = queue.back().unwrap();
        assert_eq!(walk.position, TilePosition::new(11, 11, 0));
        assert_eq!(walk.direction, Direction::new(Compass::SouthEast));
    }

    #[test]
    fn test_final_facing_differs_adds_trailing_turn() {
        let mut queue = MotionQueue::new();
        assert!(queue.enqueue_step(
            live(10, 10, Compass::South),
            TilePosition::new(11, 11, 0),
            Direction::new(Compass::East),
            false,
            0,
        ));
        let steps: Vec<_> = queue.iter().copied().collect();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].position, TilePosition::new(10, 10, 0));
        assert_eq!(steps[0].direction, Direction::new(Compass::SouthEast));
        assert_eq!(steps[1].position, TilePosition::new(11, 11, 0));
        assert_eq!(steps[1].direction, Direction::new(Compass::SouthEast));
        assert_eq!(steps[2].position, TilePosition::new(11, 11, 0));
        assert_eq!(steps[2].direction, Direction::new(Compass::East));
        assert!(steps.iter().all(|s| !s.run));
    }

    #[test]
    fn test_identical_to_end_state_is_noop() {
        let mut queue = MotionQueue::new();
        let ok = queue.enqueue_step(
            live(3, 4, Compass::North),
            TilePosition::new(3, 4, 0),
            Direction::new(Compass::North),
            false,
            50,
        );
        assert!(ok);
        assert!(queue.is_empty());
        assert_eq!(queue.last_step_time, 0);
    }

    #[test]
    fn test_end_state_chains_from_tail() {
        let mut queue = MotionQueue::new();
        let start = live(0, 0, Compass::East);
        let east = Direction::new(Compass::East);
        assert!(queue.enqueue_step(start, TilePosition::new(1, 0, 0), east, true, 0));
        assert!(queue.enqueue_step(start, TilePosition::new(2, 0, 0), east, true, 10));
        assert_eq!(queue.len(), 2);
        // already moving: start timestamp untouched
        assert_eq!(queue.last_step_time, 0);
        assert_eq!(
            queue.end_state(start),
            EndState::new(TilePosition::new(2, 0, 0), Direction::new(Compass::East))
        );
        assert!(queue.iter().all(|s| s.run));
    }

    #[test]
    fn test_full_queue_rejects_and_stays_unchanged() {
        let mut queue = MotionQueue::new();
        let start = live(0, 0, Compass::East);
        for x in 1..=5 {
            assert!(queue.enqueue_step(
                start,
                TilePosition::new(x, 0, 0),
                Direction::new(Compass::East),
                false,
                0,
            ));
        }
        assert!(queue.is_full());
        let before: Vec<_> = queue.iter().copied().collect();

        assert!(!queue.enqueue_step(
            start,
            TilePosition::new(6, 0, 0),
            Direction::new(Compass::East),
            false,
            0,
        ));
        let after: Vec<_> = queue.iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_request_that_does_not_fit_is_rejected_whole() {
        let mut queue = MotionQueue::new();
        let start = live(0, 0, Compass::East);
        for x in 1..=4 {
            assert!(queue.enqueue_step(
                start,
                TilePosition::new(x, 0, 0),
                Direction::new(Compass::East),
                false,
                0,
            ));
        }
        // needs a turn plus a translation: two steps, one slot left
        assert!(!queue.enqueue_step(
            start,
            TilePosition::new(4, 1, 0),
            Direction::new(Compass::South),
            false,
            0,
        ));
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn test_turn_in_place_queues_single_turn() {
        let mut queue = MotionQueue::new();
        assert!(queue.enqueue_step(
            live(5, 5, Compass::North),
            TilePosition::new(5, 5, 0),
            Direction::new(Compass::West),
            false,
            0,
        ));
        assert_eq!(queue.len(), 1);
        let turn = queue.front().unwrap();
        assert_eq!(turn.position, TilePosition::new(5, 5, 0));
        assert_eq!(turn.direction, Direction::new(Compass::West));
    }

    #[test]
    fn test_walking_window_after_last_step() {
        let mut queue = MotionQueue::new();
        assert!(!queue.is_walking(10, 750));
        queue.enqueue_step(
            live(0, 0, Compass::East),
            TilePosition::new(1, 0, 0),
            Direction::new(Compass::East),
            false,
            100,
        );
        assert!(queue.is_walking(100, 750));
        queue.pop_front();
        queue.last_step_time = 500;
        assert!(queue.is_walking(1_249, 750));
        assert!(!queue.is_walking(1_250, 750));
    }

    #[test]
    fn test_pop_front_is_fifo() {
        let mut queue = MotionQueue::new();
        let start = live(0, 0, Compass::East);
        let east = Direction::new(Compass::East);
        queue.enqueue_step(start, TilePosition::new(1, 0, 0), east, false, 0);
        queue.enqueue_step(start, TilePosition::new(2, 0, 0), east, false, 0);
        assert_eq!(queue.pop_front().unwrap().position.x, 1);
        assert_eq!(queue.pop_front().unwrap().position.x, 2);
        assert!(queue.pop_front().is_none());
    }
}
