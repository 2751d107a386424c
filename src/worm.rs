use std::collections::VecDeque;

use crate::{Coords, TermInt};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Up | Down => Axis::Vertical,
            Left | Right => Axis::Horizontal,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords, old_head: Coords, old_tail: Option<Coords> },
    HitWall,
    HitSelf,
}

/// The player's worm. The head is the back of `body`.
#[derive(Debug)]
pub struct Worm {
    body: VecDeque<Coords>,
    direction: Direction,
    pending_growth: u32,
}

impl Worm {
    /// Lays the worm out in a straight line ending at `head`, facing `direction`.
    /// Cells that would fall off the grid's top/left edge are clamped to 0.
    pub fn new(head: Coords, length: u16, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        let length = length.max(1) as i32;

        let body = (0..length).rev()
            .map(|i| (head.0 as i32 - dx * i, head.1 as i32 - dy * i))
            .map(|(x, y)| (x.max(0) as TermInt, y.max(0) as TermInt))
            .collect();
        Worm { body, direction, pending_growth: 0 }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn head(&self) -> Coords {
        // The body is never empty: `new` lays out at least one cell and
        // `move_step` pushes a head before it pops a tail.
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    /// Advances one cell inside the `1..=max_x` by `1..=max_y` field.
    pub fn move_step(&mut self, max_x: TermInt, max_y: TermInt) -> MoveResult {
        let old_head = self.head();
        let (dx, dy) = self.direction.delta();
        let (x, y) = (old_head.0 as i32 + dx, old_head.1 as i32 + dy);

        if x < 1 || y < 1 || x > max_x as i32 || y > max_y as i32 {
            return HitWall;
        }

        let new_head = (x as TermInt, y as TermInt);

        // The tail leaves its cell on this move unless the worm is growing
        let tail_moves = self.pending_growth == 0;
        let skip = if tail_moves { 1 } else { 0 };
        if self.body.iter().skip(skip).any(|&c| c == new_head) {
            return HitSelf;
        }

        self.body.push_back(new_head);

        if tail_moves {
            let old_tail = self.body.pop_front();
            Moved { new_head, old_head, old_tail }
        } else {
            self.pending_growth -= 1;
            Moved { new_head, old_head, old_tail: None }
        }
    }

    /// Returns true only when the travel direction actually changed.
    pub fn change_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction || new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn grow(&mut self, cells: u32) {
        self.pending_growth = self.pending_growth.saturating_add(cells);
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_worm_trails_behind_head() {
        let worm = Worm::new((10, 5), 4, Right);
        let cells: Vec<Coords> = worm.body().iter().copied().collect();
        assert_eq!(cells, vec![(7, 5), (8, 5), (9, 5), (10, 5)]);
        assert_eq!(worm.head(), (10, 5));
    }

    #[test]
    fn move_releases_tail() {
        let mut worm = Worm::new((5, 5), 3, Right);
        let res = worm.move_step(20, 20);
        assert_eq!(res, Moved { new_head: (6, 5), old_head: (5, 5), old_tail: Some((3, 5)) });
        assert_eq!(worm.len(), 3);
    }

    #[test]
    fn growth_keeps_tail_for_each_cell() {
        let mut worm = Worm::new((5, 5), 2, Right);
        worm.grow(2);
        assert!(matches!(worm.move_step(20, 20), Moved { old_tail: None, .. }));
        assert!(matches!(worm.move_step(20, 20), Moved { old_tail: None, .. }));
        assert!(matches!(worm.move_step(20, 20), Moved { old_tail: Some(_), .. }));
        assert_eq!(worm.len(), 4);
    }

    #[test]
    fn hits_wall_at_field_edges() {
        let mut worm = Worm::new((1, 3), 1, Left);
        assert_eq!(worm.move_step(10, 10), HitWall);

        let mut worm = Worm::new((10, 3), 1, Right);
        assert_eq!(worm.move_step(10, 10), HitWall);

        let mut worm = Worm::new((4, 1), 1, Up);
        assert_eq!(worm.move_step(10, 10), HitWall);

        let mut worm = Worm::new((4, 10), 1, Down);
        assert_eq!(worm.move_step(10, 10), HitWall);
    }

    #[test]
    fn hits_self_when_turning_into_body() {
        let mut worm = Worm::new((6, 5), 5, Right);
        assert!(worm.change_direction(Down));
        worm.move_step(20, 20);
        assert!(worm.change_direction(Left));
        worm.move_step(20, 20);
        assert!(worm.change_direction(Up));
        assert_eq!(worm.move_step(20, 20), HitSelf);
    }

    #[test]
    fn chasing_the_tail_is_allowed() {
        // A 4-cell loop: the head steps into the cell the tail is leaving
        let mut worm = Worm::new((2, 1), 2, Right);
        worm.grow(2);
        worm.change_direction(Down);
        worm.move_step(10, 10);
        worm.change_direction(Left);
        worm.move_step(10, 10);
        worm.change_direction(Up);
        assert!(matches!(worm.move_step(10, 10), Moved { new_head: (1, 1), .. }));
    }

    #[test]
    fn reversal_and_repeat_are_rejected() {
        let mut worm = Worm::new((5, 5), 3, Right);
        assert!(!worm.change_direction(Left));
        assert!(!worm.change_direction(Right));
        assert_eq!(worm.direction(), Right);
        assert!(worm.change_direction(Up));
        assert_eq!(worm.head_char(), '^');
    }

    #[test]
    fn axes() {
        assert_eq!(Up.axis(), Axis::Vertical);
        assert_eq!(Down.axis(), Axis::Vertical);
        assert_eq!(Left.axis(), Axis::Horizontal);
        assert_eq!(Right.axis(), Axis::Horizontal);
    }
}
