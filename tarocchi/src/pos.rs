//! Player position in the table

use serde::{Deserialize, Serialize};

/// A seat at a table of `count` players.
///
/// Seats are plain indices: a position never owns or borrows the player sitting there.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PlayerPos {
    pub idx: usize,
    pub count: usize,
}

/// Iterates on players
pub struct PlayerIterator {
    current: PlayerPos,
    remaining: usize,
}

impl Iterator for PlayerIterator {
    type Item = PlayerPos;

    fn next(&mut self) -> Option<PlayerPos> {
        if self.remaining == 0 {
            return None;
        }

        let r = self.current;
        self.current = self.current.next();
        self.remaining -= 1;
        Some(r)
    }
}

impl PlayerPos {
    /// Returns the seat `idx` of a table of `count`.
    ///
    /// # Panics
    ///
    /// If `idx >= count`.
    pub fn new(idx: usize, count: usize) -> Self {
        assert!(idx < count, "invalid pos: {} of {}", idx, count);
        PlayerPos { idx, count }
    }

    /// Every seat of the table, starting with seat 0.
    pub fn all(count: usize) -> PlayerIterator {
        PlayerPos::new(0, count).until_n(count)
    }

    /// Returns the number corresponding to the position.
    pub fn to_n(self) -> usize {
        self.idx
    }

    /// Returns the next player in line
    pub fn next(self) -> PlayerPos {
        self.next_n(1)
    }

    /// Returns the player `n` seats further
    pub fn next_n(self, n: usize) -> PlayerPos {
        PlayerPos::new((self.idx + n) % self.count, self.count)
    }

    /// Returns the previous player.
    pub fn prev(self) -> PlayerPos {
        self.next_n(self.count - 1)
    }

    /// Returns an iterator that iterates on `n` players, including this one.
    pub fn until_n(self, n: usize) -> PlayerIterator {
        PlayerIterator {
            current: self,
            remaining: n,
        }
    }

    /// Returns the number of turns after `self` to reach `other`.
    pub fn distance_until(self, other: PlayerPos) -> usize {
        (self.count - 1 + other.idx - self.idx) % self.count + 1
    }

    /// Returns an iterator until the given player (`self` included, `other` excluded)
    pub fn until(self, other: PlayerPos) -> PlayerIterator {
        let d = self.distance_until(other);
        self.until_n(d)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_pos() {
        for count in 3..=5 {
            let mut counts = [0; 5];
            for i in 0..count {
                for pos in PlayerPos::new(i, count).until(PlayerPos::new(0, count)) {
                    counts[pos.idx] += 1;
                }
                for pos in PlayerPos::new(0, count).until(PlayerPos::new(i, count)) {
                    counts[pos.idx] += 1;
                }
            }

            for c in counts.iter().take(count) {
                assert_eq!(*c, count + 1);
            }

            for i in 0..count {
                let pos = PlayerPos::new(i, count);
                assert_eq!(pos.next(), PlayerPos::new((i + 1) % count, count));
                assert_eq!(pos.next().prev(), pos);
                assert_eq!(pos.next_n(count), pos);
            }
        }
    }

    #[test]
    fn test_all() {
        let seats: Vec<usize> = PlayerPos::all(4).map(|p| p.to_n()).collect();
        assert_eq!(seats, vec![0, 1, 2, 3]);
        let from_last: Vec<usize> = PlayerPos::new(3, 4).until_n(4).map(|p| p.to_n()).collect();
        assert_eq!(from_last, vec![3, 0, 1, 2]);
    }

    #[test]
    #[should_panic]
    fn test_bad_pos() {
        PlayerPos::new(3, 3);
    }
}
