//! Board arena.
//!
//! Every team owns a *pair* of boards: side A and side B show the same words
//! with the same hidden categories, one per perspective group. All boards live
//! in one `BoardSet`; a board stores its tiles row-major in a flat vector and
//! the id of its paired board, so `opposite` is a constant-time index swap.

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::game::{MAX_COLS, MAX_ROWS};
use crate::error::{GameError, Result};
use crate::game::types::{Category, Coord, Side};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub word: String,
    pub category: Category,
    pub revealed: bool,
    /// Revealed as a Hit on either side of the pair.
    pub solved: bool,
    /// A neutral pick happened on one side of the pair.
    pub failed_neutral: bool,
    /// Picked a second time from the other side, or picked as a rival cell.
    pub contested: bool,
}

impl Tile {
    fn new(word: String, category: Category) -> Self {
        Self {
            word,
            category,
            revealed: false,
            solved: false,
            failed_neutral: false,
            contested: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardId(pub usize);

/// Address of one tile in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef {
    pub board: BoardId,
    pub index: usize,
}

/// What a reveal found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub category: Category,
    /// False when the tile had already been revealed (cached answer).
    pub first: bool,
    pub contested: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    pair_id: BoardId,
    side: Side,
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl Board {
    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn pair_id(&self) -> BoardId {
        self.pair_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        (coord.row < self.rows && coord.col < self.cols).then(|| coord.row * self.cols + coord.col)
    }

    pub fn coord_of(&self, index: usize) -> Coord {
        Coord::new(index / self.cols, index % self.cols)
    }

    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        self.index_of(coord).map(|i| &self.tiles[i])
    }

    pub fn count(&self, category: Category) -> usize {
        self.tiles.iter().filter(|t| t.category == category).count()
    }

    pub fn remaining_hits(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.category == Category::Hit && !t.solved)
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSet {
    rows: usize,
    cols: usize,
    boards: Vec<Board>,
}

/// Shuffle `hit` Hit + `bust` Bust + remaining Neutral labels over `cells` cells.
pub fn deal_categories<R: Rng + ?Sized>(
    cells: usize,
    hit: usize,
    bust: usize,
    rng: &mut R,
) -> Result<Vec<Category>> {
    if hit + bust > cells {
        return Err(GameError::TooManySpecialTiles { hit, bust, cells });
    }
    let mut labels = Vec::with_capacity(cells);
    labels.extend(std::iter::repeat_n(Category::Hit, hit));
    labels.extend(std::iter::repeat_n(Category::Bust, bust));
    labels.extend(std::iter::repeat_n(Category::Neutral, cells - hit - bust));
    labels.shuffle(rng);
    Ok(labels)
}

impl BoardSet {
    /// Build `pairs` board pairs over the same words, each pair with its own
    /// category assignment.
    pub fn generate<R: Rng + ?Sized>(
        words: &[String],
        rows: usize,
        cols: usize,
        hit_count: usize,
        bust_count: usize,
        pairs: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 || rows > MAX_ROWS || cols > MAX_COLS {
            return Err(GameError::InvalidBoardSize { rows, cols });
        }
        let cells = rows * cols;
        if words.len() < cells {
            return Err(GameError::WordPoolExhausted {
                needed: cells,
                available: words.len(),
            });
        }

        let mut boards = Vec::with_capacity(pairs * 2);
        for pair in 0..pairs {
            let categories = deal_categories(cells, hit_count, bust_count, rng)?;
            for side in [Side::A, Side::B] {
                let id = BoardId(pair * 2 + side.index());
                let tiles = words
                    .iter()
                    .zip(&categories)
                    .map(|(word, category)| Tile::new(word.clone(), *category))
                    .collect();
                boards.push(Board {
                    id,
                    pair_id: BoardId(pair * 2 + side.other().index()),
                    side,
                    rows,
                    cols,
                    tiles,
                });
            }
        }
        debug!(
            "[Board] Generated {} pair(s) of {}x{} boards ({} hit, {} bust)",
            pairs, rows, cols, hit_count, bust_count
        );
        Ok(Self { rows, cols, boards })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn pair_count(&self) -> usize {
        self.boards.len() / 2
    }

    /// Board of `side` in pair number `pair`.
    pub fn board_id(&self, pair: usize, side: Side) -> BoardId {
        BoardId(pair * 2 + side.index())
    }

    pub fn board(&self, id: BoardId) -> &Board {
        &self.boards[id.0]
    }

    pub fn tile_ref(&self, board: BoardId, coord: Coord) -> Option<TileRef> {
        self.board(board)
            .index_of(coord)
            .map(|index| TileRef { board, index })
    }

    pub fn tile(&self, at: TileRef) -> &Tile {
        &self.boards[at.board.0].tiles[at.index]
    }

    fn tile_mut(&mut self, at: TileRef) -> &mut Tile {
        &mut self.boards[at.board.0].tiles[at.index]
    }

    pub fn opposite(&self, at: TileRef) -> TileRef {
        TileRef {
            board: self.board(at.board).pair_id,
            index: at.index,
        }
    }

    /// Reveal a tile and keep its opposite consistent.
    pub fn reveal(&mut self, at: TileRef) -> Reveal {
        let opposite = self.opposite(at);
        let tile = self.tile(at);
        let category = tile.category;
        if tile.revealed {
            return Reveal {
                category,
                first: false,
                contested: tile.contested,
            };
        }

        match category {
            Category::Hit | Category::Bust => {
                for r in [at, opposite] {
                    let t = self.tile_mut(r);
                    t.revealed = true;
                    t.solved = category == Category::Hit;
                }
                Reveal {
                    category,
                    first: true,
                    contested: false,
                }
            }
            Category::Neutral => {
                let contested = self.tile(opposite).failed_neutral;
                {
                    let t = self.tile_mut(at);
                    t.revealed = true;
                    t.failed_neutral = true;
                    t.contested = contested;
                }
                let o = self.tile_mut(opposite);
                o.failed_neutral = true;
                if contested {
                    o.revealed = true;
                    o.contested = true;
                }
                Reveal {
                    category,
                    first: true,
                    contested,
                }
            }
        }
    }

    /// Lock a cell picked while another team had already solved it.
    pub fn mark_contested(&mut self, at: TileRef) {
        let t = self.tile_mut(at);
        t.revealed = true;
        t.contested = true;
    }

    pub fn remaining_hits(&self, pair: usize) -> usize {
        self.board(self.board_id(pair, Side::A)).remaining_hits()
    }

    /// True when the tile at `index` is solved on pair `pair`.
    pub fn is_solved(&self, pair: usize, index: usize) -> bool {
        self.board(self.board_id(pair, Side::A)).tiles[index].solved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{}", i)).collect()
    }

    fn set(pairs: usize, seed: u64) -> BoardSet {
        let mut rng = StdRng::seed_from_u64(seed);
        BoardSet::generate(&words(25), 5, 5, 8, 3, pairs, &mut rng).unwrap()
    }

    fn first(set: &BoardSet, board: BoardId, category: Category) -> TileRef {
        let index = set
            .board(board)
            .tiles()
            .iter()
            .position(|t| t.category == category)
            .unwrap();
        TileRef { board, index }
    }

    #[test]
    fn category_counts_match_declaration() {
        for (rows, cols, hit, bust) in [(5, 5, 8, 3), (3, 4, 5, 2), (1, 1, 1, 0), (2, 2, 0, 4), (5, 5, 25, 0)] {
            let mut rng = StdRng::seed_from_u64((rows * 31 + cols * 7 + hit) as u64);
            let set = BoardSet::generate(&words(rows * cols), rows, cols, hit, bust, 2, &mut rng).unwrap();
            for id in 0..4 {
                let board = set.board(BoardId(id));
                assert_eq!(board.count(Category::Hit), hit);
                assert_eq!(board.count(Category::Bust), bust);
                assert_eq!(board.count(Category::Neutral), rows * cols - hit - bust);
            }
        }
    }

    #[test]
    fn sides_of_a_pair_share_categories() {
        let set = set(2, 3);
        for pair in 0..2 {
            let a = set.board(set.board_id(pair, Side::A));
            let b = set.board(set.board_id(pair, Side::B));
            assert_eq!(a.pair_id(), b.id());
            assert!(a.tiles().iter().zip(b.tiles()).all(|(x, y)| x.category == y.category && x.word == y.word));
        }
    }

    #[test]
    fn opposite_is_an_involution() {
        let set = set(3, 11);
        for board in 0..6 {
            for index in 0..25 {
                let at = TileRef { board: BoardId(board), index };
                let there = set.opposite(at);
                assert_ne!(there.board, at.board);
                assert_eq!(set.opposite(there), at);
            }
        }
    }

    #[test]
    fn hit_reveal_locks_both_sides() {
        let mut set = set(1, 5);
        let at = first(&set, BoardId(0), Category::Hit);
        let before = set.remaining_hits(0);

        let reveal = set.reveal(at);
        assert!(reveal.first);
        assert!(set.tile(set.opposite(at)).solved);
        assert_eq!(set.remaining_hits(0), before - 1);

        // From the other side it is already solved: cached, no double count.
        let again = set.reveal(set.opposite(at));
        assert!(!again.first);
        assert_eq!(again.category, Category::Hit);
        assert_eq!(set.remaining_hits(0), before - 1);
    }

    #[test]
    fn neutral_second_pick_from_other_side_is_contested() {
        let mut set = set(1, 9);
        let at = first(&set, BoardId(0), Category::Neutral);
        let opposite = set.opposite(at);

        let reveal = set.reveal(at);
        assert!(!reveal.contested);
        assert!(set.tile(opposite).failed_neutral);
        assert!(!set.tile(opposite).revealed);

        let second = set.reveal(opposite);
        assert!(second.first);
        assert!(second.contested);
        assert!(set.tile(at).contested && set.tile(opposite).revealed);
    }

    #[test]
    fn oversized_boards_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = BoardSet::generate(&words(36), 6, 6, 8, 3, 1, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InvalidBoardSize { rows: 6, cols: 6 }));
    }

    #[test]
    fn too_few_words_exhausts_the_pool() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = BoardSet::generate(&words(10), 5, 5, 8, 3, 1, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::WordPoolExhausted { needed: 25, available: 10 }));
    }
}
