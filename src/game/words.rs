//! Word pool screening.
//!
//! The board is filled from a flat pool of candidate words. Words wider than
//! the grid cell allows are skipped; running out of usable words is a
//! configuration error.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{GameError, Result};

const DEFAULT_WORDS: &str = include_str!("../../assets/default_words.txt");

/// Built-in pool used when a game is created without words.
pub fn default_words() -> Vec<String> {
    parse_word_list(DEFAULT_WORDS)
}

/// Load a newline separated word list.
pub fn load_word_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_word_list(&text))
}

pub fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn fits_cell(word: &str, max_len: usize) -> bool {
    let len = word.chars().count();
    len > 0 && len <= max_len
}

/// Pick `needed` distinct words in random order, skipping any longer than `max_len`.
pub fn screen_words<R: Rng + ?Sized>(
    pool: &[String],
    needed: usize,
    max_len: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    let mut candidates: Vec<&str> = pool.iter().map(|w| w.trim()).collect();
    candidates.shuffle(rng);

    let mut seen = HashSet::new();
    let mut picked = Vec::with_capacity(needed);
    for word in candidates {
        if picked.len() == needed {
            break;
        }
        if !fits_cell(word, max_len) {
            debug!("[Board] Skipping word too wide for a cell: {}", word);
            continue;
        }
        if seen.insert(word) {
            picked.push(word.to_owned());
        }
    }

    if picked.len() < needed {
        return Err(GameError::WordPoolExhausted {
            needed,
            available: picked.len(),
        });
    }
    Ok(picked)
}
