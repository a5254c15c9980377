//! Weighted character pool
//!
//! The enabled categories' candidate sets are laid end to end on one axis.
//! Drawing a character takes two draws: one over the whole axis to pick the
//! category (so a category's chance is proportional to its set size) and one
//! uniform index inside that category's set.

use rand::seq::SliceRandom;
use zeroize::Zeroizing;

use super::charset::Category;
use super::pronounceable;
use crate::crypto::{RandomSource, SecretString};
use crate::policy::{PasswordPolicy, PolicyFlags};

/// Candidate characters for one enabled category
#[derive(Debug, Clone)]
struct CategorySet {
    category: Category,
    chars: Vec<char>,
    minimum: usize,
}

/// Password synthesizer built from a validated policy
#[derive(Debug, Clone)]
pub struct CharacterPool {
    sets: Vec<CategorySet>,
    /// End offset of each set on the weighting axis
    axis: Vec<usize>,
    total: usize,
    length: usize,
    flags: PolicyFlags,
}

impl CharacterPool {
    /// Build the pool. The policy is expected to be normalized and valid.
    pub fn new(policy: &PasswordPolicy) -> Self {
        let easy_vision = policy.flags.contains(PolicyFlags::USE_EASY_VISION);
        let custom_symbols = policy.symbols.as_deref().filter(|s| !s.is_empty());

        let sets: Vec<CategorySet> = Category::ALL
            .into_iter()
            .filter(|category| policy.uses(*category))
            .map(|category| {
                let chars = match (category, custom_symbols) {
                    (Category::Symbol, Some(custom)) => custom.chars().collect(),
                    _ => category.chars(easy_vision).chars().collect(),
                };
                CategorySet {
                    category,
                    chars,
                    minimum: usize::from(policy.minimum(category)),
                }
            })
            .collect();

        let mut axis = Vec::with_capacity(sets.len());
        let mut total = 0;
        for set in &sets {
            total += set.chars.len();
            axis.push(total);
        }

        Self {
            sets,
            axis,
            total,
            length: usize::from(policy.length),
            flags: policy.flags,
        }
    }

    /// Number of characters on the weighting axis
    pub fn total(&self) -> usize {
        self.total
    }

    /// Categories in axis order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.sets.iter().map(|set| set.category)
    }

    /// Produce one password of exactly the policy's length
    pub fn make_password<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SecretString {
        if self.flags.contains(PolicyFlags::MAKE_PRONOUNCEABLE) {
            return pronounceable::make_password(self.length, self.flags, rng);
        }
        if self.total == 0 {
            return SecretString::new(String::new());
        }

        let mut buffer: Zeroizing<Vec<char>> = Zeroizing::new(Vec::with_capacity(self.length));

        for set in &self.sets {
            for _ in 0..set.minimum {
                if buffer.len() == self.length {
                    break;
                }
                buffer.push(set.chars[rng.below(set.chars.len())]);
            }
        }

        while buffer.len() < self.length {
            buffer.push(self.draw_weighted(rng));
        }

        buffer.shuffle(rng);
        SecretString::new(buffer.iter().collect())
    }

    /// Two-draw selection over the whole axis
    fn draw_weighted<R: RandomSource + ?Sized>(&self, rng: &mut R) -> char {
        let r = rng.below(self.total);
        let index = self.axis.partition_point(|&end| end <= r);
        let set = &self.sets[index];
        set.chars[rng.below(set.chars.len())]
    }
}
