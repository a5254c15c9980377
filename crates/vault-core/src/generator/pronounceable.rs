//! Pronounceable passwords
//!
//! Alternating consonant (or digraph) and vowel syllables, truncated to the
//! requested length. When digits or symbols are enabled a few letters are
//! swapped for their look-alikes; case follows the upper/lower flags.

use rand::seq::SliceRandom;
use zeroize::Zeroizing;

use crate::crypto::{RandomSource, SecretString};
use crate::policy::PolicyFlags;

const CONSONANTS: &[&str] = &[
    "b", "c", "d", "f", "g", "h", "j", "k", "l", "m", "n", "p", "r", "s", "t", "v", "w", "z",
    "ch", "sh", "th", "st", "tr", "br", "pl", "gr",
];

const VOWELS: &[&str] = &["a", "e", "i", "o", "u", "y"];

/// Digit and symbol look-alikes for a lowercase letter
fn leet(letter: char) -> (Option<char>, Option<char>) {
    match letter {
        'a' => (Some('4'), Some('@')),
        'b' => (Some('8'), Some('&')),
        'c' => (None, Some('(')),
        'e' => (Some('3'), None),
        'g' => (Some('6'), None),
        'h' => (None, Some('#')),
        'i' => (Some('1'), Some('!')),
        'l' => (Some('1'), Some('|')),
        'o' => (Some('0'), None),
        's' => (Some('5'), Some('$')),
        't' => (Some('7'), Some('+')),
        'z' => (Some('2'), None),
        _ => (None, None),
    }
}

pub(crate) fn make_password<R: RandomSource + ?Sized>(
    length: usize,
    flags: PolicyFlags,
    rng: &mut R,
) -> SecretString {
    let mut letters: Zeroizing<Vec<char>> = Zeroizing::new(Vec::with_capacity(length + 2));
    let mut consonant = true;
    while letters.len() < length {
        let table = if consonant { CONSONANTS } else { VOWELS };
        letters.extend(table[rng.below(table.len())].chars());
        consonant = !consonant;
    }
    letters.truncate(length);

    let digits = flags.contains(PolicyFlags::USE_DIGITS);
    let symbols = flags.contains(PolicyFlags::USE_SYMBOLS);
    if digits || symbols {
        substitute(&mut letters, digits, symbols, rng);
    }

    let lower = flags.contains(PolicyFlags::USE_LOWERCASE);
    let upper = flags.contains(PolicyFlags::USE_UPPERCASE);
    for c in letters.iter_mut().filter(|c| c.is_ascii_lowercase()) {
        if upper && (!lower || rng.coin()) {
            *c = c.to_ascii_uppercase();
        }
    }

    SecretString::new(letters.iter().collect())
}

/// Replace between one and half of the candidate letters
fn substitute<R: RandomSource + ?Sized>(
    letters: &mut [char],
    digits: bool,
    symbols: bool,
    rng: &mut R,
) {
    let available = |c: char| {
        let (digit, symbol) = leet(c);
        (digit.filter(|_| digits), symbol.filter(|_| symbols))
    };

    let mut candidates: Vec<usize> = letters
        .iter()
        .enumerate()
        .filter(|(_, c)| available(**c) != (None, None))
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let count = rng.below(candidates.len()) / 2 + 1;
    candidates.shuffle(rng);
    for &i in &candidates[..count] {
        letters[i] = match available(letters[i]) {
            (Some(digit), Some(symbol)) => {
                if rng.coin() {
                    symbol
                } else {
                    digit
                }
            }
            (Some(sub), None) | (None, Some(sub)) => sub,
            (None, None) => letters[i],
        };
    }
}
