use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffled playback queue.
///
/// Items are handed out one at a time; once every item has been drawn the deck
/// is refilled from the full set and reshuffled.
pub struct Deck<T> {
    all: Vec<T>,
    remaining: Vec<T>,
}

impl<T: Clone> Deck<T> {
    pub fn new(all: Vec<T>) -> Self {
        Self { all, remaining: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Items left before the next reshuffle.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Draws the next item, reshuffling first if the current cycle is exhausted.
    /// Returns `None` only when the deck holds no items at all.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<T> {
        if self.remaining.is_empty() {
            if self.all.is_empty() {
                return None;
            }
            self.remaining = self.all.clone();
            self.remaining.shuffle(rng);
        }
        self.remaining.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn empty_deck_draws_nothing() {
        let mut deck: Deck<u32> = Deck::new(Vec::new());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(deck.is_empty());
        assert_eq!(deck.draw(&mut rng), None);
    }

    #[test]
    fn three_card_cycle_then_refill() {
        let mut deck = Deck::new(vec!['A', 'B', 'C']);
        let mut rng = StdRng::seed_from_u64(7);

        let mut drawn: Vec<char> = (0..3).map(|_| deck.draw(&mut rng).unwrap()).collect();
        assert_eq!(deck.remaining(), 0);
        drawn.sort();
        assert_eq!(drawn, vec!['A', 'B', 'C']);

        // The fourth draw reshuffles the full set before popping
        assert!(deck.draw(&mut rng).is_some());
        assert_eq!(deck.remaining(), 2);
    }

    #[test]
    fn every_cycle_is_a_permutation() {
        let items: Vec<usize> = (0..25).collect();
        let mut deck = Deck::new(items.clone());
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..40 {
            let mut cycle: Vec<usize> = (0..items.len()).map(|_| deck.draw(&mut rng).unwrap()).collect();
            cycle.sort();
            assert_eq!(cycle, items);
        }
    }

    #[test]
    fn single_item_deck_repeats() {
        let mut deck = Deck::new(vec!["only.png"]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..5 {
            assert_eq!(deck.draw(&mut rng), Some("only.png"));
        }
    }

    #[test]
    fn shuffles_show_no_positional_bias() {
        const CYCLES: usize = 6000;
        let mut deck = Deck::new(vec![0u8, 1, 2]);
        let mut rng = StdRng::seed_from_u64(2024);

        let mut first_counts = [0usize; 3];
        let mut orders: HashMap<[u8; 3], usize> = HashMap::new();
        for _ in 0..CYCLES {
            let cycle = [
                deck.draw(&mut rng).unwrap(),
                deck.draw(&mut rng).unwrap(),
                deck.draw(&mut rng).unwrap(),
            ];
            first_counts[cycle[0] as usize] += 1;
            *orders.entry(cycle).or_default() += 1;
        }

        // Expected 2000 per item (sd ~37) and 1000 per permutation (sd ~29)
        for count in first_counts {
            assert!((1800..=2200).contains(&count), "first position counts {:?}", first_counts);
        }
        assert_eq!(orders.len(), 6);
        for count in orders.values() {
            assert!((850..=1150).contains(count), "permutation counts {:?}", orders);
        }
    }
}
