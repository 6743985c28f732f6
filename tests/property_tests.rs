//! Property tests over random decks and random play.

mod common;

use std::time::Duration;

use memory_match::{
    DeckGenerator, FlipResult, GameRng, GameSessionBuilder, LevelCatalog, LevelConfig, Phase,
    DEFAULT_LEVELS,
};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

use common::{init_logging, player_store};

#[derive(Clone, Debug)]
enum Step {
    Flip(u32),
    Wait(u64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0u32..24).prop_map(Step::Flip),
        1 => (0u64..2_500).prop_map(Step::Wait),
    ]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        failure_persistence: None,
        cases: 64,
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(config())]

    /// Every dealt deck holds each symbol exactly twice.
    #[test]
    fn prop_deck_is_pairs(seed in any::<u64>(), level in 0usize..3) {
        let config: LevelConfig = DEFAULT_LEVELS[level];
        let cards = DeckGenerator::default()
            .generate(&config, &mut GameRng::new(seed))
            .unwrap();

        prop_assert_eq!(cards.len(), config.card_count());
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for card in &cards {
            *counts.entry(card.symbol.as_str()).or_default() += 1;
        }
        prop_assert_eq!(counts.len(), config.pair_count as usize);
        prop_assert!(counts.values().all(|&n| n == 2));
        prop_assert!(cards.iter().enumerate().all(|(i, c)| c.id.raw() == i as u32));
    }

    /// A catalog accepts a level exactly when rows x cols == 2 x pairs.
    #[test]
    fn prop_catalog_grid_matches_pairs(rows in 1u32..6, cols in 1u32..6, pairs in 1u32..16) {
        let result = LevelCatalog::new(vec![LevelConfig::new(1, rows, cols, pairs, 30)]);
        prop_assert_eq!(result.is_ok(), rows * cols == 2 * pairs);
    }

    /// Random play never shows more than two unmatched cards face-up, and the
    /// score and matched-pair count never go down within a round.
    #[test]
    fn prop_random_play_invariants(
        seed in any::<u64>(),
        steps in prop::collection::vec(step(), 1..120),
    ) {
        init_logging();
        let mut session = GameSessionBuilder::new()
            .seed(seed)
            .start(player_store())
            .unwrap();
        session.advance_by(Duration::from_secs(3));

        let mut last_score = session.score();
        let mut last_matched = session.matched_pairs();
        for step in steps {
            match step {
                Step::Flip(raw) => {
                    let result = session.flip(memory_match::CardId::new(raw));
                    if session.phase() != Phase::Playing {
                        prop_assert!(result.is_rejected());
                    }
                    if matches!(result, FlipResult::Matched(_) | FlipResult::Mismatched(_)) {
                        prop_assert_eq!(session.engine().pending().len(), 2);
                    }
                }
                Step::Wait(ms) => {
                    session.advance_by(Duration::from_millis(ms));
                }
            }

            prop_assert!(session.engine().face_up_unmatched() <= 2);
            prop_assert!(session.score() >= last_score);
            prop_assert!(session.matched_pairs() >= last_matched);
            prop_assert!(session.matched_pairs() <= session.engine().pair_count());
            prop_assert_eq!(session.score(), 100 * u64::from(session.matched_pairs()));
            last_score = session.score();
            last_matched = session.matched_pairs();
        }
    }
}
