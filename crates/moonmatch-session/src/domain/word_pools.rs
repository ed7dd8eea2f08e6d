//! Word-pool inventory management.
//!
//! Free-text phases consume pool entries; narrative grants and profile
//! creation add them. Both operations are *planned* here against the current
//! pool contents and recorded verbatim in the resulting domain event, so that
//! replaying the event stream reproduces the pools exactly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use moonmatch_core::rng::DeterministicRng;
use moonmatch_content::{Word, WordKind};

/// Which pool a consumed word came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    Simple,
    Character,
}

/// One pool entry consumed by a free-text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumedWord {
    /// The consumed entry.
    pub word: Word,
    /// The pool it was removed from.
    pub from: PoolKind,
}

/// Plans which pool entries a free-text message consumes.
///
/// The text is split on whitespace; each token that matches a pool entry by
/// text removes exactly one entry, the simple pool checked first. Tokens
/// matching nothing are ignored — this is inventory consumption, not
/// validation.
#[must_use]
pub fn plan_consumption(
    simple: &BTreeSet<Word>,
    character: &BTreeSet<Word>,
    text: &str,
) -> Vec<ConsumedWord> {
    let mut simple = simple.clone();
    let mut character = character.clone();
    let mut consumed = Vec::new();

    for token in text.split_whitespace() {
        if let Some(word) = take_by_text(&mut simple, token) {
            consumed.push(ConsumedWord {
                word,
                from: PoolKind::Simple,
            });
        } else if let Some(word) = take_by_text(&mut character, token) {
            consumed.push(ConsumedWord {
                word,
                from: PoolKind::Character,
            });
        }
    }

    consumed
}

/// Removes and returns the first entry whose text matches the token.
fn take_by_text(pool: &mut BTreeSet<Word>, token: &str) -> Option<Word> {
    let found = pool.iter().find(|w| w.text == token).cloned();
    if let Some(word) = &found {
        pool.remove(word);
    }
    found
}

/// Plans simple-pool replenishment toward the per-kind target counts.
///
/// For each grammatical kind: if the pool is short of its target and at least
/// that many distinct eligible words exist in the catalog outside the pool, a
/// uniformly random subset of exactly the deficit is drawn. If fewer eligible
/// words exist than the deficit, the kind is skipped entirely — no partial
/// top-up.
#[must_use]
pub fn plan_replenishment(
    simple_pool: &BTreeSet<Word>,
    available: &BTreeSet<Word>,
    rng: &mut dyn DeterministicRng,
) -> Vec<Word> {
    let mut drawn = Vec::new();

    for kind in WordKind::SIMPLE {
        let current = simple_pool.iter().filter(|w| w.kind == kind).count();
        let target = kind.simple_target();
        if current >= target {
            continue;
        }
        let deficit = target - current;

        let eligible: Vec<&Word> = available
            .iter()
            .filter(|w| w.kind == kind && !simple_pool.contains(*w))
            .collect();
        if eligible.len() < deficit {
            continue;
        }

        for index in rng.sample_indices(eligible.len(), deficit) {
            drawn.push(eligible[index].clone());
        }
    }

    drawn
}
