//! The in-memory content catalog.
//!
//! All lookups are by id; ingestion resolves names to ids with get-or-create
//! semantics so re-ingesting the same pack is a no-op.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use moonmatch_core::error::DomainError;

use crate::pack::ContentPack;
use crate::words::Word;

/// A quality and the thematic words it grants.
#[derive(Debug, Clone, Serialize)]
pub struct Quality {
    /// Catalog identifier.
    pub id: Uuid,
    /// Quality name.
    pub name: String,
    /// Words granted when this quality is chosen at profile creation.
    pub words: BTreeSet<Word>,
}

/// An activity and the questions it unlocks.
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    /// Catalog identifier.
    pub id: Uuid,
    /// Activity name.
    pub name: String,
    /// Questions unlocked by this activity.
    pub questions: Vec<Uuid>,
}

/// A question a player can ask.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    /// Catalog identifier.
    pub id: Uuid,
    /// Question text.
    pub text: String,
}

/// An interest and its narrative choices.
#[derive(Debug, Clone, Serialize)]
pub struct Interest {
    /// Catalog identifier.
    pub id: Uuid,
    /// Interest name.
    pub name: String,
    /// Narrative choices tied to this interest.
    pub narrative_choices: Vec<Uuid>,
}

/// A narrative branching option granting bonus vocabulary.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeChoice {
    /// Catalog identifier.
    pub id: Uuid,
    /// Choice name.
    pub name: String,
    /// Owning interest.
    pub interest_id: Uuid,
    /// Narrative night this choice belongs to.
    pub night_number: u32,
    /// Words granted when the choice is taken.
    pub words: BTreeSet<Word>,
}

/// A playable character with slotted creation choices.
#[derive(Debug, Clone, Serialize)]
pub struct Character {
    /// Catalog identifier.
    pub id: Uuid,
    /// Character name, used as the player display name.
    pub name: String,
    /// Avatar image location.
    pub avatar_url: String,
    /// Three quality slots, each a menu of quality ids.
    pub quality_slots: [Vec<Uuid>; 3],
    /// Three interest slots.
    pub interest_slots: [Vec<Uuid>; 3],
    /// Two activity slots.
    pub activity_slots: [Vec<Uuid>; 2],
}

/// Counts of entities created by one ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    /// SHA-256 fingerprint of the ingested document.
    pub version_hash: String,
    /// Newly created qualities.
    pub qualities: usize,
    /// Newly created activities.
    pub activities: usize,
    /// Newly created questions.
    pub questions: usize,
    /// Newly created interests.
    pub interests: usize,
    /// Newly created narrative choices.
    pub narrative_choices: usize,
    /// Newly created characters.
    pub characters: usize,
    /// Newly created simple words.
    pub simple_words: usize,
}

/// The full game-content catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    qualities: HashMap<Uuid, Quality>,
    quality_names: HashMap<String, Uuid>,
    activities: HashMap<Uuid, Activity>,
    activity_names: HashMap<String, Uuid>,
    questions: HashMap<Uuid, Question>,
    question_texts: HashMap<String, Uuid>,
    interests: HashMap<Uuid, Interest>,
    interest_names: HashMap<String, Uuid>,
    narrative_choices: HashMap<Uuid, NarrativeChoice>,
    choice_keys: BTreeMap<(Uuid, String, u32), Uuid>,
    characters: HashMap<Uuid, Character>,
    character_names: HashMap<String, Uuid>,
    simple_words: BTreeSet<Word>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests a content pack with get-or-create semantics.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a character slot references a
    /// quality, interest, or activity name absent from both the pack and the
    /// existing catalog.
    pub fn ingest(&mut self, pack: &ContentPack) -> Result<IngestSummary, DomainError> {
        let mut summary = IngestSummary {
            version_hash: fingerprint(pack),
            qualities: 0,
            activities: 0,
            questions: 0,
            interests: 0,
            narrative_choices: 0,
            characters: 0,
            simple_words: 0,
        };

        for quality_doc in &pack.qualities {
            let (id, created) = get_or_create(
                &mut self.quality_names,
                &quality_doc.name,
                |id, name| Quality {
                    id,
                    name,
                    words: BTreeSet::new(),
                },
                &mut self.qualities,
            );
            summary.qualities += usize::from(created);
            let quality = self
                .qualities
                .get_mut(&id)
                .expect("quality inserted above");
            for text in &quality_doc.words {
                quality.words.insert(Word::thematic(text.clone()));
            }
        }

        for activity_doc in &pack.activities {
            let (id, created) = get_or_create(
                &mut self.activity_names,
                &activity_doc.name,
                |id, name| Activity {
                    id,
                    name,
                    questions: Vec::new(),
                },
                &mut self.activities,
            );
            summary.activities += usize::from(created);
            for text in &activity_doc.questions {
                let (question_id, created) = get_or_create(
                    &mut self.question_texts,
                    text,
                    |id, text| Question { id, text },
                    &mut self.questions,
                );
                summary.questions += usize::from(created);
                let activity = self
                    .activities
                    .get_mut(&id)
                    .expect("activity inserted above");
                if !activity.questions.contains(&question_id) {
                    activity.questions.push(question_id);
                }
            }
        }

        for interest_doc in &pack.interests {
            let (interest_id, created) = get_or_create(
                &mut self.interest_names,
                &interest_doc.name,
                |id, name| Interest {
                    id,
                    name,
                    narrative_choices: Vec::new(),
                },
                &mut self.interests,
            );
            summary.interests += usize::from(created);
            for choice_doc in &interest_doc.narrative_choices {
                let key = (
                    interest_id,
                    choice_doc.name.clone(),
                    choice_doc.night_number,
                );
                let choice_id = if let Some(&existing) = self.choice_keys.get(&key) {
                    existing
                } else {
                    let id = Uuid::new_v4();
                    self.choice_keys.insert(key, id);
                    self.narrative_choices.insert(
                        id,
                        NarrativeChoice {
                            id,
                            name: choice_doc.name.clone(),
                            interest_id,
                            night_number: choice_doc.night_number,
                            words: BTreeSet::new(),
                        },
                    );
                    summary.narrative_choices += 1;
                    let interest = self
                        .interests
                        .get_mut(&interest_id)
                        .expect("interest inserted above");
                    interest.narrative_choices.push(id);
                    id
                };
                let choice = self
                    .narrative_choices
                    .get_mut(&choice_id)
                    .expect("choice inserted above");
                for text in &choice_doc.words {
                    choice.words.insert(Word::thematic(text.clone()));
                }
            }
        }

        for word_doc in &pack.simple_words {
            summary.simple_words += usize::from(self.simple_words.insert(word_doc.to_word()));
        }

        if let Some(character_doc) = &pack.character {
            let quality_slots = [
                resolve_names(&character_doc.quality_1_choices, &self.quality_names)?,
                resolve_names(&character_doc.quality_2_choices, &self.quality_names)?,
                resolve_names(&character_doc.quality_3_choices, &self.quality_names)?,
            ];
            let interest_slots = [
                resolve_names(&character_doc.interest_1_choices, &self.interest_names)?,
                resolve_names(&character_doc.interest_2_choices, &self.interest_names)?,
                resolve_names(&character_doc.interest_3_choices, &self.interest_names)?,
            ];
            let activity_slots = [
                resolve_names(&character_doc.activity_1_choices, &self.activity_names)?,
                resolve_names(&character_doc.activity_2_choices, &self.activity_names)?,
            ];

            if let Some(&existing) = self.character_names.get(&character_doc.name) {
                let character = self
                    .characters
                    .get_mut(&existing)
                    .expect("character index entry has a record");
                character.avatar_url = character_doc.avatar_url.clone();
                character.quality_slots = quality_slots;
                character.interest_slots = interest_slots;
                character.activity_slots = activity_slots;
            } else {
                let id = Uuid::new_v4();
                self.character_names.insert(character_doc.name.clone(), id);
                self.characters.insert(
                    id,
                    Character {
                        id,
                        name: character_doc.name.clone(),
                        avatar_url: character_doc.avatar_url.clone(),
                        quality_slots,
                        interest_slots,
                        activity_slots,
                    },
                );
                summary.characters += 1;
            }
        }

        Ok(summary)
    }

    /// Looks up a quality by id.
    #[must_use]
    pub fn quality(&self, id: Uuid) -> Option<&Quality> {
        self.qualities.get(&id)
    }

    /// Looks up an activity by id.
    #[must_use]
    pub fn activity(&self, id: Uuid) -> Option<&Activity> {
        self.activities.get(&id)
    }

    /// Looks up a question by id.
    #[must_use]
    pub fn question(&self, id: Uuid) -> Option<&Question> {
        self.questions.get(&id)
    }

    /// Looks up an interest by id.
    #[must_use]
    pub fn interest(&self, id: Uuid) -> Option<&Interest> {
        self.interests.get(&id)
    }

    /// Looks up a narrative choice by id.
    #[must_use]
    pub fn narrative_choice(&self, id: Uuid) -> Option<&NarrativeChoice> {
        self.narrative_choices.get(&id)
    }

    /// Looks up a character by id.
    #[must_use]
    pub fn character(&self, id: Uuid) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// All playable characters, for the avatar-selection listing.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    /// All qualities.
    pub fn qualities(&self) -> impl Iterator<Item = &Quality> {
        self.qualities.values()
    }

    /// All activities.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }

    /// All interests.
    pub fn interests(&self) -> impl Iterator<Item = &Interest> {
        self.interests.values()
    }

    /// All questions.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    /// The full simple-word pool, ordered by `(text, kind)`.
    #[must_use]
    pub fn simple_words(&self) -> &BTreeSet<Word> {
        &self.simple_words
    }
}

fn resolve_names(
    names: &[String],
    index: &HashMap<String, Uuid>,
) -> Result<Vec<Uuid>, DomainError> {
    names
        .iter()
        .map(|name| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| DomainError::Validation(format!("unknown content reference: {name}")))
        })
        .collect()
}

fn get_or_create<T>(
    names: &mut HashMap<String, Uuid>,
    name: &str,
    build: impl FnOnce(Uuid, String) -> T,
    records: &mut HashMap<Uuid, T>,
) -> (Uuid, bool) {
    if let Some(&id) = names.get(name) {
        (id, false)
    } else {
        let id = Uuid::new_v4();
        names.insert(name.to_owned(), id);
        records.insert(id, build(id, name.to_owned()));
        (id, true)
    }
}

/// SHA-256 fingerprint of a pack document, used as a content version marker.
fn fingerprint(pack: &ContentPack) -> String {
    // Serialization of derived Serialize types to Vec is infallible.
    let bytes = serde_json::to_vec(pack).expect("ContentPack serialization is infallible");
    let digest = Sha256::digest(&bytes);
    format!("{digest:x}")
}
