//! Card Image Table
//!
//! Fixed mapping from card id (0-77) to the image path inside the
//! `tarot_source` repository's `result/` folder.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Raw image host for the `tarot_source` repository
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/ricarvy/tarot_source/main/result/";

/// Number of cards in a deck
pub const DECK_SIZE: usize = 78;

/// Card groups, in id order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arcana {
    Major,
    Wands,
    Cups,
    Swords,
    Pentacles,
}

impl Arcana {
    pub const ALL: [Arcana; 5] = [
        Arcana::Major,
        Arcana::Wands,
        Arcana::Cups,
        Arcana::Swords,
        Arcana::Pentacles,
    ];

    /// Ids belonging to this group
    pub const fn ids(self) -> RangeInclusive<u8> {
        match self {
            Arcana::Major => 0..=21,
            Arcana::Wands => 22..=35,
            Arcana::Cups => 36..=49,
            Arcana::Swords => 50..=63,
            Arcana::Pentacles => 64..=77,
        }
    }

    /// Group of a card id
    pub fn of(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|arcana| arcana.ids().contains(&id))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Arcana::Major => "major",
            Arcana::Wands => "wands",
            Arcana::Cups => "cups",
            Arcana::Swords => "swords",
            Arcana::Pentacles => "pentacles",
        }
    }
}

const IMAGE_PATHS: [&str; DECK_SIZE] = [
    // Major arcana
    "Major/The_Fool_New_beginnings.png",
    "Major/The_Magician_Creativity.png",
    "Major/The_High_Priestess_Intuition.png",
    "Major/The_Empress_Abundance.png",
    "Major/The_Emperor_Authority.png",
    "Major/The_Hierophant_Tradition.png",
    "Major/The_Lovers_Love.png",
    "Major/The_Chariot_Victory.png",
    "Major/Strength_Strength.png",
    "Major/The_Hermit_Introspection.png",
    "Major/Wheel_of_Fortune_Destiny.png",
    "Major/Justice_Justice.png",
    "Major/The_Hanged_Man_Sacrifice.png",
    "Major/Death_Change.png",
    "Major/Temperance_Balance.png",
    "Major/The_Devil_Temptation.png",
    "Major/The_Tower_Sudden_change.png",
    "Major/The_Star_Hope.png",
    "Major/The_Moon_Illusion.png",
    "Major/The_Sun_Success.png",
    "Major/Judgement_Rebirth.png",
    "Major/The_World_Completion.png",
    // Wands
    "Minor/Ace_of_Wands_Creativity.png",
    "Minor/Two_of_Wands_Planning.png",
    "Minor/Three_of_Wands_Expansion.png",
    "Minor/Four_of_Wands_Stability.png",
    "Minor/Five_of_Wands_Competition.png",
    "Minor/Six_of_Wands_Victory.png",
    "Minor/Seven_of_Wands_Challenge.png",
    "Minor/Eight_of_Wands_Speed.png",
    "Minor/Nine_of_Wands_Persistence.png",
    "Minor/Ten_of_Wands_Burden.png",
    "Minor/Page_of_Wands_Exploration.png",
    "Minor/Knight_of_Wands_Adventure.png",
    "Minor/Queen_of_Wands_Confidence.png",
    "Minor/King_of_Wands_Leadership.png",
    // Cups
    "Minor/Ace_of_Cups_New_feelings.png",
    "Minor/Two_of_Cups_Partnership.png",
    "Minor/Three_of_Cups_Friendship.png",
    "Minor/Four_of_Cups_Apathy.png",
    "Minor/Five_of_Cups_Disappointment.png",
    "Minor/Six_of_Cups_Nostalgia.png",
    "Minor/Seven_of_Cups_Fantasy.png",
    "Minor/Eight_of_Cups_Abandonment.png",
    "Minor/Nine_of_Cups_Satisfaction.png",
    "Minor/Ten_of_Cups_Happiness.png",
    "Minor/Page_of_Cups_Sensitivity.png",
    "Minor/Knight_of_Cups_Romance.png",
    "Minor/Queen_of_Cups_Intuition.png",
    "Minor/King_of_Cups_Emotional_maturity.png",
    // Swords
    "Minor/Ace_of_Swords_Clarity.png",
    "Minor/Two_of_Swords_Indecision.png",
    "Minor/Three_of_Swords_Heartbreak.png",
    "Minor/Four_of_Swords_Rest.png",
    "Minor/Five_of_Swords_Defeat.png",
    "Minor/Six_of_Swords_Transition.png",
    "Minor/Seven_of_Swords_Deception.png",
    "Minor/Eight_of_Swords_Restriction.png",
    "Minor/Nine_of_Swords_Anxiety.png",
    "Minor/Ten_of_Swords_Ruin.png",
    "Minor/Page_of_Swords_Curiosity.png",
    "Minor/Knight_of_Swords_Impulsiveness.png",
    "Minor/Queen_of_Swords_Independence.png",
    "Minor/King_of_Swords_Logic.png",
    // Pentacles
    "Minor/Ace_of_Pentacles_Material_opportunity.png",
    "Minor/Two_of_Pentacles_Balance.png",
    "Minor/Three_of_Pentacles_Teamwork.png",
    "Minor/Four_of_Pentacles_Security.png",
    "Minor/Five_of_Pentacles_Hardship.png",
    "Minor/Six_of_Pentacles_Generosity.png",
    "Minor/Seven_of_Pentacles_Assessment.png",
    "Minor/Eight_of_Pentacles_Dedication.png",
    "Minor/Nine_of_Pentacles_Independence.png",
    "Minor/Ten_of_Pentacles_Wealth.png",
    "Minor/Page_of_Pentacles_Learning.png",
    "Minor/Knight_of_Pentacles_Responsibility.png",
    "Minor/Queen_of_Pentacles_Abundance.png",
    "Minor/King_of_Pentacles_Wealth.png",
];

/// Image path of a card
pub fn image_path(id: u8) -> Option<&'static str> {
    IMAGE_PATHS.get(usize::from(id)).copied()
}

/// Every `(id, path)` pair in id order
pub fn all() -> impl Iterator<Item = (u8, &'static str)> {
    (0u8..).zip(IMAGE_PATHS)
}
