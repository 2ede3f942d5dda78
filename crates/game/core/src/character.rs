//! Playable characters.
//!
//! Each archetype exists in a normal and a `Hard` variant; hard variants
//! play without the active skill. Ids serialize as plain strings in the
//! shared document.

use serde::{Deserialize, Serialize};

/// Character-variant id, as stored in `playerCharacter`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Character {
    Acrobat,
    AcrobatHard,
    Hacker,
    HackerHard,
    Hawk,
    HawkHard,
    Juicer,
    JuicerHard,
    Peterman,
    PetermanHard,
    Raven,
    RavenHard,
    Rigger,
    RiggerHard,
    Rook,
    RookHard,
    Spotter,
    SpotterHard,
}

/// The nine base archetypes; hard variants share their passive rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Archetype {
    Acrobat,
    Hacker,
    Hawk,
    Juicer,
    Peterman,
    Raven,
    Rigger,
    Rook,
    Spotter,
}

impl Character {
    pub fn archetype(self) -> Archetype {
        use Character::*;
        match self {
            Acrobat | AcrobatHard => Archetype::Acrobat,
            Hacker | HackerHard => Archetype::Hacker,
            Hawk | HawkHard => Archetype::Hawk,
            Juicer | JuicerHard => Archetype::Juicer,
            Peterman | PetermanHard => Archetype::Peterman,
            Raven | RavenHard => Archetype::Raven,
            Rigger | RiggerHard => Archetype::Rigger,
            Rook | RookHard => Archetype::Rook,
            Spotter | SpotterHard => Archetype::Spotter,
        }
    }

    pub fn is_hard(self) -> bool {
        use Character::*;
        matches!(
            self,
            AcrobatHard
                | HackerHard
                | HawkHard
                | JuicerHard
                | PetermanHard
                | RavenHard
                | RiggerHard
                | RookHard
                | SpotterHard
        )
    }

    /// Hard variants have no active skill at all.
    pub fn has_skill(self) -> bool {
        !self.is_hard() && self.archetype() != Archetype::Acrobat && self.archetype() != Archetype::Peterman
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_archetype_has_a_hard_twin() {
        let (hard, normal): (Vec<_>, Vec<_>) = Character::iter().partition(|c| c.is_hard());
        assert_eq!(hard.len(), 9);
        assert_eq!(normal.len(), 9);
        for c in hard {
            assert!(normal.iter().any(|n| n.archetype() == c.archetype()));
        }
    }

    #[test]
    fn ids_round_trip_as_strings() {
        let json = serde_json::to_string(&Character::AcrobatHard).unwrap();
        assert_eq!(json, "\"AcrobatHard\"");
        let back: Character = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Character::AcrobatHard);
    }
}
