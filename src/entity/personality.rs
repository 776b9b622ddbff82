//! Personality traits for wild creatures
//!
//! Traits gate which behaviors a controller registers and scale how far a
//! creature detects, approaches and flees from the player. They combine
//! freely: a TERRITORIAL + AGGRESSIVE creature both patrols and charges.

use bitflags::bitflags;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of personality traits with O(1) membership tests
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Traits: u16 {
        const AGGRESSIVE  = 1 << 0;
        const TERRITORIAL = 1 << 1;
        const PASSIVE     = 1 << 2;
        const CURIOUS     = 1 << 3;
        const TIMID       = 1 << 4;
        const LAZY        = 1 << 5;
        const PACK_LEADER = 1 << 6;
        const FOLLOWER    = 1 << 7;
        const SOLITARY    = 1 << 8;
        const NOCTURNAL   = 1 << 9;
        const DIURNAL     = 1 << 10;
        const PROTECTIVE  = 1 << 11;
    }
}

/// Per-trait behavior multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitModifiers {
    pub approach: f32,
    pub flee: f32,
    pub detection: f32,
}

const fn modifiers(approach: f32, flee: f32, detection: f32) -> TraitModifiers {
    TraitModifiers {
        approach,
        flee,
        detection,
    }
}

/// Primary temperament, exactly one per creature
const PRIMARY: [Traits; 6] = [
    Traits::AGGRESSIVE,
    Traits::PASSIVE,
    Traits::CURIOUS,
    Traits::TIMID,
    Traits::TERRITORIAL,
    Traits::LAZY,
];

const SOCIAL: [Traits; 3] = [Traits::PACK_LEADER, Traits::FOLLOWER, Traits::SOLITARY];

const SOCIAL_TRAIT_CHANCE: f64 = 0.7;
const ACTIVITY_TRAIT_CHANCE: f64 = 0.3;

impl Traits {
    /// Multipliers of a single named trait
    pub fn modifiers(self) -> TraitModifiers {
        match self {
            Traits::AGGRESSIVE => modifiers(1.5, 0.8, 3.0),
            Traits::TERRITORIAL => modifiers(1.2, 0.6, 2.5),
            Traits::PASSIVE => modifiers(0.3, 1.5, 1.0),
            Traits::CURIOUS => modifiers(1.1, 1.0, 2.0),
            Traits::TIMID => modifiers(0.1, 2.0, 1.5),
            Traits::LAZY => modifiers(0.5, 1.0, 0.8),
            Traits::PACK_LEADER => modifiers(1.0, 0.7, 2.0),
            Traits::FOLLOWER => modifiers(0.8, 1.2, 1.2),
            Traits::SOLITARY => modifiers(0.6, 1.0, 1.0),
            Traits::PROTECTIVE => modifiers(1.3, 0.5, 2.5),
            _ => modifiers(1.0, 1.0, 1.0),
        }
    }

    /// Strongest approach multiplier in the set, 1.0 when empty
    pub fn approach_factor(self) -> f32 {
        self.iter()
            .map(|t| t.modifiers().approach)
            .reduce(f32::max)
            .unwrap_or(1.0)
    }

    /// Most cautious flee multiplier in the set, 1.0 when empty
    pub fn flee_multiplier(self) -> f32 {
        self.iter()
            .map(|t| t.modifiers().flee)
            .reduce(f32::min)
            .unwrap_or(1.0)
    }

    pub fn detection_multiplier(self) -> f32 {
        self.iter()
            .map(|t| t.modifiers().detection)
            .reduce(f32::max)
            .unwrap_or(1.0)
    }

    /// Traits every member of a species carries regardless of the roll
    pub fn for_species(species: &str) -> Traits {
        match species.to_lowercase().as_str() {
            "growlithe" | "arcanine" | "manectric" => Traits::PROTECTIVE,
            "snorlax" => Traits::LAZY,
            "primeape" | "mankey" => Traits::AGGRESSIVE,
            "eevee" | "skitty" => Traits::CURIOUS,
            _ => Traits::empty(),
        }
    }

    /// Roll a personality: one primary trait, a likely social role, an
    /// occasional activity cycle and any species traits.
    pub fn generate<R: Rng + ?Sized>(species: &str, rng: &mut R) -> Traits {
        let mut traits = Traits::empty();

        if let Some(&primary) = PRIMARY.choose(rng) {
            traits |= primary;
        }

        if rng.gen_bool(SOCIAL_TRAIT_CHANCE) {
            if let Some(&social) = SOCIAL.choose(rng) {
                traits |= social;
            }
        }

        if rng.gen_bool(ACTIVITY_TRAIT_CHANCE) {
            traits |= if rng.gen_bool(0.5) {
                Traits::NOCTURNAL
            } else {
                Traits::DIURNAL
            };
        }

        traits | Traits::for_species(species)
    }

    /// Role given to the creature leading a pack
    pub fn as_pack_leader(self) -> Traits {
        (self - Traits::FOLLOWER - Traits::SOLITARY) | Traits::PACK_LEADER
    }

    /// Role given to placed pack members
    pub fn as_pack_follower(self) -> Traits {
        (self - Traits::PACK_LEADER - Traits::SOLITARY) | Traits::FOLLOWER
    }

    /// Upper-case names, e.g. `["AGGRESSIVE", "FOLLOWER"]`
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}
