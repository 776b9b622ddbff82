//! Species spawn tables and pack profiles
//!
//! Tables map biome and time of day to candidate species. The built-in
//! table covers every biome; a TOML file can replace it:
//!
//! ```toml
//! default_day = "Rattata"
//! default_night = "Hoothoot"
//!
//! [[biome]]
//! biome = "plains"
//! day = ["Pidgey", "Rattata"]
//! night = ["Hoothoot"]
//!
//! [[pack]]
//! species = "pidgey"
//! chance = 0.3
//! min_size = 3
//! max_size = 6
//! ```

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::calendar::TimeOfDay;
use crate::core::error::{Result, WildError};
use crate::world::collaborators::Biome;

/// Candidate species of one biome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeSpawns {
    pub biome: Biome,
    #[serde(default)]
    pub day: Vec<String>,
    #[serde(default)]
    pub night: Vec<String>,
}

impl BiomeSpawns {
    fn new(biome: Biome, day: &[&str], night: &[&str]) -> Self {
        Self {
            biome,
            day: day.iter().map(|s| s.to_string()).collect(),
            night: night.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn for_time(&self, time: TimeOfDay) -> &[String] {
        match time {
            TimeOfDay::Day => &self.day,
            TimeOfDay::Night => &self.night,
        }
    }
}

/// Group spawning tendencies of a species
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackProfile {
    /// Multiplied with the configured base pack chance
    pub chance: f32,
    pub min_size: u32,
    pub max_size: u32,
    #[serde(default)]
    pub aggressive: bool,
}

impl PackProfile {
    pub const fn new(chance: f32, min_size: u32, max_size: u32, aggressive: bool) -> Self {
        Self {
            chance,
            min_size,
            max_size,
            aggressive,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PackEntry {
    species: String,
    #[serde(flatten)]
    profile: PackProfile,
}

/// On-disk shape of a species table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpeciesFile {
    default_day: String,
    default_night: String,
    #[serde(default, rename = "biome")]
    biomes: Vec<BiomeSpawns>,
    #[serde(default, rename = "pack")]
    packs: Vec<PackEntry>,
}

/// Biome x time-of-day species table plus per-species pack profiles
#[derive(Debug, Clone)]
pub struct SpeciesTable {
    biomes: AHashMap<Biome, BiomeSpawns>,
    packs: AHashMap<String, PackProfile>,
    default_day: String,
    default_night: String,
}

impl SpeciesTable {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: SpeciesFile = toml::from_str(content)?;
        if file.default_day.is_empty() || file.default_night.is_empty() {
            return Err(WildError::InvalidConfig(
                "species table needs default_day and default_night".into(),
            ));
        }
        for entry in &file.packs {
            let p = entry.profile;
            if p.min_size < 2 || p.min_size > p.max_size || !(0.0..=1.0).contains(&p.chance) {
                return Err(WildError::InvalidConfig(format!(
                    "pack profile for {} is invalid: {:?}",
                    entry.species, p
                )));
            }
        }

        Ok(Self {
            biomes: file.biomes.into_iter().map(|b| (b.biome, b)).collect(),
            packs: file
                .packs
                .into_iter()
                .map(|e| (e.species.to_lowercase(), e.profile))
                .collect(),
            default_day: file.default_day,
            default_night: file.default_night,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Species that stands in when a biome has no candidates
    pub fn default_species(&self, time: TimeOfDay) -> &str {
        match time {
            TimeOfDay::Day => &self.default_day,
            TimeOfDay::Night => &self.default_night,
        }
    }

    /// Candidates for a biome and time; empty when the biome is unknown
    pub fn candidates(&self, biome: Option<Biome>, time: TimeOfDay) -> &[String] {
        biome
            .and_then(|b| self.biomes.get(&b))
            .map_or(&[], |spawns| spawns.for_time(time))
    }

    /// Pick a species, falling back to the time-of-day default
    pub fn select<R: Rng + ?Sized>(&self, biome: Option<Biome>, time: TimeOfDay, rng: &mut R) -> String {
        self.candidates(biome, time)
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| self.default_species(time).to_string())
    }

    pub fn pack_profile(&self, species: &str) -> Option<PackProfile> {
        self.packs.get(&species.to_lowercase()).copied()
    }

    pub fn set_biome(&mut self, spawns: BiomeSpawns) {
        self.biomes.insert(spawns.biome, spawns);
    }

    pub fn set_pack_profile(&mut self, species: &str, profile: PackProfile) {
        self.packs.insert(species.to_lowercase(), profile);
    }

    pub fn remove_pack_profile(&mut self, species: &str) {
        self.packs.remove(&species.to_lowercase());
    }
}

impl Default for SpeciesTable {
    fn default() -> Self {
        let biomes = [
            BiomeSpawns::new(
                Biome::Plains,
                &[
                    "Rattata", "Pidgey", "Sentret", "Hoppip", "Sunkern", "Caterpie", "Weedle",
                    "Oddish", "Bellsprout", "Zigzagoon", "Spinarak", "Abra",
                ],
                &[
                    "Zubat", "Hoothoot", "Rattata", "Caterpie", "Weedle", "Hoppip", "Sunkern",
                    "Spinarak", "Skitty",
                ],
            ),
            BiomeSpawns::new(
                Biome::Forest,
                &[
                    "Caterpie", "Weedle", "Oddish", "Bellsprout", "Treecko", "Shroomish",
                    "Seedot", "Lotad", "Nincada", "Poochyena", "Hoppip", "Sunkern",
                ],
                &[
                    "Hoothoot", "Caterpie", "Weedle", "Oddish", "Bellsprout", "Treecko",
                    "Shroomish", "Seedot", "Lotad", "Poochyena", "Hoppip", "Nincada",
                ],
            ),
            BiomeSpawns::new(
                Biome::Snow,
                &["Swinub", "Snorunt", "Snover", "Spheal", "Cubchoo", "Sneasel", "Vanillite", "Snom"],
                &["Swinub", "Snorunt", "Snover", "Spheal", "Cubchoo", "Sneasel", "Vanillite", "Snom"],
            ),
            BiomeSpawns::new(
                Biome::Desert,
                &[
                    "Sandshrew", "Trapinch", "Cacnea", "Sandile", "Diglett", "Vulpix", "Ekans",
                    "Spinarak", "Poochyena",
                ],
                &[
                    "Sandshrew", "Trapinch", "Cacnea", "Sandile", "Diglett", "Vulpix", "Ekans",
                    "Zubat", "Spinarak",
                ],
            ),
            BiomeSpawns::new(
                Biome::Haunted,
                &["Gastly", "Misdreavus", "Shuppet", "Duskull", "Sableye", "Litwick", "Murkrow", "Yamask"],
                &["Gastly", "Misdreavus", "Shuppet", "Duskull", "Sableye", "Litwick", "Murkrow", "Yamask"],
            ),
            BiomeSpawns::new(
                Biome::RainForest,
                &[
                    "Treecko", "Mudkip", "Torchic", "Lotad", "Seedot", "Shroomish", "Sunkern",
                    "Hoppip", "Caterpie", "Weedle", "Nincada", "Poochyena",
                ],
                &[
                    "Treecko", "Mudkip", "Torchic", "Lotad", "Seedot", "Shroomish", "Sunkern",
                    "Hoppip", "Caterpie", "Weedle", "Nincada", "Poochyena",
                ],
            ),
            BiomeSpawns::new(
                Biome::BigMountains,
                &[
                    "Geodude", "Machop", "Onix", "Rhyhorn", "Nosepass", "Larvitar", "Meditite",
                    "Riolu", "Rockruff", "Swinub",
                ],
                &[
                    "Geodude", "Machop", "Onix", "Rhyhorn", "Nosepass", "Larvitar", "Meditite",
                    "Riolu", "Rockruff", "Swinub",
                ],
            ),
            BiomeSpawns::new(
                Biome::Ruins,
                &[
                    "Zubat", "Geodude", "Kabuto", "Omanyte", "Aerodactyl", "Rattata", "Gastly",
                    "Onix", "Abra", "Cubone",
                ],
                &[
                    "Zubat", "Geodude", "Kabuto", "Omanyte", "Aerodactyl", "Rattata", "Gastly",
                    "Onix", "Abra", "Cubone",
                ],
            ),
            BiomeSpawns::new(
                Biome::CherryGrove,
                &["Cherrim", "Budew", "Roselia", "Floette", "Jigglypuff", "Cleffa", "Wooper", "Litleo"],
                &[
                    "Cherrim", "Roselia", "Floette", "Jigglypuff", "Cleffa", "Delibird", "Abra",
                    "Marill", "Clefairy",
                ],
            ),
            BiomeSpawns::new(
                Biome::Beach,
                &["Krabby", "Corphish", "Wingull", "Staryu", "Corsola", "Shellder", "Goldeen", "Surskit"],
                &["Krabby", "Wingull", "Chinchou", "Staryu", "Corsola", "Shellder", "Goldeen"],
            ),
            BiomeSpawns::new(
                Biome::Ocean,
                &["Magikarp", "Tentacruel", "Horsea", "Seadra", "Staryu", "Starmie", "Chinchou", "Wishiwashi"],
                &["Magikarp", "Tentacruel", "Horsea", "Seadra", "Staryu", "Starmie", "Lanturn", "Pyukumuku"],
            ),
        ];

        let packs = [
            ("rattata", PackProfile::new(0.4, 2, 4, true)),
            ("pidgey", PackProfile::new(0.3, 3, 6, false)),
            ("zubat", PackProfile::new(0.5, 4, 8, true)),
            ("caterpie", PackProfile::new(0.2, 2, 3, false)),
            ("weedle", PackProfile::new(0.2, 2, 3, false)),
            ("sentret", PackProfile::new(0.3, 2, 4, true)),
            ("hoppip", PackProfile::new(0.4, 3, 5, false)),
            ("poochyena", PackProfile::new(0.6, 3, 6, true)),
            ("zigzagoon", PackProfile::new(0.3, 2, 4, false)),
        ];

        Self {
            biomes: biomes.into_iter().map(|b| (b.biome, b)).collect(),
            packs: packs
                .into_iter()
                .map(|(name, profile)| (name.to_string(), profile))
                .collect(),
            default_day: "Rattata".to_string(),
            default_night: "Hoothoot".to_string(),
        }
    }
}
