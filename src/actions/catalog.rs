//! Behavior catalog identifiers

use serde::{Deserialize, Serialize};

use crate::entity::personality::Traits;

/// Unique behavior identifier, also the cooldown key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorId {
    Idle,
    Wander,
    Flee,
    ApproachPlayer,
    Territorial,
    DefendTerritory,
    Patrol,
    Social,
    Investigate,
    PackLeader,
    FollowPack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorCategory {
    Idle,
    Roaming,
    Player,
    Territory,
    Group,
}

impl BehaviorId {
    /// Arbitration priority, highest wins
    pub fn priority(self) -> u8 {
        match self {
            BehaviorId::DefendTerritory => 9,
            BehaviorId::Flee => 8,
            BehaviorId::Territorial => 7,
            BehaviorId::ApproachPlayer | BehaviorId::FollowPack => 6,
            BehaviorId::Investigate | BehaviorId::PackLeader => 5,
            BehaviorId::Patrol => 4,
            BehaviorId::Wander => 3,
            BehaviorId::Social => 2,
            BehaviorId::Idle => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BehaviorId::Idle => "idle",
            BehaviorId::Wander => "wander",
            BehaviorId::Flee => "flee",
            BehaviorId::ApproachPlayer => "approach_player",
            BehaviorId::Territorial => "territorial",
            BehaviorId::DefendTerritory => "defend_territory",
            BehaviorId::Patrol => "patrol",
            BehaviorId::Social => "social",
            BehaviorId::Investigate => "investigate",
            BehaviorId::PackLeader => "pack_leader",
            BehaviorId::FollowPack => "follow_pack",
        }
    }

    pub fn category(self) -> BehaviorCategory {
        match self {
            BehaviorId::Idle => BehaviorCategory::Idle,
            BehaviorId::Wander | BehaviorId::Patrol => BehaviorCategory::Roaming,
            BehaviorId::Flee | BehaviorId::ApproachPlayer | BehaviorId::Investigate => {
                BehaviorCategory::Player
            }
            BehaviorId::Territorial | BehaviorId::DefendTerritory => BehaviorCategory::Territory,
            BehaviorId::Social | BehaviorId::PackLeader | BehaviorId::FollowPack => {
                BehaviorCategory::Group
            }
        }
    }

    /// Behaviors a creature with `traits` considers, highest priority first.
    ///
    /// Registration order breaks priority ties, so ApproachPlayer is tried
    /// before FollowPack and Investigate before PackLeader.
    pub fn registered_for(traits: Traits) -> Vec<BehaviorId> {
        let mut ids = vec![BehaviorId::Idle, BehaviorId::Wander, BehaviorId::Flee];

        if traits.contains(Traits::AGGRESSIVE) {
            ids.push(BehaviorId::ApproachPlayer);
            ids.push(BehaviorId::Territorial);
        }
        if traits.contains(Traits::CURIOUS) {
            if !ids.contains(&BehaviorId::ApproachPlayer) {
                ids.push(BehaviorId::ApproachPlayer);
            }
            ids.push(BehaviorId::Investigate);
        }
        if traits.contains(Traits::TERRITORIAL) {
            if !ids.contains(&BehaviorId::Territorial) {
                ids.push(BehaviorId::Territorial);
            }
            ids.push(BehaviorId::Patrol);
            if traits.contains(Traits::AGGRESSIVE) {
                ids.push(BehaviorId::DefendTerritory);
            }
        }
        if !traits.contains(Traits::SOLITARY) {
            ids.push(BehaviorId::Social);
        }
        if traits.contains(Traits::PACK_LEADER) {
            ids.push(BehaviorId::PackLeader);
        }
        if traits.contains(Traits::FOLLOWER) {
            ids.push(BehaviorId::FollowPack);
        }

        // Stable: equal priorities keep registration order
        ids.sort_by(|a, b| b.priority().cmp(&a.priority()));
        ids
    }
}

impl std::fmt::Display for BehaviorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everyone_gets_core_behaviors() {
        let ids = BehaviorId::registered_for(Traits::PASSIVE);
        assert!(ids.contains(&BehaviorId::Idle));
        assert!(ids.contains(&BehaviorId::Wander));
        assert!(ids.contains(&BehaviorId::Flee));
        assert!(ids.contains(&BehaviorId::Social));
        assert!(!ids.contains(&BehaviorId::ApproachPlayer));
        assert_eq!(ids.last(), Some(&BehaviorId::Idle));
    }

    #[test]
    fn test_registration_is_priority_ordered() {
        let all = Traits::AGGRESSIVE
            | Traits::CURIOUS
            | Traits::TERRITORIAL
            | Traits::PACK_LEADER
            | Traits::FOLLOWER;
        let ids = BehaviorId::registered_for(all);
        assert!(ids.windows(2).all(|w| w[0].priority() >= w[1].priority()));
        assert_eq!(ids[0], BehaviorId::DefendTerritory);
        // no duplicates even when two traits grant the same behavior
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_solitary_skips_social() {
        let ids = BehaviorId::registered_for(Traits::LAZY | Traits::SOLITARY);
        assert!(!ids.contains(&BehaviorId::Social));
    }

    #[test]
    fn test_tie_keeps_registration_order() {
        let ids = BehaviorId::registered_for(Traits::CURIOUS | Traits::FOLLOWER);
        let approach = ids.iter().position(|&b| b == BehaviorId::ApproachPlayer);
        let follow = ids.iter().position(|&b| b == BehaviorId::FollowPack);
        assert!(approach < follow);
    }
}
