//! Reward grants. Each part of a reward (credits, reputation, cards) is
//! granted at most once per mission id; calling `grant` again only retries
//! the parts that have not gone through yet.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use voidline_core::constants::CREDIT_MEMO_PREFIX;
use voidline_core::enums::CardRarity;
use voidline_core::mission::{CardRewards, FactionStandings, Mission, MissionId};
use voidline_core::state::{ReputationLine, RewardsPanel};

use crate::capabilities::{Card, CardInventory, MissionCapabilities};

/// Result of one grant pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantOutcome {
    pub panel: RewardsPanel,
    /// Credits were rejected by the ledger and still need granting.
    pub credits_pending: bool,
}

#[derive(Debug, Clone, Default)]
struct GrantRecord {
    credits_granted: bool,
    reputation: Option<Vec<ReputationLine>>,
    cards: Option<Vec<String>>,
}

pub struct RewardGranter {
    rng: ChaCha8Rng,
    records: HashMap<MissionId, GrantRecord>,
}

impl RewardGranter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            records: HashMap::new(),
        }
    }

    pub fn grant(
        &mut self,
        mission: &Mission,
        caps: &mut MissionCapabilities,
        standings: &mut FactionStandings,
    ) -> GrantOutcome {
        let rewards = &mission.rewards;
        let record = self.records.entry(mission.id.clone()).or_default();

        if !record.credits_granted {
            let memo = format!("{CREDIT_MEMO_PREFIX}{}", mission.id);
            if rewards.credits == 0 || caps.ledger.add_credits(rewards.credits, &memo) {
                record.credits_granted = true;
                if rewards.credits > 0 {
                    info!(mission = %mission.id, credits = rewards.credits, "credits granted");
                }
            } else {
                warn!(mission = %mission.id, credits = rewards.credits, "credit ledger rejected reward");
            }
        }

        if record.reputation.is_none() {
            let lines: Vec<ReputationLine> = rewards
                .faction_bonuses
                .iter()
                .map(|(faction, &delta)| ReputationLine {
                    faction: faction.clone(),
                    delta,
                    new_value: standings.adjust(faction, delta),
                })
                .collect();
            if !lines.is_empty() {
                info!(mission = %mission.id, factions = lines.len(), "reputation adjusted");
            }
            record.reputation = Some(lines);
        }

        if record.cards.is_none() {
            let cards = pick_cards(&mut self.rng, &rewards.cards, caps.inventory.as_mut());
            let names: Vec<String> = cards.iter().map(|c| c.name.clone()).collect();
            for mut card in cards {
                card.newly_awarded = true;
                caps.inventory.add_card(card);
            }
            if !names.is_empty() {
                info!(mission = %mission.id, cards = ?names, "cards awarded");
            }
            record.cards = Some(names);
        }

        GrantOutcome {
            panel: RewardsPanel {
                credits: rewards.credits,
                reputation: record.reputation.clone().unwrap_or_default(),
                cards: record.cards.clone().unwrap_or_default(),
            },
            credits_pending: !record.credits_granted,
        }
    }

    /// True once every part of the mission's reward went through.
    pub fn is_granted(&self, id: &MissionId) -> bool {
        self.records.get(id).is_some_and(|r| {
            r.credits_granted && r.reputation.is_some() && r.cards.is_some()
        })
    }
}

/// Cards for a reward: named cards first, then uniform picks over the
/// preferred types, else the inventory's own random draw.
fn pick_cards(
    rng: &mut ChaCha8Rng,
    rewards: &CardRewards,
    inventory: &mut dyn CardInventory,
) -> Vec<Card> {
    if let Some(names) = rewards.names.as_ref().filter(|n| !n.is_empty()) {
        return names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let card_type = rewards
                    .types
                    .as_ref()
                    .and_then(|types| types.get(i).cloned())
                    .or_else(|| inventory.card_type_of(name))
                    .unwrap_or_else(|| name.clone());
                let mut card = inventory.generate_specific_card(&card_type, roll_rarity(rng));
                card.name = name.clone();
                card
            })
            .collect();
    }

    if let Some(preferred) = rewards.preferred_types.as_ref().filter(|p| !p.is_empty()) {
        let mut cards = Vec::with_capacity(rewards.count as usize);
        for _ in 0..rewards.count {
            if let Some(card_type) = preferred.choose(rng).cloned() {
                let rarity = roll_rarity(rng);
                cards.push(inventory.generate_specific_card(&card_type, rarity));
            }
        }
        return cards;
    }

    (0..rewards.count)
        .map(|_| inventory.generate_random_card())
        .collect()
}

fn roll_rarity(rng: &mut ChaCha8Rng) -> CardRarity {
    match rng.gen_range(0..100) {
        0..=2 => CardRarity::Legendary,
        3..=14 => CardRarity::Epic,
        15..=39 => CardRarity::Rare,
        _ => CardRarity::Common,
    }
}
