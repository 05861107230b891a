//! Collaborators the mission coordinator grants rewards through.
//!
//! The ledger, the card inventory and the audio player live outside the
//! HUD core and are handed in at construction.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use voidline_core::enums::CardRarity;

/// A card as stored by the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub card_type: String,
    pub rarity: CardRarity,
    /// Badge for the inventory UI until the player has seen the card.
    #[serde(default)]
    pub newly_awarded: bool,
}

pub trait CreditLedger {
    /// Credit the player. Returns false when the ledger rejects the entry.
    fn add_credits(&mut self, amount: u64, memo: &str) -> bool;
    fn can_afford(&self, amount: u64) -> bool;
}

pub trait CardInventory {
    /// Card type for a known card name.
    fn card_type_of(&self, name: &str) -> Option<String>;
    fn generate_specific_card(&mut self, card_type: &str, rarity: CardRarity) -> Card;
    /// A card drawn from the inventory's own default distribution.
    fn generate_random_card(&mut self) -> Card;
    fn add_card(&mut self, card: Card);
}

pub trait AudioPlayer {
    /// Play a sound. Errors are the player's concern and never surface here.
    fn play(&mut self, path: &str, volume: f32);
}

/// What the coordinator grants rewards through. Audio is played by the HUD
/// engine from the cues the coordinator emits.
pub struct MissionCapabilities {
    pub ledger: Box<dyn CreditLedger>,
    pub inventory: Box<dyn CardInventory>,
}

// Shared handles, so the owner of a store can keep reading it after handing
// it to the coordinator.

impl<T: CreditLedger> CreditLedger for Rc<RefCell<T>> {
    fn add_credits(&mut self, amount: u64, memo: &str) -> bool {
        self.borrow_mut().add_credits(amount, memo)
    }

    fn can_afford(&self, amount: u64) -> bool {
        self.borrow().can_afford(amount)
    }
}

impl<T: CardInventory> CardInventory for Rc<RefCell<T>> {
    fn card_type_of(&self, name: &str) -> Option<String> {
        self.borrow().card_type_of(name)
    }

    fn generate_specific_card(&mut self, card_type: &str, rarity: CardRarity) -> Card {
        self.borrow_mut().generate_specific_card(card_type, rarity)
    }

    fn generate_random_card(&mut self) -> Card {
        self.borrow_mut().generate_random_card()
    }

    fn add_card(&mut self, card: Card) {
        self.borrow_mut().add_card(card)
    }
}

// ---- In-memory collaborators ----

/// Credit balance with a journal of memos.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    pub balance: u64,
    pub journal: Vec<(u64, String)>,
}

impl CreditLedger for MemoryLedger {
    fn add_credits(&mut self, amount: u64, memo: &str) -> bool {
        self.balance = self.balance.saturating_add(amount);
        self.journal.push((amount, memo.to_string()));
        debug!(amount, memo, balance = self.balance, "credits added");
        true
    }

    fn can_afford(&self, amount: u64) -> bool {
        self.balance >= amount
    }
}

/// Card collection with a fixed name → type catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryInventory {
    pub catalog: HashMap<String, String>,
    pub cards: Vec<Card>,
    /// Types used by `generate_random_card`, in rotation.
    pub random_pool: Vec<String>,
    next_random: usize,
}

impl MemoryInventory {
    pub fn new(catalog: impl IntoIterator<Item = (String, String)>) -> Self {
        let catalog: HashMap<String, String> = catalog.into_iter().collect();
        let mut random_pool: Vec<String> = catalog.values().cloned().collect();
        random_pool.sort();
        random_pool.dedup();
        Self {
            catalog,
            cards: Vec::new(),
            random_pool,
            next_random: 0,
        }
    }

    pub fn newly_awarded(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.newly_awarded)
    }
}

impl CardInventory for MemoryInventory {
    fn card_type_of(&self, name: &str) -> Option<String> {
        self.catalog.get(name).cloned()
    }

    fn generate_specific_card(&mut self, card_type: &str, rarity: CardRarity) -> Card {
        let name = self
            .catalog
            .iter()
            .filter(|(_, t)| t.as_str() == card_type)
            .map(|(n, _)| n.clone())
            .min()
            .unwrap_or_else(|| card_type.to_string());
        Card {
            name,
            card_type: card_type.to_string(),
            rarity,
            newly_awarded: false,
        }
    }

    fn generate_random_card(&mut self) -> Card {
        let card_type = match self.random_pool.len() {
            0 => "salvage".to_string(),
            len => {
                let t = self.random_pool[self.next_random % len].clone();
                self.next_random += 1;
                t
            }
        };
        self.generate_specific_card(&card_type, CardRarity::Common)
    }

    fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }
}
