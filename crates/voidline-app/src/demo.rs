//! A small Sol-system sector for running the HUD without a game client.

use std::collections::BTreeMap;

use voidline_core::config::VoidlineConfig;
use voidline_core::enums::ServiceIcon;
use voidline_core::mission::{CardRewards, Mission, Objective, Rewards};
use voidline_core::target::{HullData, SubSystem, Target};
use voidline_core::types::{CameraPose, Position};
use voidline_missions::capabilities::{MemoryInventory, MemoryLedger, MissionCapabilities};
use voidline_missions::coordinator::MissionCoordinator;
use voidline_targeting::capabilities::{Capabilities, DiscoveryLog, StandardShip};
use voidline_targeting::TargetComputer;

use crate::engine::{HudEngine, LogAudio};
use crate::scene::StaticScene;

pub fn sector_targets() -> Vec<Target> {
    vec![
        Target::celestial("A0_star", "Sol", "star", Position::new(10.0, 0.0, -10.0)),
        Target::celestial("A0_terra", "Terra", "planet", Position::new(0.0, 2.0, -40.0))
            .with_faction("TRA"),
        Target::celestial("A0_luna", "Luna", "moon", Position::new(3.0, 2.0, -41.0)),
        Target::station(
            "A0_ceres_refinery",
            "Ceres Refinery",
            "refinery",
            Position::new(-60.0, 0.0, -90.0),
            HullData::new(4200.0, 5000.0)
                .with_subsystem(SubSystem::new("docking_bay", 1.0).with_display_name("Docking Bay"))
                .with_subsystem(SubSystem::new("reactor", 0.8).with_display_name("Reactor")),
        )
        .with_faction("TRA")
        .with_services([ServiceIcon::Trade, ServiceIcon::Repair, ServiceIcon::Refuel]),
        Target::enemy_ship(
            "enemy_raider_1",
            "Raider",
            "light fighter",
            Position::new(0.0, 0.0, -3.0),
            HullData::new(45.0, 100.0)
                .with_subsystem(SubSystem::new("engines", 0.6).with_bonuses(0.15, 0.25))
                .with_subsystem(SubSystem::new("weapons", 0.2).with_bonuses(0.1, 0.3)),
        )
        .with_faction("PIR"),
        Target::friendly_ship(
            "escort_1",
            "Vigilant",
            "frigate",
            Position::new(1.0, 0.5, 2.0),
            HullData::new(300.0, 300.0),
        )
        .with_faction("TRA"),
        Target::waypoint("wp_belt", "Belt Rendezvous", Position::new(120.0, 0.0, -300.0)),
    ]
}

pub fn sector_missions() -> Vec<Mission> {
    vec![Mission::new("mission_belt_patrol", "Clear the Belt")
        .with_objective(Objective::new("destroy_raider", "Destroy the raider"))
        .with_objective(Objective::new("reach_belt", "Reach the belt rendezvous"))
        .with_rewards(Rewards {
            credits: 250,
            faction_bonuses: BTreeMap::from([("TRA".to_string(), 3), ("PIR".to_string(), -5)]),
            cards: CardRewards {
                count: 2,
                names: Some(vec!["Laser Cannon".into(), "Shield Booster".into()]),
                ..CardRewards::default()
            },
        })]
}

fn card_catalog() -> Vec<(String, String)> {
    [
        ("Laser Cannon", "weapon"),
        ("Shield Booster", "shield"),
        ("Ion Drive", "engine"),
        ("Targeting Suite", "sensor"),
    ]
    .into_iter()
    .map(|(name, card_type)| (name.to_string(), card_type.to_string()))
    .collect()
}

/// Engine for the demo sector: every target placed in a static scene, the
/// inner planets discovered, the mission list preloaded.
pub fn build_engine(config: &VoidlineConfig) -> HudEngine {
    let targets = sector_targets();
    let mut scene = StaticScene::new(CameraPose::default());
    let mut discovery = DiscoveryLog::new();
    for target in &targets {
        if let Some(position) = target.fixed_position() {
            scene.place(target.id.clone(), position);
        }
    }
    discovery.discover("A0_star".into());
    discovery.discover("A0_terra".into());
    discovery.discover("A0_ceres_refinery".into());

    let mut computer = TargetComputer::new(
        config.targeting.clone(),
        Capabilities {
            scene: Box::new(scene),
            discovery: Box::new(discovery),
            ship: Box::new(StandardShip {
                sub_targeting: true,
            }),
        },
    );
    for target in targets {
        computer.registry_mut().add(target);
    }

    let mut missions = MissionCoordinator::new(
        config.missions.clone(),
        MissionCapabilities {
            ledger: Box::new(MemoryLedger::default()),
            inventory: Box::new(MemoryInventory::new(card_catalog())),
        },
    );
    missions.apply_refresh(sector_missions());

    HudEngine::new(computer, missions).with_audio(Box::new(LogAudio::default()))
}
