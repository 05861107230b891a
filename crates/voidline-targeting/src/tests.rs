//! Tests for diplomacy, discovery, the registry, sub-targets, HUD projection
//! and the target computer state machine.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use proptest::prelude::*;

use voidline_core::config::TargetingConfig;
use voidline_core::constants::*;
use voidline_core::enums::*;
use voidline_core::events::{AudioCue, ComputerEvent};
use voidline_core::mission::FactionStandings;
use voidline_core::target::{HullData, SubSystem, Target, TargetId};
use voidline_core::types::{CameraPose, Position, SimTime};

use crate::capabilities::{Capabilities, DiscoveryLog, DiscoveryService, SceneGraph, ShipSystems};
use crate::computer::TargetComputer;
use crate::diplomacy::{self, FactionTable};
use crate::discovery::{self, DiscoveryTracker};
use crate::hud::{self, format_distance, hull_percent, Projection, ShipCaps};
use crate::registry::TargetRegistry;
use crate::subtargets::{self, normalize_health, SubTargetCursor};

// ---- Fakes ----

#[derive(Default)]
struct SceneState {
    camera: CameraPose,
    positions: HashMap<TargetId, Position>,
    reticle: Option<String>,
    rebuilt: Vec<TargetId>,
}

#[derive(Clone, Default)]
struct FakeScene(Rc<RefCell<SceneState>>);

impl FakeScene {
    fn move_camera(&self, position: Position) {
        self.0.borrow_mut().camera = CameraPose::at(position);
    }

    fn place(&self, id: &str, position: Position) {
        self.0.borrow_mut().positions.insert(id.into(), position);
    }

    fn remove_node(&self, id: &str) {
        self.0.borrow_mut().positions.remove(&TargetId::from(id));
    }
}

impl SceneGraph for FakeScene {
    fn camera_pose(&self) -> CameraPose {
        self.0.borrow().camera
    }

    fn target_position(&self, id: &TargetId) -> Option<Position> {
        self.0.borrow().positions.get(id).copied()
    }

    fn set_reticle_color(&mut self, color: &str) {
        self.0.borrow_mut().reticle = Some(color.to_string());
    }

    fn rebuild_wireframe(&mut self, id: &TargetId) {
        self.0.borrow_mut().rebuilt.push(id.clone());
    }
}

#[derive(Clone, Default)]
struct FakeDiscovery(Rc<RefCell<HashSet<TargetId>>>);

impl FakeDiscovery {
    fn discover(&self, id: &str) {
        self.0.borrow_mut().insert(id.into());
    }

    fn forget(&self, id: &str) {
        self.0.borrow_mut().remove(&TargetId::from(id));
    }
}

impl DiscoveryService for FakeDiscovery {
    fn is_discovered(&self, id: &TargetId) -> bool {
        self.0.borrow().contains(id)
    }
}

struct FakeShip {
    sub_targeting: bool,
}

impl ShipSystems for FakeShip {
    fn has_sub_targeting(&self) -> bool {
        self.sub_targeting
    }
}

struct Rig {
    computer: TargetComputer,
    scene: FakeScene,
    discovery: FakeDiscovery,
    time: SimTime,
}

impl Rig {
    fn new(config: TargetingConfig, targets: Vec<Target>) -> Self {
        let scene = FakeScene::default();
        let discovery = FakeDiscovery::default();
        let caps = Capabilities {
            scene: Box::new(scene.clone()),
            discovery: Box::new(discovery.clone()),
            ship: Box::new(FakeShip {
                sub_targeting: true,
            }),
        };
        let mut computer = TargetComputer::new(config, caps);
        for target in targets {
            computer.registry_mut().add(target);
        }
        Self {
            computer,
            scene,
            discovery,
            time: SimTime::default(),
        }
    }

    /// Enabled computer with no power-up delay.
    fn enabled(targets: Vec<Target>) -> Self {
        let mut rig = Self::new(instant_config(), targets);
        rig.computer.enable();
        rig
    }

    fn tick(&mut self) -> Option<std::sync::Arc<voidline_core::state::HudModel>> {
        self.time.advance();
        self.computer.tick_frame(self.time)
    }
}

fn instant_config() -> TargetingConfig {
    TargetingConfig {
        power_up_ticks: 0,
        ..TargetingConfig::default()
    }
}

fn star() -> Target {
    Target::celestial("A0_star", "Sol", "star", Position::new(10.0, 0.0, -10.0)).with_discovered(true)
}

fn planet() -> Target {
    Target::celestial("A0_terra", "Terra", "planet", Position::new(0.0, 0.0, -5.0))
}

fn raider(position: Position) -> Target {
    Target::enemy_ship(
        "enemy_1",
        "Raider",
        "light fighter",
        position,
        HullData::new(45.0, 100.0)
            .with_subsystem(SubSystem::new("engines", 0.6).with_bonuses(0.1, 0.25))
            .with_subsystem(SubSystem::new("weapons", 0.2).with_bonuses(0.05, 0.3)),
    )
}

fn project_simple(target: &Target, discovery: DiscoveryStatus) -> voidline_core::state::HudModel {
    let entries = target
        .hull()
        .map(|h| subtargets::enumerate(h, true))
        .unwrap_or_default();
    hud::project(&Projection {
        target,
        distance_km: 12.0,
        out_of_range: false,
        sub_targets: &entries,
        sub_cursor: if entries.is_empty() { None } else { Some(0) },
        discovery,
        ship: ShipCaps {
            has_sub_targeting: true,
            accuracy_bonus: 0.1,
            damage_bonus: 0.2,
        },
        factions: None,
    })
}

// ---- Diplomacy ----

#[test]
fn test_diplomacy_waypoint_first() {
    let wp = Target::waypoint("wp", "Nav", Position::default()).with_faction("hostile");
    let (class, color) = diplomacy::resolve(&wp, DiscoveryStatus::Undiscovered, None);
    assert_eq!(class, Diplomacy::Waypoint);
    assert_eq!(color, "#ff00ff");
}

#[test]
fn test_diplomacy_undiscovered_non_ship_is_unknown() {
    let p = planet().with_faction("enemy");
    let (class, color) = diplomacy::resolve(&p, DiscoveryStatus::Undiscovered, None);
    assert_eq!(class, Diplomacy::Unknown);
    assert_eq!(color, "#44ffff");
}

#[test]
fn test_diplomacy_star_is_neutral_even_with_faction() {
    let s = star().with_faction("hostile");
    let (class, color) = diplomacy::resolve(&s, DiscoveryStatus::Discovered, None);
    assert_eq!(class, Diplomacy::Neutral);
    assert_eq!(color, "#ffff00");
}

#[test]
fn test_diplomacy_faction_words_and_table() {
    let station = Target::station(
        "st",
        "Depot",
        "refinery",
        Position::default(),
        HullData::new(10.0, 10.0),
    );
    let hostile = station.clone().with_faction("Hostile");
    assert_eq!(
        diplomacy::resolve(&hostile, DiscoveryStatus::Discovered, None).0,
        Diplomacy::Enemy
    );
    let allied = station.clone().with_faction("allied");
    assert_eq!(
        diplomacy::resolve(&allied, DiscoveryStatus::Discovered, None).0,
        Diplomacy::Friendly
    );

    let tra = station.clone().with_faction("TRA");
    assert_eq!(
        diplomacy::resolve(&tra, DiscoveryStatus::Discovered, None).0,
        Diplomacy::Neutral
    );
    let mut table = FactionTable::new();
    table.set("TRA", Diplomacy::Friendly);
    assert_eq!(
        diplomacy::resolve(&tra, DiscoveryStatus::Discovered, Some(&table)),
        (Diplomacy::Friendly, "#00ff41")
    );
}

#[test]
fn test_diplomacy_ship_variant_implies_stance() {
    let enemy = raider(Position::default());
    assert_eq!(
        diplomacy::resolve(&enemy, DiscoveryStatus::AlwaysVisible, None),
        (Diplomacy::Enemy, "#ff3333")
    );
    let friend = Target::friendly_ship(
        "f1",
        "Escort",
        "frigate",
        Position::default(),
        HullData::new(1.0, 1.0),
    );
    assert_eq!(
        diplomacy::resolve(&friend, DiscoveryStatus::AlwaysVisible, None).0,
        Diplomacy::Friendly
    );
}

#[test]
fn test_diplomacy_ship_variant_with_named_faction() {
    let pirate = raider(Position::default()).with_faction("PIR");
    assert_eq!(
        diplomacy::resolve(&pirate, DiscoveryStatus::AlwaysVisible, None),
        (Diplomacy::Enemy, "#ff3333")
    );

    // Middling standing maps to a neutral table entry; the variant still wins.
    let mut standings = FactionStandings::new();
    standings.adjust("PIR", -5);
    let table = FactionTable::from_standings(&standings);
    assert_eq!(table.stance("PIR"), Some(Diplomacy::Neutral));
    assert_eq!(
        diplomacy::resolve(&pirate, DiscoveryStatus::AlwaysVisible, Some(&table)).0,
        Diplomacy::Enemy
    );
    let empty = FactionTable::from_standings(&FactionStandings::new());
    assert_eq!(
        diplomacy::resolve(&pirate, DiscoveryStatus::AlwaysVisible, Some(&empty)).0,
        Diplomacy::Enemy
    );

    // A decisive table stance still overrides the variant.
    standings.adjust("PIR", 40);
    let table = FactionTable::from_standings(&standings);
    assert_eq!(
        diplomacy::resolve(&pirate, DiscoveryStatus::AlwaysVisible, Some(&table)).0,
        Diplomacy::Friendly
    );

    let escort = Target::friendly_ship(
        "f2",
        "Vigilant",
        "frigate",
        Position::default(),
        HullData::new(1.0, 1.0),
    )
    .with_faction("TRA");
    assert_eq!(
        diplomacy::resolve(&escort, DiscoveryStatus::AlwaysVisible, Some(&empty)),
        (Diplomacy::Friendly, "#00ff41")
    );
}

#[test]
fn test_faction_table_from_standings() {
    let mut standings = FactionStandings::new();
    standings.adjust("PIR", -60);
    standings.adjust("TRA", 30);
    standings.adjust("IND", 5);
    let table = FactionTable::from_standings(&standings);
    assert_eq!(table.stance("PIR"), Some(Diplomacy::Enemy));
    assert_eq!(table.stance("TRA"), Some(Diplomacy::Friendly));
    assert_eq!(table.stance("IND"), Some(Diplomacy::Neutral));
    assert_eq!(table.stance("XYZ"), None);
}

// ---- Discovery ----

#[test]
fn test_discovery_gate_rules() {
    let mut log = DiscoveryLog::new();
    let ship = raider(Position::default());
    assert_eq!(
        discovery::evaluate(&ship, false, &log),
        DiscoveryStatus::AlwaysVisible
    );
    let wp = Target::waypoint("wp", "Nav", Position::default());
    assert_eq!(
        discovery::evaluate(&wp, true, &log),
        DiscoveryStatus::AlwaysVisible
    );

    let p = planet();
    assert_eq!(
        discovery::evaluate(&p, true, &log),
        DiscoveryStatus::Undiscovered
    );
    assert!(log.discover(p.id.clone()));
    assert_eq!(
        discovery::evaluate(&p, true, &log),
        DiscoveryStatus::Discovered
    );
    assert_eq!(
        discovery::evaluate(&p, false, &log),
        DiscoveryStatus::Undiscovered,
        "No position forces undiscovered"
    );

    let flagged = planet().with_discovered(false);
    assert_eq!(
        discovery::evaluate(&flagged, true, &log),
        DiscoveryStatus::Undiscovered,
        "Explicit flag overrides the service"
    );
}

#[test]
fn test_discovery_tracker_only_reports_changes() {
    let mut tracker = DiscoveryTracker::new();
    let id = TargetId::from("p");
    assert!(!tracker.observe(&id, DiscoveryStatus::Undiscovered));
    assert!(!tracker.observe(&id, DiscoveryStatus::Undiscovered));
    assert!(tracker.observe(&id, DiscoveryStatus::Discovered));
    assert!(!tracker.observe(&id, DiscoveryStatus::Discovered));
    assert!(tracker.observe(&id, DiscoveryStatus::Undiscovered));
    assert_eq!(tracker.last(&id), Some(DiscoveryStatus::Undiscovered));
}

// ---- Registry ----

#[test]
fn test_registry_lookup_and_order() {
    let mut registry = TargetRegistry::new();
    registry.add(star());
    registry.add(planet());
    registry.add(Target::celestial("dup", "Sol", "moon", Position::default()));

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.get_by_id(&"A0_terra".into()).map(|t| t.display_name.as_str()), Some("Terra"));
    assert!(registry.get_by_id(&"missing".into()).is_none());
    // Ambiguous name resolves to the first inserted.
    assert_eq!(registry.get_by_name("Sol").map(|t| t.id.as_str()), Some("A0_star"));
    assert!(registry.get_by_name("sol").is_none(), "Name match is case-sensitive");

    let ids: Vec<&str> = registry.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["A0_star", "A0_terra", "dup"]);

    // Re-adding keeps the slot.
    registry.add(star().with_faction("TRA"));
    let ids: Vec<&str> = registry.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["A0_star", "A0_terra", "dup"]);
}

#[test]
fn test_registry_cycle_wraps() {
    let mut registry = TargetRegistry::new();
    assert!(registry.cycle(Direction::Next).is_none());
    assert!(registry.cursor_id().is_none());

    registry.add(star());
    registry.add(planet());
    assert_eq!(registry.cycle(Direction::Next).map(|t| t.id.as_str()), Some("A0_star"));
    assert_eq!(registry.cycle(Direction::Next).map(|t| t.id.as_str()), Some("A0_terra"));
    assert_eq!(registry.cycle(Direction::Next).map(|t| t.id.as_str()), Some("A0_star"));
    assert_eq!(registry.cycle(Direction::Previous).map(|t| t.id.as_str()), Some("A0_terra"));
}

#[test]
fn test_registry_remove_adjusts_cursor() {
    let mut registry = TargetRegistry::new();
    registry.add(Target::celestial("a", "A", "planet", Position::default()));
    registry.add(Target::celestial("b", "B", "planet", Position::default()));
    registry.add(Target::celestial("c", "C", "planet", Position::default()));
    registry.set_cursor(&"b".into());
    assert!(registry.remove(&"b".into()).is_some());
    assert_eq!(registry.cycle(Direction::Next).map(|t| t.id.as_str()), Some("c"));
    assert!(registry.remove(&"zzz".into()).is_none());
    registry.clear();
    assert!(registry.is_empty());
}

// ---- Sub-targets ----

#[test]
fn test_normalize_health_scales() {
    assert_eq!(normalize_health(0.6), 0.6);
    assert_eq!(normalize_health(60.0), 0.6);
    assert_eq!(normalize_health(1.0), 1.0);
    assert_eq!(normalize_health(-3.0), 0.0);
    assert_eq!(normalize_health(250.0), 1.0);
    assert_eq!(normalize_health(f64::NAN), 0.0);
}

#[test]
fn test_enumerate_orders_by_priority_then_insertion() {
    let hull = HullData::new(100.0, 100.0)
        .with_subsystem(SubSystem::new("shields", 80.0).with_priority(2))
        .with_subsystem(SubSystem::new("weapons", 0.5).with_priority(1))
        .with_subsystem(SubSystem::new("engines", 0.9).with_priority(1))
        .with_subsystem(SubSystem::new("sensors", 0.0).with_priority(0));
    let names: Vec<String> = subtargets::enumerate(&hull, true)
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["sensors", "weapons", "engines", "shields"]);

    let entries = subtargets::enumerate(&hull, true);
    assert!(entries[0].destroyed);
    assert_eq!(entries[3].health_percent(), 80, "Percent-scale input is normalized");

    let names: Vec<String> = subtargets::enumerate(&hull, false)
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["weapons", "engines", "shields"], "Destroyed dropped by policy");
}

#[test]
fn test_sub_target_cursor() {
    let mut cursor = SubTargetCursor::default();
    cursor.reset(3, true);
    assert_eq!(cursor.index(), Some(0));
    assert_eq!(cursor.cycle(Direction::Previous, 3), Some(2));
    assert_eq!(cursor.cycle(Direction::Next, 3), Some(0));
    cursor.sync(0);
    assert_eq!(cursor.index(), None);

    cursor.reset(3, false);
    assert_eq!(cursor.index(), None);
    assert_eq!(cursor.cycle(Direction::Previous, 3), Some(2));
    cursor.sync(2);
    assert_eq!(cursor.index(), Some(1));
    cursor.reset(0, true);
    assert_eq!(cursor.index(), None);
}

// ---- HUD projection ----

#[test]
fn test_format_distance() {
    assert_eq!(format_distance(0.0), "0 m");
    assert_eq!(format_distance(0.5), "500 m");
    assert_eq!(format_distance(0.0424), "42 m");
    assert_eq!(format_distance(0.9996), "1.0 km");
    assert_eq!(format_distance(1.0), "1.0 km");
    assert_eq!(format_distance(14.142), "14.1 km");
    assert_eq!(format_distance(100.0), "100.0 km");
    assert_eq!(format_distance(2.25), "2.3 km");
}

#[test]
fn test_hull_percent_rounding() {
    assert_eq!(hull_percent(0.0, 100.0), Some(0));
    assert_eq!(hull_percent(0.1, 100.0), Some(1));
    assert_eq!(hull_percent(0.001, 1000.0), Some(1));
    assert_eq!(hull_percent(45.0, 100.0), Some(45));
    assert_eq!(hull_percent(99.6, 100.0), Some(100));
    assert_eq!(hull_percent(150.0, 100.0), Some(100));
    assert_eq!(hull_percent(-5.0, 100.0), Some(0));
    assert_eq!(hull_percent(10.0, 0.0), None);
}

#[test]
fn test_panel_colors_by_diplomacy() {
    assert_eq!(hud::panel_colors(Diplomacy::Enemy), ("#ffffff", "#ff3333"));
    assert_eq!(hud::panel_colors(Diplomacy::Friendly), ("#000000", "#00ff41"));
    assert_eq!(hud::panel_colors(Diplomacy::Neutral), ("#000000", "#ffff00"));
    assert_eq!(hud::panel_colors(Diplomacy::Unknown), ("#44ffff", "#000000"));
    assert_eq!(hud::panel_colors(Diplomacy::Waypoint), ("#ff00ff", "#000000"));
}

#[test]
fn test_projection_hides_undiscovered_station() {
    let station = Target::station(
        "st",
        "Ceres Refinery",
        "refinery",
        Position::default(),
        HullData::new(500.0, 1000.0).with_subsystem(SubSystem::new("docking", 1.0)),
    )
    .with_services([ServiceIcon::Repair, ServiceIcon::Trade]);

    let hidden = project_simple(&station, DiscoveryStatus::Undiscovered);
    assert_eq!(hidden.name_line, "Unknown");
    assert_eq!(hidden.type_line, "Unknown");
    assert!(hidden.sub_target_section.is_none());
    assert!(hidden.hull_section.is_none());
    assert!(hidden.status_icons.is_empty());

    let shown = project_simple(&station, DiscoveryStatus::Discovered);
    assert_eq!(shown.name_line, "Ceres Refinery");
    assert_eq!(shown.type_line, "Refinery");
    assert_eq!(shown.hull_section.as_ref().map(|h| h.percent), Some(50));
    assert_eq!(shown.status_icons, vec![ServiceIcon::Trade, ServiceIcon::Repair]);
    assert!(shown.sub_target_section.is_some());
}

#[test]
fn test_projection_summary_line_without_selection() {
    let ship = raider(Position::default());
    let entries = subtargets::enumerate(ship.hull().unwrap(), true);
    let model = hud::project(&Projection {
        target: &ship,
        distance_km: 3.0,
        out_of_range: false,
        sub_targets: &entries,
        sub_cursor: None,
        discovery: DiscoveryStatus::AlwaysVisible,
        ship: ShipCaps {
            has_sub_targeting: true,
            ..ShipCaps::default()
        },
        factions: None,
    });
    let section = model.sub_target_section.expect("section present");
    assert!(section.selected.is_none());
    assert_eq!(section.targetable_count, 2);
    assert_eq!(
        section.summary_line.as_deref(),
        Some("2 targetable systems detected")
    );
    assert_eq!(model.type_line, "Light Fighter");
}

#[test]
fn test_projection_without_sub_targeting_hardware() {
    let ship = raider(Position::default());
    let entries = subtargets::enumerate(ship.hull().unwrap(), true);
    let model = hud::project(&Projection {
        target: &ship,
        distance_km: 3.0,
        out_of_range: false,
        sub_targets: &entries,
        sub_cursor: Some(0),
        discovery: DiscoveryStatus::AlwaysVisible,
        ship: ShipCaps::default(),
        factions: None,
    });
    assert!(model.sub_target_section.is_none());
    assert_eq!(model.hull_section.map(|h| h.percent), Some(45));
}

// ---- Target computer scenarios ----

#[test]
fn test_star_selection() {
    let mut rig = Rig::enabled(vec![star()]);
    assert!(rig.computer.select_by_id(&"A0_star".into()));
    assert_eq!(rig.computer.state(), ComputerState::Locked);

    let model = rig.tick().expect("model published");
    assert_eq!(model.name_line, "Sol");
    assert!(model.type_line.to_lowercase().contains("star"));
    assert_eq!(model.border_color, "#ffff00");
    assert_eq!(model.reticle_color, model.border_color);
    // Camera at origin, star at (10, 0, -10): sqrt(200) km.
    assert_eq!(model.distance_line, "14.1 km");
    assert_eq!(rig.scene.0.borrow().reticle.as_deref(), Some("#ffff00"));
}

#[test]
fn test_undiscovered_planet() {
    let mut rig = Rig::enabled(vec![planet().with_faction("TRA")]);
    assert!(rig.computer.select_by_name("Terra"));
    let model = rig.tick().expect("model published");
    assert_eq!(model.name_line, "Unknown");
    assert_eq!(model.type_line, "Unknown");
    assert_eq!(model.border_color, "#44ffff");
    assert!(model.sub_target_section.is_none());
}

#[test]
fn test_enemy_ship_with_sub_targets() {
    let mut rig = Rig::enabled(vec![raider(Position::new(0.0, 0.0, -3.0))]);
    assert!(rig.computer.select_by_id(&"enemy_1".into()));

    let model = rig.tick().expect("model published");
    assert_eq!(model.hull_section.as_ref().map(|h| h.percent), Some(45));
    assert_eq!(model.border_color, "#ff3333");
    assert_eq!(model.text_color, "#ffffff");
    let selected = model
        .sub_target_section
        .as_ref()
        .and_then(|s| s.selected.clone())
        .expect("auto-selected sub-target");
    assert_eq!(selected.system_display_name, "engines");
    assert_eq!(selected.health_percent, 60);
    assert_eq!(selected.accuracy_pct, 10);
    assert_eq!(selected.damage_pct, 25);

    assert!(rig.computer.cycle_sub_target(Direction::Next));
    let model = rig.tick().expect("model published");
    let selected = model
        .sub_target_section
        .as_ref()
        .and_then(|s| s.selected.clone())
        .expect("sub-target selected");
    assert_eq!(selected.system_display_name, "weapons");
    assert_eq!(selected.health_percent, 20);
    assert_eq!(
        rig.computer.current_sub_target().map(|e| e.name),
        Some("weapons".to_string())
    );

    // Wraps back to the first system.
    assert!(rig.computer.cycle_sub_target(Direction::Next));
    assert_eq!(
        rig.computer.current_sub_target().map(|e| e.name),
        Some("engines".to_string())
    );
}

#[test]
fn test_out_of_range_then_reacquire() {
    let mut rig = Rig::enabled(vec![raider(Position::new(0.0, 0.0, -500.0))]);
    assert!(rig.computer.select_by_id(&"enemy_1".into()));

    let model = rig.tick().expect("model published");
    assert_eq!(model.distance_line, "Out of Range");
    assert!(rig.computer.is_out_of_range());
    assert!(rig.computer.registry().get_by_id(&"enemy_1".into()).unwrap().out_of_range);

    rig.scene.move_camera(Position::new(0.0, 0.0, -400.0));
    let model = rig.tick().expect("model published");
    assert_eq!(model.distance_line, "100.0 km");
    assert!(!rig.computer.is_out_of_range());
    assert!(!rig.computer.registry().get_by_id(&"enemy_1".into()).unwrap().out_of_range);
    assert_eq!(rig.computer.state(), ComputerState::Locked);
}

#[test]
fn test_flagged_target_stays_out_of_range_until_threshold() {
    let mut target = raider(Position::new(0.0, 0.0, -120.0));
    target.out_of_range = true;
    let mut rig = Rig::new(
        TargetingConfig {
            power_up_ticks: 0,
            reacquire_distance_km: 100.0,
            ..TargetingConfig::default()
        },
        vec![target],
    );
    rig.computer.enable();
    assert!(rig.computer.select_by_id(&"enemy_1".into()));
    assert_eq!(rig.tick().unwrap().distance_line, "Out of Range");
    rig.scene.move_camera(Position::new(0.0, 0.0, -20.0));
    assert_eq!(rig.tick().unwrap().distance_line, "100.0 km");
}

#[test]
fn test_waypoint_never_flagged_by_range() {
    let wp = Target::waypoint("wp1", "Nav Beacon", Position::new(0.0, 900.0, 0.0));
    let mut rig = Rig::enabled(vec![wp]);
    assert!(rig.computer.select_by_id(&"wp1".into()));
    let model = rig.tick().unwrap();
    assert_eq!(model.distance_line, "900.0 km");
    assert_eq!(model.border_color, "#ff00ff");
    assert_eq!(model.type_line, "Waypoint");
}

#[test]
fn test_rapid_toggle() {
    let mut rig = Rig::new(TargetingConfig::default(), vec![star()]);
    rig.computer.enable();
    assert!(rig.computer.select_by_id(&"A0_star".into()));
    rig.computer.disable();
    rig.computer.enable();

    assert_eq!(rig.computer.state(), ComputerState::Idle);
    assert!(rig.computer.current_target_id().is_none());
    assert!(rig.computer.published().is_none());
    assert!(rig.tick().is_none());
}

#[test]
fn test_power_up_suppresses_publishing() {
    let mut rig = Rig::new(
        TargetingConfig {
            power_up_ticks: 3,
            ..TargetingConfig::default()
        },
        vec![star()],
    );
    rig.computer.enable();
    assert!(rig.computer.is_powering_up());
    assert!(rig.computer.select_by_id(&"A0_star".into()));
    assert!(rig.tick().is_none());
    assert!(rig.tick().is_none());
    assert!(rig.tick().is_some(), "Published once the power-up window ends");
    assert!(!rig.computer.is_powering_up());
}

#[test]
fn test_disabled_computer_rejects_selection() {
    let mut rig = Rig::new(instant_config(), vec![star()]);
    assert!(!rig.computer.select_by_id(&"A0_star".into()));
    assert_eq!(rig.computer.state(), ComputerState::Disabled);
    assert!(rig.tick().is_none());
}

#[test]
fn test_select_unknown_keeps_current() {
    let mut rig = Rig::enabled(vec![star()]);
    assert!(rig.computer.select_by_id(&"A0_star".into()));
    assert!(!rig.computer.select_by_id(&"nope".into()));
    assert!(!rig.computer.select_by_name("Nope"));
    assert_eq!(rig.computer.current_target_id().map(|id| id.as_str()), Some("A0_star"));
}

#[test]
fn test_cycle_on_empty_registry() {
    let mut rig = Rig::enabled(vec![]);
    assert!(!rig.computer.cycle(Direction::Next));
    assert_eq!(rig.computer.state(), ComputerState::Idle);
}

#[test]
fn test_cycle_skips_unresolvable_positions() {
    let ghost = Target::enemy_ship(
        "ghost",
        "Ghost",
        "corvette",
        Position::default(),
        HullData::new(10.0, 10.0),
    )
    .tracked_by_scene();
    let mut rig = Rig::enabled(vec![ghost, star()]);
    assert!(rig.computer.cycle(Direction::Next));
    assert_eq!(rig.computer.current_target_id().map(|id| id.as_str()), Some("A0_star"));
    assert!(rig.computer.cycle(Direction::Next), "Wraps past the ghost back to the star");
    assert_eq!(rig.computer.current_target_id().map(|id| id.as_str()), Some("A0_star"));
}

#[test]
fn test_unresolvable_position_clears_within_one_tick() {
    let tracked = Target::enemy_ship(
        "e2",
        "Hunter",
        "corvette",
        Position::default(),
        HullData::new(10.0, 10.0),
    )
    .tracked_by_scene();
    let mut rig = Rig::enabled(vec![tracked]);
    rig.scene.place("e2", Position::new(0.0, 0.0, -2.0));
    assert!(rig.computer.select_by_id(&"e2".into()));
    assert!(rig.tick().is_some());

    rig.scene.remove_node("e2");
    assert!(rig.tick().is_none());
    assert_eq!(rig.computer.state(), ComputerState::Idle);
    let events = rig.computer.take_events();
    assert!(events.contains(&ComputerEvent::TargetCleared { id: "e2".into() }));
}

#[test]
fn test_removed_target_clears_lock() {
    let mut rig = Rig::enabled(vec![star(), planet()]);
    assert!(rig.computer.select_by_id(&"A0_star".into()));
    assert!(rig.tick().is_some());
    rig.computer.registry_mut().remove(&"A0_star".into());
    assert!(rig.tick().is_none());
    assert!(rig.computer.current_target_id().is_none());
}

#[test]
fn test_clear_returns_to_idle() {
    let mut rig = Rig::enabled(vec![star()]);
    assert!(!rig.computer.clear());
    assert!(rig.computer.select_by_id(&"A0_star".into()));
    assert!(rig.tick().is_some());
    assert!(rig.computer.clear());
    assert_eq!(rig.computer.state(), ComputerState::Idle);
    assert!(rig.computer.published().is_none());
}

#[test]
fn test_discovery_change_emits_once() {
    let mut rig = Rig::enabled(vec![planet()]);
    assert!(rig.computer.select_by_id(&"A0_terra".into()));
    rig.tick();
    rig.tick();
    rig.discovery.discover("A0_terra");
    let model = rig.tick().unwrap();
    assert_eq!(model.name_line, "Terra");
    rig.tick();

    let changes: Vec<ComputerEvent> = rig
        .computer
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, ComputerEvent::DiscoveryChanged { .. }))
        .collect();
    assert_eq!(
        changes,
        vec![ComputerEvent::DiscoveryChanged {
            id: "A0_terra".into(),
            status: DiscoveryStatus::Discovered,
        }]
    );
    assert_eq!(rig.scene.0.borrow().rebuilt, vec![TargetId::from("A0_terra")]);

    rig.discovery.forget("A0_terra");
    assert_eq!(rig.tick().unwrap().name_line, "Unknown");
    assert_eq!(rig.computer.take_events().len(), 1);
}

#[test]
fn test_invalid_hull_is_clamped() {
    let broken = Target::enemy_ship(
        "bad",
        "Broken",
        "hulk",
        Position::new(0.0, 0.0, -1.0),
        HullData::new(180.0, 100.0).with_subsystem(SubSystem::new("engines", -0.4)),
    );
    let mut rig = Rig::enabled(vec![broken]);
    assert!(rig.computer.select_by_id(&"bad".into()));
    let model = rig.tick().unwrap();
    assert_eq!(model.hull_section.as_ref().map(|h| h.percent), Some(100));
    let selected = model.sub_target_section.as_ref().unwrap().selected.as_ref().unwrap();
    assert_eq!(selected.health_percent, 0);
    assert!(selected.destroyed);
    assert_eq!(rig.computer.state(), ComputerState::Locked);
}

#[test]
fn test_destroyed_sub_target_stays_selectable() {
    let mut rig = Rig::enabled(vec![raider(Position::new(0.0, 0.0, -3.0))]);
    assert!(rig.computer.select_by_id(&"enemy_1".into()));
    assert!(rig.computer.cycle_sub_target(Direction::Next));
    if let Some(hull) = rig
        .computer
        .registry_mut()
        .get_by_id_mut(&"enemy_1".into())
        .and_then(|t| t.hull_mut())
    {
        hull.subsystems[1].health = 0.0;
    }
    let selected = rig
        .tick()
        .unwrap()
        .sub_target_section
        .clone()
        .unwrap()
        .selected
        .unwrap();
    assert_eq!(selected.system_name, "weapons");
    assert!(selected.destroyed);
    assert_eq!(selected.health_percent, 0);
}

#[test]
fn test_sub_target_reset_on_target_change() {
    let mut rig = Rig::enabled(vec![raider(Position::new(0.0, 0.0, -3.0)), star()]);
    assert!(rig.computer.select_by_id(&"enemy_1".into()));
    assert!(rig.computer.cycle_sub_target(Direction::Next));
    assert!(rig.computer.select_by_id(&"A0_star".into()));
    assert!(rig.computer.current_sub_target().is_none());
    assert!(!rig.computer.cycle_sub_target(Direction::Next));
    assert!(rig.computer.select_by_id(&"enemy_1".into()));
    assert_eq!(
        rig.computer.current_sub_target().map(|e| e.name),
        Some("engines".to_string())
    );
}

#[test]
fn test_audio_cues_for_lock_lifecycle() {
    let mut rig = Rig::enabled(vec![star()]);
    assert!(rig.computer.select_by_id(&"A0_star".into()));
    rig.computer.clear();
    rig.computer.disable();
    assert_eq!(
        rig.computer.take_audio_cues(),
        vec![
            AudioCue::PowerUp,
            AudioCue::TargetAcquired,
            AudioCue::TargetLost,
            AudioCue::PowerDown,
        ]
    );
}

#[test]
fn test_projection_is_deterministic_json() {
    let mut rig = Rig::enabled(vec![raider(Position::new(1.0, 2.0, -3.0))]);
    assert!(rig.computer.select_by_id(&"enemy_1".into()));
    let a = rig.tick().unwrap();
    let b = rig.tick().unwrap();
    assert_eq!(
        serde_json::to_string(&*a).unwrap(),
        serde_json::to_string(&*b).unwrap()
    );
}

// ---- Properties ----

fn sub_type_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["planet", "moon", "refinery", "outpost", "asteroid"])
}

proptest! {
    #[test]
    fn prop_undiscovered_non_ship_hides_identity(
        sub_type in sub_type_strategy(),
        x in -500.0f64..500.0,
        hull in 0.0f64..1000.0,
        station in any::<bool>(),
    ) {
        let position = Position::new(x, 0.0, 0.0);
        let target = if station {
            Target::station("t", "Secret", sub_type, position, HullData::new(hull, 1000.0)
                .with_subsystem(SubSystem::new("core", 0.5)))
        } else {
            Target::celestial("t", "Secret", sub_type, position)
        };
        let model = project_simple(&target, DiscoveryStatus::Undiscovered);
        prop_assert_eq!(model.name_line.as_str(), "Unknown");
        prop_assert_eq!(model.type_line.as_str(), "Unknown");
        prop_assert!(model.sub_target_section.is_none());
    }

    #[test]
    fn prop_waypoint_always_magenta(discovered in any::<bool>(), faction in "[a-z]{0,8}") {
        let mut wp = Target::waypoint("wp", "Nav", Position::default()).with_faction(faction);
        wp.discovered = Some(discovered);
        let status = if discovered { DiscoveryStatus::Discovered } else { DiscoveryStatus::Undiscovered };
        let model = project_simple(&wp, status);
        prop_assert_eq!(model.border_color.as_str(), COLOR_WAYPOINT);
    }

    #[test]
    fn prop_enemy_hull_positive_shows_at_least_one(current in 0.0001f64..1000.0, extra in 0.0f64..1000.0) {
        let ship = Target::enemy_ship("e", "E", "fighter", Position::default(),
            HullData::new(current, current + extra));
        let model = project_simple(&ship, DiscoveryStatus::AlwaysVisible);
        let percent = model.hull_section.map(|h| h.percent).unwrap_or(0);
        prop_assert!(percent >= 1);
        prop_assert!(percent <= 100);
    }

    #[test]
    fn prop_projection_deterministic(distance in 0.0f64..5000.0, health in 0.0f64..1.0, oor in any::<bool>()) {
        let ship = Target::enemy_ship("e", "E", "fighter", Position::default(),
            HullData::new(50.0, 100.0).with_subsystem(SubSystem::new("engines", health)));
        let entries = subtargets::enumerate(ship.hull().unwrap(), true);
        let input = Projection {
            target: &ship,
            distance_km: distance,
            out_of_range: oor,
            sub_targets: &entries,
            sub_cursor: Some(0),
            discovery: DiscoveryStatus::AlwaysVisible,
            ship: ShipCaps { has_sub_targeting: true, accuracy_bonus: 0.1, damage_bonus: 0.1 },
            factions: None,
        };
        let a = serde_json::to_string(&hud::project(&input)).unwrap();
        let b = serde_json::to_string(&hud::project(&input)).unwrap();
        prop_assert_eq!(a, b);
    }
}
