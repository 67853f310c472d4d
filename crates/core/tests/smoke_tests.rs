use dungeon_core::content::keys;
use dungeon_core::{
    ContentPack, Difficulty, DungeonConfig, DungeonMap, GenerationError, RoomId, RoomType,
    generate_dungeon,
};

fn assert_well_formed(map: &DungeonMap, config: &DungeonConfig, content: &ContentPack) {
    let context = format!("seed {} goal {} {}", map.seed, config.goal_type, map.difficulty);
    assert_eq!(map.rooms.len(), config.room_count, "{context}");

    let starts = map.rooms.values().filter(|room| room.kind == RoomType::Start).count();
    let bosses = map.rooms.values().filter(|room| room.kind == RoomType::Boss).count();
    assert_eq!((starts, bosses), (1, 1), "{context}");
    assert_eq!(map.start_room().map(|room| room.kind), Some(RoomType::Start), "{context}");
    assert_eq!(map.boss_room().map(|room| room.distance_from_start), Some(map.max_depth()));

    for room in map.rooms.values() {
        assert!(!room.neighbors.contains(&room.id), "{context}: self loop at {}", room.id);
        for neighbor in &room.neighbors {
            let back = map.room(*neighbor).expect("neighbor exists");
            assert!(back.neighbors.contains(&room.id), "{context}: one-way edge {}", room.id);
        }
        assert!(room.threat.level <= 3, "{context}");
    }

    let requirement = content.goals.get(&config.goal_type).expect("known goal");
    assert_eq!(map.key_rooms.len() as u32, map.goal.required, "{context}");
    for id in &map.key_rooms {
        let room = map.room(*id).expect("key room exists");
        assert!(room.goal_item.is_some(), "{context}");
        assert!(!room.locked, "{context}: goal item behind the gate");
        assert!(requirement.allows(room.kind), "{context}: goal item in {:?}", room.kind);
    }

    let locked: Vec<RoomId> =
        map.rooms.values().filter(|room| room.locked).map(|room| room.id).collect();
    match map.gate_room_id {
        Some(gate) => {
            assert_eq!(locked, vec![gate], "{context}");
            assert!(map.boss_room().is_some_and(|boss| boss.is_adjacent(gate)), "{context}");
        }
        None => assert!(locked.is_empty(), "{context}"),
    }
}

#[test]
fn test_smoke_every_goal_and_difficulty_generates() {
    let content = ContentPack::default();
    let goal_types: Vec<&str> = content.goals.goal_types().collect();
    for goal_type in goal_types {
        for difficulty in [Difficulty::Normal, Difficulty::Heroic, Difficulty::Mythic] {
            let config =
                DungeonConfig::default().with_goal(goal_type).with_difficulty(difficulty);
            for seed in 0..8 {
                let map = generate_dungeon(&content, &config, seed).expect("valid config");
                assert_well_formed(&map, &config, &content);
            }
        }
    }
}

#[test]
fn test_smoke_boss_only_goal_starts_completed() {
    let content = ContentPack::default();
    let config = DungeonConfig::default().with_goal(keys::GOAL_BOSS_ONLY);
    let map = generate_dungeon(&content, &config, 3).expect("valid config");
    assert!(map.goal.completed);
    assert!(map.key_rooms.is_empty());
}

#[test]
fn test_smoke_large_dungeon_stays_connected() {
    let content = ContentPack::default();
    let config = DungeonConfig::default().with_room_count(60).with_affix_count(4);
    let map = generate_dungeon(&content, &config, 2024).expect("valid config");
    assert_well_formed(&map, &config, &content);
    assert!(map.edge_count() >= 59);
}

#[test]
fn test_smoke_config_loaded_from_toml() {
    let raw = r#"
        room_count = 9
        goal_type = "relic_hunt"
        difficulty = "heroic"
        affix_count = 1

        [room_distribution]
        altar = 2
        chest = 2
        event = 1
    "#;
    let config = DungeonConfig::from_toml_str(raw).expect("valid toml");
    let content = ContentPack::default();
    let map = generate_dungeon(&content, &config, 11).expect("valid config");

    assert_eq!(map.difficulty, Difficulty::Heroic);
    assert_eq!(map.affixes.len(), 1);
    assert_well_formed(&map, &config, &content);
}

#[test]
fn test_smoke_invalid_configs_are_rejected() {
    let content = ContentPack::default();

    let tiny = DungeonConfig::default().with_room_count(1);
    assert_eq!(
        generate_dungeon(&content, &tiny, 1),
        Err(GenerationError::TooFewRooms { room_count: 1, minimum: 2 })
    );

    let unknown = DungeonConfig::default().with_goal("slay_the_moon");
    assert_eq!(
        generate_dungeon(&content, &unknown, 1),
        Err(GenerationError::UnknownGoalType("slay_the_moon".to_string()))
    );
}
