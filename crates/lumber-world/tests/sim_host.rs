use lumber_blocks::Phase;
use lumber_geom::BlockPos;
use lumber_world::sim::{SimHost, TreeShape, Write};
use lumber_world::{BlockAccess, HostError, PlayerAccess, PlayerId};

#[test]
fn custom_logs_carry_phase_and_vanilla_do_not() {
    let mut host = SimHost::new();
    let p = BlockPos::new(0, 64, 0);
    host.set_type(p, "rtc:oak_log").unwrap();
    assert_eq!(host.block(p).unwrap().phase, Some(Phase::ZERO));
    host.set_phase(p, Phase::new(3)).unwrap();
    assert_eq!(host.phase_at(p), Some(Phase::new(3)));

    host.set_type(p, "minecraft:oak_log").unwrap();
    assert_eq!(host.phase_at(p), None);
    assert!(matches!(
        host.set_phase(p, Phase::new(1)),
        Err(HostError::Rejected { .. })
    ));
}

#[test]
fn rejected_positions_refuse_writes_but_still_read() {
    let mut host = SimHost::new();
    let p = BlockPos::new(2, 70, 2);
    host.place(p, "minecraft:birch_log");
    host.reject_writes_at(p);
    assert!(host.destroy(p).is_err());
    assert_eq!(host.type_at(p), "minecraft:birch_log");
    host.accept_writes_at(p);
    host.destroy(p).unwrap();
    assert_eq!(host.type_at(p), "minecraft:air");
    assert_eq!(host.writes, vec![Write::Destroy { pos: p }]);
}

#[test]
fn positions_outside_the_build_limit_are_absent() {
    let host = SimHost::new();
    assert!(host.block(BlockPos::new(0, -65, 0)).is_none());
    assert!(host.block(BlockPos::new(0, 320, 0)).is_none());
    assert!(host.block(BlockPos::new(0, 0, 0)).is_some());
}

#[test]
fn planted_tree_stands_on_dirt() {
    let mut host = SimHost::new();
    let base = BlockPos::new(10, 64, -4);
    let trunk = host.plant_tree(base, &TreeShape::overworld("spruce", 6, 2));
    assert_eq!(trunk.len(), 6);
    assert_eq!(host.type_at(base.down(1)), "minecraft:dirt");
    assert!(host.count_matching(|id| id == "minecraft:spruce_leaves") > 20);
}

#[test]
fn unknown_players_are_invalid() {
    let mut host = SimHost::new();
    let ghost = PlayerId::new("ghost");
    assert!(!host.is_valid(&ghost));
    assert!(!host.is_sneaking(&ghost));
    assert!(matches!(
        host.set_held_item(&ghost, None),
        Err(HostError::UnknownPlayer(_))
    ));
}
