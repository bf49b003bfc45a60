use car_combat::{SystemType, VehicleDefinition};
use damage_regression::{fire_barrage, health_snapshot, DEFAULT_SEED, OVERFLOW_BARRAGE};

#[test]
fn overflow_routing_is_deterministic() {
    let def = VehicleDefinition::default();
    let baseline = health_snapshot(&fire_barrage(&def, &OVERFLOW_BARRAGE, DEFAULT_SEED));
    let repeat = health_snapshot(&fire_barrage(&def, &OVERFLOW_BARRAGE, DEFAULT_SEED));
    assert_eq!(baseline, repeat, "same seed should match");

    let diverged = (0..32)
        .map(|seed| health_snapshot(&fire_barrage(&def, &OVERFLOW_BARRAGE, seed)))
        .any(|table| table != baseline);
    assert!(diverged, "some seed should route overflow differently");
}

#[test]
fn overflow_never_loses_damage() {
    let def = VehicleDefinition::default();
    let dealt: u32 = OVERFLOW_BARRAGE.iter().map(|&(_, _, amount)| amount).sum();
    for seed in 0..32 {
        let car = fire_barrage(&def, &OVERFLOW_BARRAGE, seed);
        assert!(car.is_alive(), "seed {seed} should survive");
        assert_eq!(
            i64::from(dealt),
            car.damage_model().table().total_lost(),
            "seed {seed}"
        );
        assert_eq!(0, car.health(SystemType::FrontArmor));
        assert_eq!(0, car.health(SystemType::FrontChassis));
        assert_eq!(120, car.health(SystemType::BackArmor));
    }
}

#[test]
fn lab_runner_matches_direct_barrage() {
    use damage_lab::{run_hits, ScriptedHit};

    let def = VehicleDefinition::default();
    let hits: Vec<ScriptedHit> = OVERFLOW_BARRAGE
        .iter()
        .map(|&(damage_type, angle, amount)| ScriptedHit {
            damage_type,
            amount,
            normal: None,
            angle: Some(angle),
            repeat: 1,
        })
        .collect();
    let report = run_hits("regression", &def, &hits, DEFAULT_SEED).unwrap();
    let lab: Vec<i32> = report.systems.iter().map(|s| s.current).collect();
    let direct = health_snapshot(&fire_barrage(&def, &OVERFLOW_BARRAGE, DEFAULT_SEED));
    assert_eq!(direct, lab);
}
