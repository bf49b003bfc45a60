use car_combat::VehicleDefinition;
use damage_regression::{tier_ladder, zone_table};
use serde_json::json;

#[test]
fn damage_ladder() {
    let def = VehicleDefinition::default();
    let trace = json!({
        "ladder": tier_ladder(&def, &[550, 400, 367, 366, 184, 183, 1, 0, -40]),
        "zones": zone_table(&[20, 110, 200, 290, 340]),
    });
    insta::assert_json_snapshot!("damage_ladder", trace);
}
