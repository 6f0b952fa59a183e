use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_smite_subcommand_prints_build() {
    let dir = tempdir().unwrap();

    let god_path = dir.path().join("god.json");
    let mut f = std::fs::File::create(&god_path).unwrap();
    write!(
        f,
        r#"{{"name": "Ah Muzen Cab", "stats": {{"basic_attack_damage": 38.0, "basic_attack_speed": 1.0}}}}"#
    )
    .unwrap();

    let items_path = dir.path().join("items.json");
    let mut f = std::fs::File::create(&items_path).unwrap();
    let items: Vec<String> = (0..8)
        .map(|i| {
            format!(
                r#"{{"name": "Bow {i}", "cost": 2000, "stats": {{"basic_attack_speed": {}}}}}"#,
                10 + i * 5
            )
        })
        .collect();
    write!(f, "[{}]", items.join(",")).unwrap();

    Command::cargo_bin("twopt")
        .unwrap()
        .args(["smite", "--solver", "micro"])
        .arg("--god")
        .arg(&god_path)
        .arg("--items")
        .arg(&items_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Build for Ah Muzen Cab"));
}

#[test]
fn test_smite_subcommand_reports_infeasible_pool() {
    let dir = tempdir().unwrap();

    let god_path = dir.path().join("god.json");
    std::fs::write(
        &god_path,
        r#"{"name": "Charon", "stats": {"basic_attack_damage": 40.0, "basic_attack_speed": 0.9}}"#,
    )
    .unwrap();

    let items_path = dir.path().join("items.json");
    std::fs::write(&items_path, r#"[{"name": "Lone Item"}]"#).unwrap();

    Command::cargo_bin("twopt")
        .unwrap()
        .args(["smite", "--solver", "micro"])
        .arg("--god")
        .arg(&god_path)
        .arg("--items")
        .arg(&items_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No feasible build"));
}

#[test]
fn test_campaign_subcommand_solves_tiny_export() {
    let dir = tempdir().unwrap();

    std::fs::write(
        dir.path().join("building_effects_junction_table.tsv"),
        "att_bld_roman_east_city_major_1\tatt_effect_economy_gdp_trade_local\tbuilding_to_building_own\t100.0\tx\ty\n\
         att_bld_roman_east_city_major_1\tatt_effect_region_sanitation_buildings\tregion_to_region_own\t2.0\tx\ty\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("region_to_provinces_junctions_table.tsv"),
        "att_prov_thracia\tatt_reg_thracia_constantinopolis\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("start_pos_region_slot_templates_tables.tsv"),
        "1\tmain_attila\tatt_reg_thracia_constantinopolis\tprimary\tatt_bld_roman_east_city_major_1\n",
    )
    .unwrap();

    Command::cargo_bin("twopt")
        .unwrap()
        .args(["campaign", "--solver", "micro"])
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--answers")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("prov_thracia")
                .and(predicate::str::contains("bld_roman_east_city_major_1"))
                .and(predicate::str::contains("Total objective: 100.0000")),
        );
}

#[test]
fn test_campaign_requires_data_dir() {
    Command::cargo_bin("twopt")
        .unwrap()
        .arg("campaign")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--data-dir"));
}
