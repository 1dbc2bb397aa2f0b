//! Loading catalogs, parties and configuration from disk.

use encounter_forge::{
    build_pool, estimate, load_party, Catalog, CombatantStats, ForgeConfig, ForgeError,
    ForgeResult,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[test]
fn test_load_catalog_file() -> ForgeResult<()> {
    let file = write_temp(
        r#"{"Feral Ghoul": {"level": 3, "hp": 30, "stamina": 5, "actions": ["Claw"]},
            "Protectron": {"ac": 15, "dt": 4}}"#,
    );
    let catalog = Catalog::load(file.path())?;
    assert_eq!(catalog.len(), 2);

    let ghoul = catalog.stats("Feral Ghoul").unwrap();
    assert_eq!(ghoul.sp, 5);
    assert_eq!(ghoul.actions, vec!["Claw".to_string()]);

    let protectron = catalog.stats("Protectron").unwrap();
    assert_eq!(protectron.level, 1);
    assert_eq!(protectron.ap, 0);
    Ok(())
}

#[test]
fn test_load_party_and_estimate() -> ForgeResult<()> {
    let file = write_temp(
        r#"[{"name": "Courier", "level": 4, "hp": 20, "stamina": 10, "ac": 12, "dt": 2,
             "action_points": 10},
            {"name": "Companion", "level": 4, "hp": 20, "stamina": 10, "ac": 12, "dt": 2,
             "action_points": 10}]"#,
    );
    let party: Vec<CombatantStats> = load_party(file.path())?
        .iter()
        .map(|member| member.to_stats())
        .collect();

    assert_eq!(party.len(), 2);
    assert_eq!(estimate(&party, false, false), 168);
    assert_eq!(estimate(&party, true, true), 84 + 90);
    Ok(())
}

#[test]
fn test_party_and_catalog_score_on_same_scale() -> ForgeResult<()> {
    let catalog = Catalog::from_json_str(
        r#"{"Twin": {"level": 4, "hp": 20, "sp": 10, "ac": 12, "dt": 2, "ap": 10}}"#,
    )?;
    let party_file = write_temp(
        r#"[{"name": "Twin", "level": 4, "hp": 20, "stamina": 10, "ac": 12, "dt": 2,
             "action_points": 10}]"#,
    );
    let party: Vec<CombatantStats> = load_party(party_file.path())?
        .iter()
        .map(|m| m.to_stats())
        .collect();

    let pool = build_pool(&catalog.candidates(), &ForgeConfig::default().classifier(), false);
    assert_eq!(pool[0].cr, estimate(&party, false, false));
    Ok(())
}

#[test]
fn test_load_config_file() -> ForgeResult<()> {
    let file = write_temp(
        r#"{"use_ap_multiplier": true,
            "composer": {"group_multiplier": true, "overflow_allowance": 0.25}}"#,
    );
    let config = ForgeConfig::load(file.path())?;
    assert!(config.use_ap_multiplier);
    assert!(config.composer.group_multiplier);
    assert_eq!(config.composer.overflow_allowance, 0.25);
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Catalog::load("/definitely/not/here/catalog.json");
    assert!(matches!(result, Err(ForgeError::Io(_))));
}

#[test]
fn test_malformed_file_is_serde_error() {
    let file = write_temp("{ not json");
    assert!(matches!(Catalog::load(file.path()), Err(ForgeError::Serde(_))));
    assert!(matches!(load_party(file.path()), Err(ForgeError::Serde(_))));
}
