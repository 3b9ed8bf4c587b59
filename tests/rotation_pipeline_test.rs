use rotation_etl::config::toml_config::TomlConfig;
use rotation_etl::core::Pipeline;
use rotation_etl::{EtlEngine, EtlError, LocalStorage, RotationPipeline};
use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const HEADER: &str = "LVLI_EDID\tLVLO_Reference\tCondCount\tCond1\tCond2\tCond3";

const AXOLOTLS: [&str; 12] = [
    "CharcoalAxolotl",
    "GildedAxolotl",
    "LuminescentAxolotl",
    "MidnightAxolotl",
    "OliveAxolotl",
    "PinkAxolotl",
    "TangerineAxolotl",
    "PeachAxolotl",
    "SapphireAxolotl",
    "GreenAxolotl",
    "ReefAxolotl",
    "AlbinoAxolotl",
];

fn reference(month: usize) -> String {
    format!(
        "00800{:03X}:Fishing_Fish_Small_Axolotl{:02}_{}:FISH",
        month,
        month,
        AXOLOTLS[month - 1]
    )
}

fn month_row(month: usize) -> String {
    format!(
        "LL_Fishing_Axolotl_Monthly\t{}\t3\tTop: GetCurrentMonth == {}.000000 AND\tHasKeyword LocRegionForestFloodlands [KYWD:00123456] OR\tHasKeyword LocRegionTheMire [KYWD:00654321] OR HasKeyword LocRegionForestFloodlands [KYWD:00123456]",
        reference(month),
        month
    )
}

fn write_export(dir: &Path, name: &str, rows: &[String], modified_secs: u64) {
    let mut text = String::from(HEADER);
    text.push_str("\r\n");
    for row in rows {
        text.push_str(row);
        text.push_str("\r\n");
    }
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, text).unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(modified_secs))
        .unwrap();
}

fn config_for(source: &Path, output: &Path) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.source.root = source.to_str().unwrap().to_string();
    config.output.path = output.to_str().unwrap().to_string();
    config
}

async fn run(config: TomlConfig) -> rotation_etl::Result<serde_json::Value> {
    let output_file = Path::new(&config.output.path).join(&config.output.filename);
    let storage = LocalStorage::new(config.output.path.clone());
    let engine = EtlEngine::new(RotationPipeline::new(storage, config));
    engine.run().await?;
    let bytes = std::fs::read(output_file).unwrap();
    Ok(serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_full_year_rotation_end_to_end() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let mut rows: Vec<String> = (1..=12).map(month_row).collect();
    rows.push("LL_Other_List\tjunk\t0\t\t\t".to_string());
    write_export(source.path(), "LVLI_Entries_Export_Mar_2026.tsv", &rows, 2_000);

    let document = run(config_for(source.path(), &output.path().join("dist")))
        .await
        .unwrap();

    assert_eq!(document["schemaVersion"], 1);
    assert_eq!(document["timezone"], "America/New_York");
    assert_eq!(document["rollover"]["localTime"], "12:00");
    assert!(document["generatedAt"].as_str().unwrap().ends_with('Z'));

    let months = document["months"].as_object().unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months["1"]["name"], "Charcoal Axolotl");
    assert_eq!(months["12"]["name"], "Albino Axolotl");
    assert_eq!(
        months["7"]["regions"],
        serde_json::json!(["Forest Floodlands", "The Mire"])
    );
    assert!(months["7"]["image"].is_null());
}

#[tokio::test]
async fn test_newest_export_in_tree_is_used() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write_export(
        source.path(),
        "2026/LVLI_Entries_Export_Feb_2026.tsv",
        &[month_row(1)],
        1_000,
    );
    write_export(
        source.path(),
        "2026/march/LVLI_Entries_Export_Mar_2026.tsv",
        &[month_row(2)],
        3_000,
    );
    write_export(
        source.path(),
        "LVLI_Entries_Export_Jan_2026.tsv",
        &[month_row(3)],
        2_000,
    );

    let document = run(config_for(source.path(), output.path())).await.unwrap();
    let months = document["months"].as_object().unwrap();
    assert_eq!(months.keys().collect::<Vec<_>>(), vec!["2"]);
}

#[tokio::test]
async fn test_partial_rotation_still_written() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let rows: Vec<String> = (1..=12)
        .filter(|m| *m != 6 && *m != 12)
        .map(month_row)
        .collect();
    write_export(source.path(), "lvli_entries_export.tsv", &rows, 1_000);

    let document = run(config_for(source.path(), output.path())).await.unwrap();
    let months = document["months"].as_object().unwrap();
    assert_eq!(months.len(), 10);
    assert!(!months.contains_key("6"));
    assert!(!months.contains_key("12"));
}

#[tokio::test]
async fn test_unnamed_entry_falls_back_to_tba() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let row = "LL_Fishing_Axolotl_Monthly\t00800000:Fishing_Unknown:MISC\t1\tGetCurrentMonth == 4.000000\t\t".to_string();
    write_export(source.path(), "LVLI_Entries.tsv", &[row], 1_000);

    let document = run(config_for(source.path(), output.path())).await.unwrap();
    assert_eq!(document["months"]["4"]["name"], "TBA");
    assert_eq!(document["months"]["4"]["regions"], serde_json::json!([]));
}

#[tokio::test]
async fn test_identical_input_gives_identical_months() {
    let source = TempDir::new().unwrap();
    let first_out = TempDir::new().unwrap();
    let second_out = TempDir::new().unwrap();

    let rows: Vec<String> = (1..=12).map(month_row).collect();
    write_export(source.path(), "LVLI_Entries_Export.tsv", &rows, 1_000);

    let first = run(config_for(source.path(), first_out.path())).await.unwrap();
    let second = run(config_for(source.path(), second_out.path())).await.unwrap();

    assert_eq!(first["months"], second["months"]);
}

#[tokio::test]
async fn test_invalid_bytes_do_not_abort() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let mut bytes = HEADER.as_bytes().to_vec();
    bytes.extend_from_slice(b"\nLL_Fishing_Axolotl_Monthly\t0080070C:Fishing_Fish_Small_Axolotl01_CharcoalAxolotl:FISH\t1\tGetCurrentMonth == 9.000000 \xff\xfe\t\t\n");
    std::fs::write(source.path().join("LVLI_Entries.tsv"), bytes).unwrap();

    let document = run(config_for(source.path(), output.path())).await.unwrap();
    assert_eq!(document["months"]["9"]["name"], "Charcoal Axolotl");
}

#[tokio::test]
async fn test_missing_list_is_fatal() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write_export(source.path(), "LVLI_Entries.tsv", &[month_row(1)], 1_000);

    let mut config = config_for(source.path(), output.path());
    config.rotation.list_id = "LL_Not_In_Export".to_string();

    let err = run(config).await.unwrap_err();
    assert!(matches!(err, EtlError::MissingListError { .. }));
    assert!(!output.path().join("axolotl_rotation.json").exists());
}

#[tokio::test]
async fn test_no_matching_file_is_not_found() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write_export(source.path(), "CHAL_Export_Dec_2025.tsv", &[month_row(1)], 1_000);

    let storage = LocalStorage::new(output.path());
    let pipeline = RotationPipeline::new(storage, config_for(source.path(), output.path()));
    let err = pipeline.extract().await.unwrap_err();
    assert!(matches!(err, EtlError::NotFoundError { .. }));
}

#[tokio::test]
async fn test_missing_source_root_is_not_found() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let config = config_for(&source.path().join("missing"), output.path());
    let err = run(config).await.unwrap_err();
    assert!(matches!(err, EtlError::NotFoundError { .. }));
}
