//! End-to-end scenarios against a file-backed store.

use std::collections::BTreeSet;

use chrono::Utc;
use crewmates::stats::SpeedBand;
use crewmates::transfer::{export_csv, export_json, parse_import, CSV_HEADER};
use crewmates::{
    evaluate, CategoryFilter, CollectionView, CrewmateColor, CrewmateDraft, CrewmateStore,
    Error, Gallery, Storage, ViewParams,
};
use tempfile::TempDir;

fn open_store() -> (TempDir, Storage) {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::open(dir.path().join("data").join("crew.db")).expect("open");
    (dir, storage)
}

fn add(store: &Storage, name: &str, speed: u8, color: CrewmateColor, favorite: bool) {
    store
        .create(&CrewmateDraft::new(name, speed, color).favorite(favorite))
        .expect("create");
}

#[test]
fn speed_bands_and_speed_demon() {
    let (_dir, store) = open_store();
    add(&store, "Forty", 40, CrewmateColor::Red, true);
    add(&store, "NinetyFive", 95, CrewmateColor::Blue, false);
    add(&store, "Seventy", 70, CrewmateColor::Green, false);

    let crew = store.list().unwrap();
    let view = CollectionView::compute(&crew, &ViewParams::default(), Utc::now());
    let bands = &view.aggregates.speed_bands;
    assert_eq!(bands.get(SpeedBand::Slow), 1);
    assert_eq!(bands.get(SpeedBand::Medium), 0);
    assert_eq!(bands.get(SpeedBand::Fast), 1);
    assert_eq!(bands.get(SpeedBand::VeryFast), 1);
    assert_eq!(view.aggregates.summary.favorites, 1);

    let card = evaluate(&crew);
    assert!(card.is_unlocked("speed_demon"));
    assert_eq!(card.total_points, 40);
}

#[test]
fn rainbow_collector_needs_eight_colors() {
    let (_dir, store) = open_store();
    add(&store, "Ruby", 10, CrewmateColor::Red, false);
    add(&store, "Sky", 20, CrewmateColor::Blue, false);
    add(&store, "Moss", 30, CrewmateColor::Green, false);
    add(&store, "Scarlet", 40, CrewmateColor::Red, false);

    assert!(!evaluate(&store.list().unwrap()).is_unlocked("rainbow_collector"));

    for (name, color) in [
        ("Rose", CrewmateColor::Pink),
        ("Tango", CrewmateColor::Orange),
        ("Sunny", CrewmateColor::Yellow),
        ("Shadow", CrewmateColor::Black),
        ("Snow", CrewmateColor::White),
    ] {
        add(&store, name, 50, color, false);
    }
    assert!(evaluate(&store.list().unwrap()).is_unlocked("rainbow_collector"));
}

#[test]
fn import_with_bad_speed_creates_nothing() {
    let (_dir, store) = open_store();
    let mut gallery = Gallery::load(&store).unwrap();

    let err = gallery
        .import(r#"[{"name":"A","color":"red","speed":150}]"#)
        .unwrap_err();
    assert!(matches!(err, Error::ImportEntry { index: 0, .. }));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn json_export_import_round_trip() {
    let (_dir, source) = open_store();
    add(&source, "Alpha", 12, CrewmateColor::Purple, true);
    add(&source, "Bravo", 88, CrewmateColor::Cyan, false);
    add(&source, "Charlie", 45, CrewmateColor::Brown, false);
    let original = source.list().unwrap();

    let json = export_json(&original).unwrap();
    let (_dir2, target) = open_store();
    let mut gallery = Gallery::load(&target).unwrap();
    let created = gallery.import(&json).unwrap();
    assert_eq!(created.len(), 3);

    let key = |name: &str, color: &str, speed: u8| (name.to_string(), color.to_string(), speed);
    let before: BTreeSet<_> = original
        .iter()
        .map(|c| key(&c.name, &c.color, c.speed))
        .collect();
    let after: BTreeSet<_> = target
        .list()
        .unwrap()
        .iter()
        .map(|c| key(&c.name, &c.color, c.speed))
        .collect();
    assert_eq!(before, after);

    let old_ids: BTreeSet<_> = original.iter().map(|c| c.id.clone()).collect();
    assert!(created.iter().all(|c| !old_ids.contains(&c.id)));
}

#[test]
fn csv_export_of_visible_set() {
    let (_dir, store) = open_store();
    add(&store, "Alpha", 12, CrewmateColor::Red, true);
    add(&store, "Bravo", 88, CrewmateColor::Blue, false);

    let mut gallery = Gallery::load(&store).unwrap();
    gallery.set_params(ViewParams {
        filter: CategoryFilter::Favorites,
        ..ViewParams::default()
    });
    let csv = export_csv(&gallery.visible(Utc::now()));
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], CSV_HEADER);
    assert!(lines[1].starts_with("\"Alpha\",red,12,"));
}

#[test]
fn select_all_then_bulk_delete() {
    let (_dir, store) = open_store();
    add(&store, "Alpha", 10, CrewmateColor::Red, false);
    add(&store, "Bravo", 20, CrewmateColor::Blue, true);
    add(&store, "Charlie", 30, CrewmateColor::Red, false);
    add(&store, "Delta", 40, CrewmateColor::Green, true);
    add(&store, "Echo", 50, CrewmateColor::Lime, false);

    let mut gallery = Gallery::load(&store).unwrap();
    gallery.set_params(ViewParams {
        filter: CategoryFilter::Favorites,
        ..ViewParams::default()
    });
    gallery.select_all(Utc::now());
    assert_eq!(gallery.selection().len(), 2);

    gallery.set_params(ViewParams::default());
    assert_eq!(gallery.visible(Utc::now()).len(), 5);
    assert_eq!(gallery.selection().len(), 2);

    assert_eq!(gallery.delete_selected().unwrap(), 2);
    assert!(gallery.selection().is_empty());

    let names: Vec<String> = store.list().unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Echo", "Charlie", "Alpha"]);
}

#[test]
fn store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crew.db");
    {
        let store = Storage::open(&path).unwrap();
        add(&store, "Keeper", 64, CrewmateColor::Yellow, true);
    }
    let store = Storage::open(&path).unwrap();
    let crew = store.list().unwrap();
    assert_eq!(crew.len(), 1);
    assert_eq!(crew[0].name, "Keeper");
    assert!(crew[0].is_favorite);
}

#[test]
fn parse_import_names_first_bad_entry() {
    let err = parse_import(
        r#"[{"name":"Fine","color":"red","speed":5},{"name":"Bad","speed":5}]"#,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid crewmate at index 1: Missing or invalid color"
    );
}
