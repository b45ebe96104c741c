use std::fs;

use roam_core::catalog::Catalog;
use roam_core::config::Config;
use roam_core::controller::{ListSpec, ListViewController};
use roam_core::item::{Item, ItemId};
use roam_core::render::Renderer;
use roam_core::screen::{Screen, ScreenState};
use roam_core::session::{Session, parse_actions};
use tempfile::tempdir;

fn explore() -> ListViewController {
    let spec = Screen::Explore.list_specs().remove(0);
    let items = Catalog::builtin().items("destinations").expect("builtin list");
    ListViewController::new(spec, items).expect("controller")
}

fn visible_ids(ctl: &ListViewController) -> Vec<ItemId> {
    ctl.visible_items().iter().map(|item| item.id.clone()).collect()
}

const QUERIES: [&str; 6] = ["", "a", "MAL", "peru", "zzz", "national park"];
const CATEGORIES: [&str; 5] = ["all", "beach", "city", "adventure", "unknown"];

#[test]
fn visible_items_are_deterministic_and_in_source_order() {
    let mut ctl = explore();
    for category in CATEGORIES {
        for query in QUERIES {
            ctl.set_category(category);
            ctl.set_query(query);
            let first = visible_ids(&ctl);
            assert_eq!(first, visible_ids(&ctl));

            let positions: Vec<usize> = first
                .iter()
                .map(|id| {
                    ctl.items()
                        .iter()
                        .position(|item| &item.id == id)
                        .expect("visible item is in source")
                })
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(ctl.visible_count(), first.len());
        }
    }
}

#[test]
fn category_all_means_query_only() {
    let mut ctl = explore();
    ctl.set_category("all");
    for query in QUERIES {
        ctl.set_query(query);
        let folded = query.to_lowercase();
        let expected: Vec<ItemId> = ctl
            .items()
            .iter()
            .filter(|item| {
                ["name", "location"].iter().any(|field| {
                    item.field(field)
                        .map(|v| v.to_lowercase().contains(&folded))
                        .unwrap_or(false)
                })
            })
            .map(|item| item.id.clone())
            .collect();
        assert_eq!(visible_ids(&ctl), expected, "query {query:?}");
    }
}

#[test]
fn empty_query_means_category_only() {
    let mut ctl = explore();
    ctl.set_query("");
    for category in CATEGORIES {
        ctl.set_category(category);
        let expected: Vec<ItemId> = ctl
            .items()
            .iter()
            .filter(|item| category == "all" || item.category.as_deref() == Some(category))
            .map(|item| item.id.clone())
            .collect();
        assert_eq!(visible_ids(&ctl), expected, "category {category}");
    }
}

#[test]
fn double_toggle_is_identity_for_every_item() {
    let mut ctl = explore();
    let before = ctl.items().to_vec();
    for item in &before {
        ctl.toggle_flag(&item.id, "favorite");
        assert_eq!(ctl.flag(&item.id, "favorite"), Some(!item.flag("favorite")));
        ctl.toggle_flag(&item.id, "favorite");
    }
    for (now, was) in ctl.items().iter().zip(&before) {
        assert_eq!(now.flag("favorite"), was.flag("favorite"));
    }
}

#[test]
fn removed_items_never_come_back() {
    let mut ctl = explore();
    let removed = ItemId::Num(6);
    ctl.remove_item(&removed);
    assert_eq!(ctl.len(), 5);
    for category in CATEGORIES {
        for query in QUERIES {
            ctl.set_category(category);
            ctl.set_query(query);
            assert!(!visible_ids(&ctl).contains(&removed));
        }
    }
}

#[test]
fn facets_cover_categorised_items() {
    let ctl = explore();
    let facets = ctl.category_facets();
    assert_eq!(facets[0], ("all".to_string(), 6));
    let categorised: usize = facets[1..].iter().map(|(_, count)| count).sum();
    assert_eq!(categorised, 6);
    assert!(facets.contains(&("beach".to_string(), 2)));
}

#[test]
fn checklist_progress_from_seed() {
    let state = ScreenState::enter(Screen::Trips, &Catalog::builtin(), &Config::default())
        .expect("enter trips");
    let checklist = state.list("checklist").expect("checklist list");
    let progress = checklist.progress("completed");
    assert_eq!((progress.done, progress.total, progress.percent()), (2, 5, 40));
}

#[test]
fn json_data_file_overrides_explore_list() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("catalog.json");
    fs::write(
        &path,
        r#"{
          "lists": {
            "destinations": [
              {"id": "oslo", "fields": {"name": "Oslo", "location": "Norway"}, "category": "city"},
              {"id": 7, "fields": {"name": "Lofoten"}, "category": "mountain", "flags": {"favorite": true}}
            ]
          }
        }"#,
    )
    .expect("write catalog");

    let catalog = Catalog::builtin().overlay(Catalog::load(&path).expect("load json"));
    let mut session =
        Session::start(Screen::Explore, catalog, Config::default()).expect("start session");
    let mut out = Vec::new();
    session
        .run_actions(
            &Renderer::plain(),
            &mut out,
            parse_actions(&["query".to_string(), "NORWAY".to_string()]).expect("parse"),
        )
        .expect("run");

    let list = session.state().active_list();
    assert_eq!(list.len(), 2);
    assert_eq!(visible_ids(list), vec![ItemId::from("oslo")]);
    assert_eq!(list.flag(&ItemId::Num(7), "favorite"), Some(true));
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Oslo"));
}

#[test]
fn numeric_looking_string_ids_can_be_toggled_and_removed() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("catalog.json");
    fs::write(
        &path,
        r#"{
          "lists": {
            "destinations": [
              {"id": "42", "fields": {"name": "Oslo"}, "category": "city"},
              {"id": "007", "fields": {"name": "Bond"}, "category": "adventure"}
            ]
          }
        }"#,
    )
    .expect("write catalog");

    let catalog = Catalog::builtin().overlay(Catalog::load(&path).expect("load json"));
    let mut session =
        Session::start(Screen::Explore, catalog, Config::default()).expect("start session");
    let mut out = Vec::new();
    let words: Vec<String> = "toggle 42 then remove 007"
        .split_whitespace()
        .map(str::to_string)
        .collect();
    session
        .run_actions(&Renderer::plain(), &mut out, parse_actions(&words).expect("parse"))
        .expect("run");

    let list = session.state().active_list();
    assert_eq!(list.flag(&ItemId::from("42"), "favorite"), Some(true));
    assert_eq!(list.len(), 1);
    assert_eq!(visible_ids(list), vec![ItemId::from("42")]);
}

#[test]
fn toml_data_file_and_duplicate_ids() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("catalog.toml");
    fs::write(
        &path,
        r#"
[[lists.checklist]]
id = 1
fields = { task = "Renew passport" }

[[lists.checklist]]
id = 1
fields = { task = "Buy adapter" }
"#,
    )
    .expect("write catalog");

    let catalog = Catalog::builtin().overlay(Catalog::load(&path).expect("load toml"));
    assert_eq!(catalog.items("checklist").expect("checklist").len(), 2);

    let err = ScreenState::enter(Screen::Trips, &catalog, &Config::default())
        .expect_err("duplicate ids must be rejected");
    assert!(format!("{err:#}").contains("duplicate item id 1"));
}

#[test]
fn malformed_data_file_reports_path() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write");
    let err = Catalog::load(&path).expect_err("parse failure");
    assert!(format!("{err:#}").contains("broken.json"));
}

#[test]
fn controller_accepts_string_ids() {
    let spec = ListSpec::new("notes").search(&["name"]);
    let mut ctl = ListViewController::new(
        spec,
        vec![
            Item::with_id(ItemId::from("a")).with_field("name", "Alpha"),
            Item::with_id(ItemId::from("b")).with_field("name", "Beta"),
        ],
    )
    .expect("controller");
    ctl.toggle_flag(&ItemId::from("b"), "favorite");
    ctl.remove_item(&ItemId::from("a"));
    assert_eq!(ctl.flagged("favorite").len(), 1);
    assert_eq!(visible_ids(&ctl), vec![ItemId::from("b")]);
}
