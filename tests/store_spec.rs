use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use speculate2::speculate;
use timeline_builder::models::*;
use timeline_builder::store::ProjectStore;
use timeline_builder::TimelineError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, s).expect("valid time")
}

fn create_test_project() -> Project {
    let mut project = Project::new("Website Relaunch", date(2024, 1, 1));
    project.phases.append("Design", 2).expect("Failed to add phase");
    project.phases.append("Build", 3).expect("Failed to add phase");
    project.set_notes("Launch before the spring campaign.\nKeep the old URLs.");
    project
}

speculate! {
    before {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = ProjectStore::open(temp_dir.path());
    }

    describe "save" {
        it "names the document after the timestamp" {
            let name = store
                .save_at(&create_test_project(), at(2024, 1, 2, 9, 30, 5))
                .expect("Failed to save");

            assert_eq!(name, "project_20240102_093005.json");
            assert!(temp_dir.path().join(&name).exists());
        }

        it "writes the document format" {
            let name = store
                .save_at(&create_test_project(), at(2024, 1, 2, 9, 30, 5))
                .expect("Failed to save");

            let content = fs::read_to_string(temp_dir.path().join(name)).expect("Failed to read");
            let value: serde_json::Value = serde_json::from_str(&content).expect("Invalid JSON");

            assert_eq!(value["project_name"], "Website Relaunch");
            assert_eq!(value["start_date"], "2024-01-01");
            assert_eq!(value["phases"][0]["Phase"], "Design");
            assert_eq!(value["phases"][0]["Duration (weeks)"], 2);
            assert_eq!(value["phases"][1]["Phase"], "Build");
            assert_eq!(value["notes"], "Launch before the spring campaign.\nKeep the old URLs.");
        }

        it "never overwrites a document saved in the same second" {
            let stamp = at(2024, 1, 2, 9, 30, 5);
            let mut first = create_test_project();
            first.rename("First");
            let mut second = create_test_project();
            second.rename("Second");

            let first_name = store.save_at(&first, stamp).expect("Failed to save");
            let second_name = store.save_at(&second, stamp).expect("Failed to save");
            let third_name = store.save_at(&second, stamp).expect("Failed to save");

            assert_eq!(first_name, "project_20240102_093005.json");
            assert_eq!(second_name, "project_20240102_093005_1.json");
            assert_eq!(third_name, "project_20240102_093005_2.json");
            assert_eq!(store.load(&first_name).expect("Failed to load").name, "First");
            assert_eq!(store.load(&second_name).expect("Failed to load").name, "Second");
        }

        it "creates the storage directory" {
            let nested = ProjectStore::open(temp_dir.path().join("a").join("b"));
            let name = nested.save(&create_test_project()).expect("Failed to save");
            assert!(temp_dir.path().join("a").join("b").join(name).exists());
        }
    }

    describe "load" {
        it "round-trips a saved project" {
            let project = create_test_project();
            let name = store.save(&project).expect("Failed to save");

            let loaded = store.load(&name).expect("Failed to load");
            assert_eq!(loaded, project);
        }

        it "round-trips an empty project" {
            let project = Project::new("", date(2030, 12, 31));
            let name = store.save(&project).expect("Failed to save");

            let loaded = store.load(&name).expect("Failed to load");
            assert_eq!(loaded, project);
        }

        it "fails with NotFound for a missing document" {
            let err = store.load("project_missing.json").unwrap_err();
            assert!(matches!(err, TimelineError::NotFound(_)));
        }

        it "fails with NotFound for paths outside the store" {
            let err = store.load("../project_elsewhere.json").unwrap_err();
            assert!(matches!(err, TimelineError::NotFound(_)));
        }

        it "defaults missing notes to empty" {
            fs::write(
                temp_dir.path().join("project_legacy.json"),
                r#"{"project_name": "Legacy", "start_date": "2023-05-01",
                    "phases": [{"Phase": "Audit", "Duration (weeks)": 4}]}"#,
            ).expect("Failed to write");

            let loaded = store.load("project_legacy.json").expect("Failed to load");
            assert_eq!(loaded.name, "Legacy");
            assert_eq!(loaded.notes, "");
            assert_eq!(loaded.phases.len(), 1);
        }

        it "rejects a badly formatted start date" {
            fs::write(
                temp_dir.path().join("project_bad_date.json"),
                r#"{"project_name": "X", "start_date": "01/05/2023", "phases": [], "notes": ""}"#,
            ).expect("Failed to write");

            let err = store.load("project_bad_date.json").unwrap_err();
            assert!(matches!(err, TimelineError::Parse { .. }));
        }

        it "rejects a date with a time component" {
            fs::write(
                temp_dir.path().join("project_datetime.json"),
                r#"{"project_name": "X", "start_date": "2023-05-01T00:00:00", "phases": [], "notes": ""}"#,
            ).expect("Failed to write");

            let err = store.load("project_datetime.json").unwrap_err();
            assert!(matches!(err, TimelineError::Parse { .. }));
        }

        it "rejects a document missing required keys" {
            fs::write(
                temp_dir.path().join("project_no_phases.json"),
                r#"{"project_name": "X", "start_date": "2023-05-01"}"#,
            ).expect("Failed to write");

            let err = store.load("project_no_phases.json").unwrap_err();
            assert!(matches!(err, TimelineError::Parse { .. }));
        }

        it "rejects invalid phases" {
            fs::write(
                temp_dir.path().join("project_bad_phase.json"),
                r#"{"project_name": "X", "start_date": "2023-05-01",
                    "phases": [{"Phase": "Audit", "Duration (weeks)": 0}]}"#,
            ).expect("Failed to write");

            let err = store.load("project_bad_phase.json").unwrap_err();
            assert!(matches!(err, TimelineError::Parse { .. }));
        }

        it "rejects malformed JSON" {
            fs::write(temp_dir.path().join("project_broken.json"), "{ not json")
                .expect("Failed to write");

            let err = store.load("project_broken.json").unwrap_err();
            assert!(matches!(err, TimelineError::Parse { .. }));
        }
    }

    describe "list" {
        it "returns nothing for a missing directory" {
            let missing = ProjectStore::open(temp_dir.path().join("nope"));
            assert!(missing.list().expect("Failed to list").is_empty());
        }

        it "includes every saved document" {
            let project = create_test_project();
            let mut saved = Vec::new();
            for second in 0..5 {
                saved.push(
                    store
                        .save_at(&project, at(2024, 1, 2, 9, 30, second))
                        .expect("Failed to save"),
                );
            }
            saved.push(store.save_at(&project, at(2024, 1, 2, 9, 30, 0)).expect("Failed to save"));

            let listed = store.list().expect("Failed to list");
            assert_eq!(listed.len(), 6);
            for name in &saved {
                assert!(listed.contains(name), "missing {}", name);
            }
        }

        it "ignores files outside the naming convention" {
            fs::write(temp_dir.path().join("notes.json"), "{}").expect("Failed to write");
            fs::write(temp_dir.path().join("project_draft.txt"), "").expect("Failed to write");
            fs::create_dir(temp_dir.path().join("project_dir.json")).expect("Failed to mkdir");
            let name = store.save(&create_test_project()).expect("Failed to save");

            assert_eq!(store.list().expect("Failed to list"), vec![name]);
        }

        it "is sorted" {
            let project = create_test_project();
            store.save_at(&project, at(2024, 3, 1, 0, 0, 0)).expect("Failed to save");
            store.save_at(&project, at(2023, 3, 1, 0, 0, 0)).expect("Failed to save");

            assert_eq!(
                store.list().expect("Failed to list"),
                vec![
                    "project_20230301_000000.json".to_string(),
                    "project_20240301_000000.json".to_string(),
                ]
            );
        }
    }
}
