use pcf_workbench::models::*;
use pcf_workbench::work_items::{self, PARSER_VERSION};
use speculate2::speculate;

fn task(id: &str, deps: &[&str], status: TaskStatus) -> Task {
    Task {
        id: id.to_string(),
        title: format!("Task {}", id),
        purpose: "Purpose".to_string(),
        implementation_details: "Details".to_string(),
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
        assignee: "dev".to_string(),
        status,
        estimated_effort: "2h".to_string(),
    }
}

fn story(id: &str, tasks: Vec<Task>) -> UserStory {
    UserStory {
        id: id.to_string(),
        title: format!("Story {}", id),
        description: "As a maker, I can build things".to_string(),
        acceptance_criteria: vec!["It works".to_string()],
        tasks,
    }
}

fn epic(id: &str, stories: Vec<UserStory>) -> Epic {
    Epic {
        id: id.to_string(),
        title: format!("Epic {}", id),
        description: "A body of work".to_string(),
        acceptance_criteria: vec![],
        user_stories: stories,
    }
}

fn sample_epics() -> Vec<Epic> {
    vec![
        epic(
            "E1",
            vec![
                story(
                    "US1",
                    vec![
                        task("T1", &[], TaskStatus::Done),
                        task("T2", &["T1"], TaskStatus::InProgress),
                    ],
                ),
                story("US2", vec![task("T3", &["T2"], TaskStatus::Todo)]),
            ],
        ),
        epic("E2", vec![story("US3", vec![])]),
    ]
}

fn document(epics: Vec<Epic>) -> Document {
    Document {
        epics,
        metadata: DocumentMetadata {
            generated_at: chrono::Utc::now(),
            source_document: "docs/requirements.md".to_string(),
            parser_version: PARSER_VERSION.to_string(),
        },
    }
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("out").join("work_items.json");
    }

    describe "save and load" {
        it "round-trips the hierarchy and generated_at" {
            let saved = work_items::save(&path, sample_epics(), "docs/requirements.md", None)
                .expect("Failed to save");
            let loaded = work_items::load(&path).expect("Failed to load");

            assert_eq!(loaded, saved);
            assert_eq!(loaded.epics, sample_epics());
            assert_eq!(loaded.metadata.generated_at, saved.metadata.generated_at);
            assert_eq!(loaded.metadata.source_document, "docs/requirements.md");
            assert_eq!(loaded.metadata.parser_version, PARSER_VERSION);
        }

        it "stamps generated_at at save time" {
            let before = chrono::Utc::now();
            let saved = work_items::save(&path, vec![], "req.md", Some("2.1".to_string()))
                .expect("Failed to save");
            let after = chrono::Utc::now();

            assert!(saved.metadata.generated_at >= before);
            assert!(saved.metadata.generated_at <= after);
            assert_eq!(saved.metadata.parser_version, "2.1");
        }

        it "writes every array field even when empty" {
            work_items::save(&path, sample_epics(), "req.md", None).expect("Failed to save");
            let raw: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

            assert!(raw["epics"][1]["acceptance_criteria"].as_array().unwrap().is_empty());
            assert!(raw["epics"][1]["user_stories"][0]["tasks"].as_array().unwrap().is_empty());
            assert!(raw["epics"][0]["user_stories"][0]["tasks"][0]["dependencies"].is_array());
            assert_eq!(raw["epics"][0]["user_stories"][0]["tasks"][1]["status"], "in-progress");
        }

        it "fails to load a missing file" {
            let result = work_items::load(&dir.path().join("missing.json"));
            assert!(result.is_err());
        }

        it "rejects documents with missing array fields" {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(
                &path,
                r#"{"epics":[{"id":"E1","title":"t","description":"d","acceptance_criteria":[]}],
                    "metadata":{"generated_at":"2024-01-01T00:00:00Z","source_document":"x","parser_version":"1"}}"#,
            )
            .unwrap();

            assert!(work_items::load(&path).is_err());
        }
    }

    describe "validate" {
        it "accepts a well-formed document" {
            let report = work_items::validate(&document(sample_epics()));

            assert!(report.valid, "unexpected errors: {:?}", report.errors);
            assert!(report.errors.is_empty());
            assert!(report.warnings.is_empty());
        }

        it "flags malformed ids at every level" {
            let epics = vec![epic(
                "Epic-1",
                vec![story("S1", vec![task("task1", &[], TaskStatus::Todo)])],
            )];
            let report = work_items::validate(&document(epics));

            assert!(!report.valid);
            assert_eq!(report.errors.len(), 3);
            assert!(report.errors.iter().any(|e| e.contains("Epic-1")));
            assert!(report.errors.iter().any(|e| e.contains("S1")));
            assert!(report.errors.iter().any(|e| e.contains("task1")));
        }

        it "flags duplicate ids within a level" {
            let epics = vec![
                epic("E1", vec![story("US1", vec![task("T1", &[], TaskStatus::Todo)])]),
                epic("E1", vec![story("US1", vec![task("T1", &[], TaskStatus::Todo)])]),
            ];
            let report = work_items::validate(&document(epics));

            assert!(!report.valid);
            assert_eq!(
                report.errors.iter().filter(|e| e.contains("duplicated")).count(),
                3
            );
        }

        it "warns about unknown dependencies" {
            let epics = vec![epic("E1", vec![story("US1", vec![task("T1", &["T9"], TaskStatus::Todo)])])];
            let report = work_items::validate(&document(epics));

            assert!(report.valid);
            assert_eq!(report.warnings.len(), 1);
            assert!(report.warnings[0].contains("T9"));
        }

        it "reports dependency cycles as errors" {
            let epics = vec![epic(
                "E1",
                vec![story(
                    "US1",
                    vec![
                        task("T1", &["T3"], TaskStatus::Todo),
                        task("T2", &["T1"], TaskStatus::Todo),
                        task("T3", &["T2"], TaskStatus::Todo),
                    ],
                )],
            )];
            let report = work_items::validate(&document(epics));

            assert!(!report.valid);
            assert_eq!(report.errors, vec!["Dependency cycle: T1 -> T3 -> T2 -> T1".to_string()]);
        }

        it "treats a self-dependency as a cycle" {
            let epics = vec![epic("E1", vec![story("US1", vec![task("T1", &["T1"], TaskStatus::Todo)])])];
            let report = work_items::validate(&document(epics));

            assert!(!report.valid);
            assert_eq!(report.errors, vec!["Dependency cycle: T1 -> T1".to_string()]);
        }

        it "handles long dependency chains on a small stack" {
            const CHAIN: usize = 50_000;
            let tasks: Vec<Task> = (1..=CHAIN)
                .map(|i| {
                    let next = format!("T{}", i + 1);
                    let deps: Vec<&str> = if i < CHAIN { vec![next.as_str()] } else { vec![] };
                    task(&format!("T{}", i), &deps, TaskStatus::Todo)
                })
                .collect();
            let doc = document(vec![epic("E1", vec![story("US1", tasks)])]);

            let report = std::thread::Builder::new()
                .stack_size(2 * 1024 * 1024)
                .spawn(move || work_items::validate(&doc))
                .expect("Failed to spawn")
                .join()
                .expect("Validation thread panicked");

            assert!(report.valid, "unexpected errors: {:?}", report.errors);
        }

        it "reports a cycle closing a long chain" {
            const CHAIN: usize = 50_000;
            let tasks: Vec<Task> = (1..=CHAIN)
                .map(|i| {
                    let next = format!("T{}", i % CHAIN + 1);
                    task(&format!("T{}", i), &[next.as_str()], TaskStatus::Todo)
                })
                .collect();
            let doc = document(vec![epic("E1", vec![story("US1", tasks)])]);

            let report = std::thread::Builder::new()
                .stack_size(2 * 1024 * 1024)
                .spawn(move || work_items::validate(&doc))
                .expect("Failed to spawn")
                .join()
                .expect("Validation thread panicked");

            assert!(!report.valid);
            assert_eq!(report.errors.len(), 1);
            assert!(report.errors[0].starts_with("Dependency cycle: T1 -> T2 -> T3 -> "));
            assert!(report.errors[0].ends_with("-> T50000 -> T1"));
        }

        it "returns an invalid report for unparseable files instead of failing" {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "{ not json").unwrap();

            let report = work_items::validate_file(&path);

            assert!(!report.valid);
            assert_eq!(report.errors.len(), 1);
            assert!(report.summary.is_none());
        }

        it "returns an invalid report for missing files" {
            let report = work_items::validate_file(&dir.path().join("nope.json"));
            assert!(!report.valid);
        }
    }

    describe "summarize" {
        it "counts every level and each task status" {
            let summary = work_items::summarize(&document(sample_epics()));

            assert_eq!(summary.epics, 2);
            assert_eq!(summary.user_stories, 3);
            assert_eq!(summary.tasks, 3);
            assert_eq!(summary.tasks_by_status["todo"], 1);
            assert_eq!(summary.tasks_by_status["in-progress"], 1);
            assert_eq!(summary.tasks_by_status["done"], 1);
        }

        it "includes zero counts for unused statuses" {
            let summary = work_items::summarize(&document(vec![]));

            assert_eq!(summary.tasks, 0);
            assert_eq!(summary.tasks_by_status.len(), 3);
            assert!(summary.tasks_by_status.values().all(|&n| n == 0));
        }
    }

    describe "task status" {
        it "parses and prints the wire names" {
            for status in TaskStatus::ALL {
                assert_eq!(TaskStatus::from_str(status.as_str()), Some(status));
            }
            assert_eq!(TaskStatus::from_str("blocked"), None);
        }
    }
}
