//! MCP server integration tests.
//!
//! Tests call the tool methods directly and inspect the content envelope:
//! - Filesystem tools
//! - Work item tools
//! - Codegen tools

use std::fs;

use pcf_workbench::config::Config;
use pcf_workbench::files::FileManager;
use pcf_workbench::mcp::*;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Helper to create a manager over a fresh temp workspace.
fn setup() -> (TempDir, FileManager) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let files = FileManager::new(Config::with_root(dir.path())).expect("Failed to create manager");
    (dir, files)
}

/// Helper to parse the JSON text payload of a tool result.
fn payload(result: &CallToolResult) -> Value {
    let text = result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.clone())
        .expect("Expected text content");
    serde_json::from_str(&text).expect("Expected JSON in text")
}

fn is_error(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}

fn sample_epics() -> Value {
    json!([{
        "id": "E1",
        "title": "Data grid",
        "description": "Editable grid control",
        "acceptance_criteria": ["Renders 10k rows"],
        "user_stories": [{
            "id": "US1",
            "title": "Sort columns",
            "description": "As a user, I can sort by any column",
            "acceptance_criteria": [],
            "tasks": [{
                "id": "T1",
                "title": "Column header click",
                "purpose": "Trigger sorting",
                "implementation_details": "Handle onClick",
                "dependencies": [],
                "assignee": "dev",
                "status": "todo",
                "estimated_effort": "1d"
            }]
        }]
    }])
}

// ============================================================
// Filesystem Tools Tests
// ============================================================

mod filesystem_tools {
    use super::*;

    #[tokio::test]
    async fn write_then_read_round_trips_content() {
        let (_dir, files) = setup();
        let server = FilesystemServer::new(files);

        let written = server
            .write_file(Parameters(WriteFileRequest {
                path: "src/index.ts".to_string(),
                content: "export {};\n".to_string(),
                create_dirs: true,
            }))
            .await
            .expect("Tool failed");
        assert!(!is_error(&written));
        assert_eq!(payload(&written)["bytes_written"], 11);

        let read = server
            .read_file(Parameters(ReadFileRequest {
                path: "src/index.ts".to_string(),
            }))
            .await
            .expect("Tool failed");
        let body = payload(&read);
        assert_eq!(body["content"], "export {};\n");
        assert_eq!(body["cached"], false);
    }

    #[tokio::test]
    async fn failures_use_the_error_envelope() {
        let (_dir, files) = setup();
        let server = FilesystemServer::new(files);

        let result = server
            .read_file(Parameters(ReadFileRequest {
                path: "../../etc/passwd".to_string(),
            }))
            .await
            .expect("Tool failures must not become protocol errors");

        assert!(is_error(&result));
        let body = payload(&result);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("outside the workspace root"));
        assert!(body.get("details").is_some());
    }

    #[tokio::test]
    async fn invalid_regex_is_reported_not_raised() {
        let (_dir, files) = setup();
        let server = FilesystemServer::new(files);

        let result = server
            .search_files(Parameters(SearchFilesRequest {
                path: ".".to_string(),
                pattern: "[".to_string(),
                regex: true,
                case_sensitive: false,
                max_depth: None,
                max_results: None,
                extensions: vec![],
                include_hidden: false,
            }))
            .await
            .expect("Tool failed");

        assert!(is_error(&result));
        assert_eq!(payload(&result)["success"], false);
    }

    #[tokio::test]
    async fn cache_tools_report_and_clear() {
        let (dir, files) = setup();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let server = FilesystemServer::new(files);

        for _ in 0..2 {
            server
                .read_file(Parameters(ReadFileRequest {
                    path: "a.txt".to_string(),
                }))
                .await
                .expect("Tool failed");
        }

        let stats = payload(&server.cache_stats().await.expect("Tool failed"));
        assert_eq!(stats["entries"], 1);
        assert_eq!(stats["hits"], 1);
        assert_eq!(stats["misses"], 1);

        let cleared = payload(&server.clear_cache().await.expect("Tool failed"));
        assert_eq!(cleared["cleared"], 1);
        assert_eq!(server.files().cache_stats().entries, 0);
    }
}

// ============================================================
// Work Item Tools Tests
// ============================================================

mod work_item_tools {
    use super::*;

    fn save_request(epics: Value) -> SaveWorkItemsRequest {
        serde_json::from_value(json!({
            "path": "planning/work_items.json",
            "epics": epics,
            "source_document": "docs/requirements.docx"
        }))
        .expect("Invalid request")
    }

    #[tokio::test]
    async fn save_load_and_summarize() {
        let (dir, files) = setup();
        let server = WorkItemsServer::new(files);

        let saved = payload(
            &server
                .save_work_items(Parameters(save_request(sample_epics())))
                .await
                .expect("Tool failed"),
        );
        assert_eq!(saved["validation"]["valid"], true);
        assert!(saved["metadata"]["generated_at"].is_string());
        assert!(dir.path().join("planning/work_items.json").exists());

        let loaded = payload(
            &server
                .load_work_items(Parameters(WorkItemsPathRequest {
                    path: "planning/work_items.json".to_string(),
                }))
                .await
                .expect("Tool failed"),
        );
        assert_eq!(loaded["epics"], sample_epics());
        assert_eq!(loaded["metadata"]["generated_at"], saved["metadata"]["generated_at"]);
        assert_eq!(loaded["metadata"]["source_document"], "docs/requirements.docx");

        let summary = payload(
            &server
                .summarize_work_items(Parameters(WorkItemsPathRequest {
                    path: "planning/work_items.json".to_string(),
                }))
                .await
                .expect("Tool failed"),
        );
        assert_eq!(summary["summary"]["tasks"], 1);
        assert_eq!(summary["summary"]["tasks_by_status"]["todo"], 1);
    }

    #[tokio::test]
    async fn save_reports_malformed_ids_without_failing() {
        let (_dir, files) = setup();
        let server = WorkItemsServer::new(files);

        let mut epics = sample_epics();
        epics[0]["id"] = json!("EPIC-1");

        let result = server
            .save_work_items(Parameters(save_request(epics)))
            .await
            .expect("Tool failed");

        assert!(!is_error(&result));
        let body = payload(&result);
        assert_eq!(body["validation"]["valid"], false);
        assert_eq!(body["validation"]["errors"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn validate_handles_garbage_files() {
        let (dir, files) = setup();
        fs::write(dir.path().join("broken.json"), "[1, 2").unwrap();
        let server = WorkItemsServer::new(files);

        let result = server
            .validate_work_items(Parameters(WorkItemsPathRequest {
                path: "broken.json".to_string(),
            }))
            .await
            .expect("Tool failed");

        assert!(!is_error(&result));
        assert_eq!(payload(&result)["valid"], false);
    }

    #[tokio::test]
    async fn load_missing_file_returns_error_envelope() {
        let (_dir, files) = setup();
        let server = WorkItemsServer::new(files);

        let result = server
            .load_work_items(Parameters(WorkItemsPathRequest {
                path: "nothing.json".to_string(),
            }))
            .await
            .expect("Tool failed");

        assert!(is_error(&result));
        assert_eq!(payload(&result)["success"], false);
    }
}

// ============================================================
// Codegen Tools Tests
// ============================================================

mod codegen_tools {
    use super::*;

    #[tokio::test]
    async fn generates_controllers_from_saved_work_items() {
        let (dir, files) = setup();
        fs::write(
            dir.path().join("GridController.ts"),
            "export class GridController { grid = 'grid'; }\n",
        )
        .unwrap();

        let work_items = WorkItemsServer::new(files.clone());
        work_items
            .save_work_items(Parameters(
                serde_json::from_value(json!({
                    "path": "work_items.json",
                    "epics": sample_epics(),
                    "source_document": "requirements.md"
                }))
                .unwrap(),
            ))
            .await
            .expect("Tool failed");

        let codegen = CodegenServer::new(files);
        let result = codegen
            .generate_controllers(Parameters(GenerateControllersRequest {
                work_items_path: "work_items.json".to_string(),
                template_path: "GridController.ts".to_string(),
                source_name: "Grid".to_string(),
                output_dir: "controllers".to_string(),
                overwrite: false,
            }))
            .await
            .expect("Tool failed");

        assert!(!is_error(&result));
        let body = payload(&result);
        assert_eq!(body["generated"][0]["type_name"], "SortColumns");
        assert_eq!(
            fs::read_to_string(dir.path().join("controllers/SortColumnsController.ts")).unwrap(),
            "export class SortColumnsController { sortColumns = 'sortColumns'; }\n"
        );
    }

    #[tokio::test]
    async fn generate_stub_rejects_unusable_names() {
        let (dir, files) = setup();
        fs::write(dir.path().join("T.ts"), "class Thing {}").unwrap();
        let codegen = CodegenServer::new(files);

        let result = codegen
            .generate_stub(Parameters(GenerateStubRequest {
                template_path: "T.ts".to_string(),
                source_name: "Thing".to_string(),
                target_name: "***".to_string(),
                output_path: "Out.ts".to_string(),
                overwrite: false,
            }))
            .await
            .expect("Tool failed");

        assert!(is_error(&result));
        assert!(!dir.path().join("Out.ts").exists());
    }
}
