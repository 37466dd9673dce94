//! Filesystem tool tests
//!
//! Tests for read, write, edit, list, search and delete tools.

use serde_json::json;
use std::fs;
use tempfile::TempDir;
use vics_core::tools::filesystem::{
    DeleteFile, EditFile, ListDirectory, ReadFile, SearchFiles, WriteFile, EMPTY_DIRECTORY,
    MAX_SEARCH_RESULTS, NO_MATCHES,
};
use vics_core::tools::{Tool, ToolContext};
use vics_core::ToolError;
use vics_sandbox::Sandbox;

/// Create a temporary workspace with sample files
fn setup_workspace() -> (TempDir, ToolContext) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let base = dir.path();

    fs::create_dir_all(base.join("src")).unwrap();
    fs::write(
        base.join("src/main.py"),
        "def hello():\n    print(\"Hello, world!\")\n\nhello()\n",
    )
    .unwrap();
    fs::write(base.join("README.md"), "# My Project\n\nThis is a test project.\n").unwrap();

    let ctx = ToolContext::new(Sandbox::new(base).unwrap());
    (dir, ctx)
}

fn rendered(err: ToolError, tool: &str) -> String {
    err.render(tool)
}

mod read_file_tests {
    use super::*;

    #[tokio::test]
    async fn test_read_existing_file() {
        let (_dir, ctx) = setup_workspace();
        let output = ReadFile.execute(json!({"path": "README.md"}), &ctx).await.unwrap();
        assert_eq!(output, "# My Project\n\nThis is a test project.\n");
    }

    #[tokio::test]
    async fn test_read_nonexistent_file() {
        let (_dir, ctx) = setup_workspace();
        let err = ReadFile.execute(json!({"path": "missing.txt"}), &ctx).await.unwrap_err();
        assert_eq!(rendered(err, "read_file"), "Error: File not found: missing.txt");
    }

    #[tokio::test]
    async fn test_read_replaces_invalid_utf8() {
        let (dir, ctx) = setup_workspace();
        fs::write(dir.path().join("bin.dat"), [b'o', b'k', 0xff, b'!']).unwrap();
        let output = ReadFile.execute(json!({"path": "bin.dat"}), &ctx).await.unwrap();
        assert_eq!(output, "ok\u{FFFD}!");
    }

    #[tokio::test]
    async fn test_read_missing_param_is_fault() {
        let (_dir, ctx) = setup_workspace();
        let err = ReadFile.execute(json!({}), &ctx).await.unwrap_err();
        assert!(!err.is_expected());
        assert!(rendered(err, "read_file").starts_with("Error executing read_file: InvalidParams:"));
    }
}

mod write_file_tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let (dir, ctx) = setup_workspace();
        let content = "line one\nline two ünïcode ✓\n";

        let output = WriteFile
            .execute(json!({"path": "deep/nested/out.txt", "content": content}), &ctx)
            .await
            .unwrap();
        assert_eq!(
            output,
            format!("Successfully wrote {} bytes to deep/nested/out.txt", content.len())
        );
        assert!(dir.path().join("deep/nested").is_dir());

        let read = ReadFile
            .execute(json!({"path": "deep/nested/out.txt"}), &ctx)
            .await
            .unwrap();
        assert_eq!(read, content);
    }

    #[tokio::test]
    async fn test_write_outside_workspace_denied() {
        let (dir, ctx) = setup_workspace();
        let err = WriteFile
            .execute(json!({"path": "../escape.txt", "content": "x"}), &ctx)
            .await
            .unwrap_err();
        assert_eq!(
            rendered(err, "write_file"),
            "Error: Access denied: ../escape.txt escapes the workspace."
        );
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }
}

mod edit_file_tests {
    use super::*;

    #[tokio::test]
    async fn test_edit_single_occurrence() {
        let (dir, ctx) = setup_workspace();
        let output = EditFile
            .execute(
                json!({"path": "src/main.py", "old_string": "def hello():", "new_string": "def greet():"}),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(output, "Successfully edited src/main.py");

        let content = fs::read_to_string(dir.path().join("src/main.py")).unwrap();
        assert_eq!(
            content,
            "def greet():\n    print(\"Hello, world!\")\n\nhello()\n"
        );
    }

    #[tokio::test]
    async fn test_edit_zero_occurrences_leaves_file() {
        let (dir, ctx) = setup_workspace();
        let before = fs::read(dir.path().join("README.md")).unwrap();
        let err = EditFile
            .execute(
                json!({"path": "README.md", "old_string": "absent", "new_string": "x"}),
                &ctx,
            )
            .await
            .unwrap_err();
        assert_eq!(rendered(err, "edit_file"), "Error: old_string not found in README.md.");
        assert_eq!(fs::read(dir.path().join("README.md")).unwrap(), before);
    }

    #[tokio::test]
    async fn test_edit_ambiguous_reports_count() {
        let (dir, ctx) = setup_workspace();
        fs::write(dir.path().join("dup.txt"), "a x a x a").unwrap();
        let err = EditFile
            .execute(json!({"path": "dup.txt", "old_string": "a", "new_string": "b"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Ambiguous { count: 3, .. }));
        assert_eq!(fs::read_to_string(dir.path().join("dup.txt")).unwrap(), "a x a x a");
    }

    #[tokio::test]
    async fn test_edit_missing_file() {
        let (_dir, ctx) = setup_workspace();
        let err = EditFile
            .execute(json!({"path": "nope.txt", "old_string": "a", "new_string": "b"}), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "NotFound");
    }
}

mod list_directory_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_root_sorted_with_suffix() {
        let (_dir, ctx) = setup_workspace();
        let output = ListDirectory.execute(json!({"path": "."}), &ctx).await.unwrap();
        assert_eq!(output, "README.md\nsrc/");
    }

    #[tokio::test]
    async fn test_list_empty_directory() {
        let (dir, ctx) = setup_workspace();
        fs::create_dir(dir.path().join("empty")).unwrap();
        let output = ListDirectory.execute(json!({"path": "empty"}), &ctx).await.unwrap();
        assert_eq!(output, EMPTY_DIRECTORY);
    }

    #[tokio::test]
    async fn test_list_errors() {
        let (_dir, ctx) = setup_workspace();
        let err = ListDirectory.execute(json!({"path": "missing"}), &ctx).await.unwrap_err();
        assert_eq!(rendered(err, "list_directory"), "Error: Directory not found: missing");

        let err = ListDirectory.execute(json!({"path": "README.md"}), &ctx).await.unwrap_err();
        assert_eq!(rendered(err, "list_directory"), "Error: Not a directory: README.md");

        let err = ListDirectory.execute(json!({"path": "/"}), &ctx).await.unwrap_err();
        assert_eq!(err.kind(), "AccessDenied");
    }
}

mod search_files_tests {
    use super::*;

    #[tokio::test]
    async fn test_search_finds_match() {
        let (_dir, ctx) = setup_workspace();
        let output = SearchFiles.execute(json!({"pattern": "hello"}), &ctx).await.unwrap();
        assert!(output.contains("src/main.py:1: def hello():"), "{}", output);
        assert!(output.contains("src/main.py:2: print(\"Hello, world!\")"), "{}", output);
    }

    #[tokio::test]
    async fn test_search_no_matches() {
        let (_dir, ctx) = setup_workspace();
        let output = SearchFiles
            .execute(json!({"pattern": "zzz_not_present"}), &ctx)
            .await
            .unwrap();
        assert_eq!(output, NO_MATCHES);
    }

    #[tokio::test]
    async fn test_search_invalid_regex_is_literal() {
        let (dir, ctx) = setup_workspace();
        fs::write(dir.path().join("calc.py"), "value = compute(1\n").unwrap();
        let output = SearchFiles.execute(json!({"pattern": "COMPUTE("}), &ctx).await.unwrap();
        assert_eq!(output, "calc.py:1: value = compute(1");
    }

    #[tokio::test]
    async fn test_search_glob_filter() {
        let (_dir, ctx) = setup_workspace();
        let output = SearchFiles
            .execute(json!({"pattern": "project", "file_glob": "*.py"}), &ctx)
            .await
            .unwrap();
        assert_eq!(output, NO_MATCHES);

        let output = SearchFiles
            .execute(json!({"pattern": "project", "file_glob": "*.md"}), &ctx)
            .await
            .unwrap();
        assert!(output.starts_with("README.md:1:"));
    }

    #[tokio::test]
    async fn test_search_skips_hidden_and_binary() {
        let (dir, ctx) = setup_workspace();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/config"), "needle\n").unwrap();
        fs::write(dir.path().join(".env"), "needle\n").unwrap();
        fs::write(dir.path().join("blob.bin"), b"needle\0\x01\x02").unwrap();

        let output = SearchFiles.execute(json!({"pattern": "needle"}), &ctx).await.unwrap();
        assert_eq!(output, NO_MATCHES);
    }

    #[tokio::test]
    async fn test_search_truncates() {
        let (dir, ctx) = setup_workspace();
        let many: String = (0..80).map(|i| format!("match {}\n", i)).collect();
        fs::write(dir.path().join("many.txt"), many).unwrap();

        let output = SearchFiles.execute(json!({"pattern": "match"}), &ctx).await.unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), MAX_SEARCH_RESULTS + 1);
        assert_eq!(lines[MAX_SEARCH_RESULTS], "... (truncated at 50 matches)");
    }
}

mod delete_file_tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_file() {
        let (dir, ctx) = setup_workspace();
        let output = DeleteFile.execute(json!({"path": "README.md"}), &ctx).await.unwrap();
        assert_eq!(output, "Deleted README.md");
        assert!(!dir.path().join("README.md").exists());
    }

    #[tokio::test]
    async fn test_delete_directory_rejected() {
        let (dir, ctx) = setup_workspace();
        let err = DeleteFile.execute(json!({"path": "src"}), &ctx).await.unwrap_err();
        assert_eq!(
            rendered(err, "delete_file"),
            "Error: src is a directory. Use run_command to remove directories."
        );
        assert!(dir.path().join("src/main.py").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_and_escape() {
        let (_dir, ctx) = setup_workspace();
        let err = DeleteFile.execute(json!({"path": "gone.txt"}), &ctx).await.unwrap_err();
        assert_eq!(rendered(err, "delete_file"), "Error: File not found: gone.txt");

        let err = DeleteFile.execute(json!({"path": "../../etc/passwd"}), &ctx).await.unwrap_err();
        assert_eq!(err.kind(), "AccessDenied");
    }
}

mod sandbox_escape_tests {
    use super::*;

    #[tokio::test]
    async fn test_every_path_tool_denies_escape() {
        let (dir, ctx) = setup_workspace();
        let outside = TempDir::new().unwrap();
        let secret = outside.path().join("secret.txt");
        fs::write(&secret, "top secret").unwrap();
        let absolute = secret.to_string_lossy().to_string();

        let calls: Vec<(Box<dyn Tool>, serde_json::Value)> = vec![
            (Box::new(ReadFile), json!({"path": absolute})),
            (Box::new(WriteFile), json!({"path": absolute, "content": "pwned"})),
            (Box::new(EditFile), json!({"path": absolute, "old_string": "top", "new_string": "x"})),
            (Box::new(DeleteFile), json!({"path": absolute})),
            (Box::new(ListDirectory), json!({"path": "../"})),
        ];

        for (tool, args) in calls {
            let err = tool.execute(args, &ctx).await.unwrap_err();
            assert_eq!(err.kind(), "AccessDenied", "{}", tool.name());
        }
        assert_eq!(fs::read_to_string(&secret).unwrap(), "top secret");
        assert!(dir.path().join("README.md").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_workspace_is_not_followed() {
        let (dir, ctx) = setup_workspace();
        let outside = TempDir::new().unwrap();
        let secret = outside.path().join("secret.txt");
        fs::write(&secret, "top secret").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape")).unwrap();
        std::os::unix::fs::symlink(&secret, dir.path().join("secret_link")).unwrap();

        let calls: Vec<(Box<dyn Tool>, serde_json::Value)> = vec![
            (Box::new(WriteFile), json!({"path": "escape/new.txt", "content": "pwned"})),
            (Box::new(WriteFile), json!({"path": "escape/nested/new.txt", "content": "pwned"})),
            (Box::new(WriteFile), json!({"path": "secret_link", "content": "pwned"})),
            (Box::new(DeleteFile), json!({"path": "escape/secret.txt"})),
            (Box::new(DeleteFile), json!({"path": "secret_link"})),
        ];

        for (tool, args) in calls {
            let err = tool.execute(args.clone(), &ctx).await.unwrap_err();
            assert_eq!(err.kind(), "AccessDenied", "{} {}", tool.name(), args);
        }

        assert_eq!(fs::read_to_string(&secret).unwrap(), "top secret");
        assert!(!outside.path().join("new.txt").exists());
        assert!(!outside.path().join("nested").exists());
        assert!(dir.path().join("secret_link").exists());
    }
}
