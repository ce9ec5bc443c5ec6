//! Plain file reading tool.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use super::base_tool::{BaseTool, ToolError};
use super::tool_types::ToolCategory;

/// Reads a text file.
///
/// When constructed with a fixed path, the request may be `null`. Otherwise
/// the request must be `{"file_path": "<path>"}`; a path in the request
/// overrides the fixed one.
#[derive(Debug, Clone)]
pub struct FileReadTool {
    name: String,
    file_path: Option<PathBuf>,
    description: String,
}

impl FileReadTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_path: None,
            description: "Reads the content of a file given its path.".to_string(),
        }
    }

    /// Bind the tool to a single file.
    pub fn with_file_path(mut self, file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        self.description = format!("Reads the content of {}.", file_path.display());
        self.file_path = Some(file_path);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn requested_path(&self, request: &Value) -> Result<PathBuf, ToolError> {
        match request.get("file_path") {
            Some(Value::String(path)) => Ok(PathBuf::from(path)),
            Some(other) => Err(ToolError::InvalidRequest(format!(
                "file_path must be a string, got {}",
                other
            ))),
            None => self.file_path.clone().ok_or_else(|| {
                ToolError::InvalidRequest("missing file_path".to_string())
            }),
        }
    }
}

impl BaseTool for FileReadTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ToolCategory {
        ToolCategory::FileRead
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn invoke(&self, request: Value) -> Result<Value, ToolError> {
        let path = self.requested_path(&request)?;
        log::debug!("Reading file {}", path.display());
        fs::read_to_string(&path)
            .map(Value::String)
            .map_err(|e| ToolError::Failed(format!("failed to read {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_fixed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.md");
        fs::write(&path, "# Ada Lovelace").unwrap();

        let tool = FileReadTool::new("read_resume").with_file_path(&path);
        assert_eq!(tool.invoke(Value::Null).unwrap(), json!("# Ada Lovelace"));
        assert_eq!(tool.category(), ToolCategory::FileRead);
    }

    #[test]
    fn test_request_path_overrides_fixed_file() {
        let dir = tempfile::tempdir().unwrap();
        let other = dir.path().join("other.txt");
        fs::write(&other, "other").unwrap();

        let tool = FileReadTool::new("read").with_file_path(dir.path().join("missing.txt"));
        let result = tool
            .invoke(json!({ "file_path": other.to_string_lossy() }))
            .unwrap();
        assert_eq!(result, json!("other"));
    }

    #[test]
    fn test_missing_path_is_invalid_request() {
        let tool = FileReadTool::new("read");
        assert!(matches!(
            tool.invoke(Value::Null),
            Err(ToolError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_unreadable_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FileReadTool::new("read").with_file_path(dir.path().join("nope.txt"));
        assert!(matches!(tool.invoke(Value::Null), Err(ToolError::Failed(_))));
    }
}
