//! Tool category metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of capability a tool provides. Metadata only: the orchestrator never
/// changes behaviour based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Search,
    Scrape,
    FileRead,
    SemanticDocumentSearch,
    CodeSearch,
    Other,
}

impl Default for ToolCategory {
    fn default() -> Self {
        ToolCategory::Other
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Scrape => write!(f, "scrape"),
            Self::FileRead => write!(f, "file_read"),
            Self::SemanticDocumentSearch => write!(f, "semantic_document_search"),
            Self::CodeSearch => write!(f, "code_search"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde_name() {
        for category in [
            ToolCategory::Search,
            ToolCategory::FileRead,
            ToolCategory::SemanticDocumentSearch,
        ] {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.to_string());
        }
    }
}
