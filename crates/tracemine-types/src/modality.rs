use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse cognitive classification of an action
///
/// Derived from the tool name (and optionally the outcome), never stored
/// alongside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// Probing, local, sequential (view, grep, ls)
    Touch,
    /// Broad, structural understanding (web search, page reads)
    Vision,
    /// Transformation and digestion (thinking out loud)
    Taste,
    /// Creation and expression (create, edit)
    Motor,
    /// Sensing state through action (execute, run)
    Proprio,
    /// Error detection; assigned to failed actions
    Pain,
    /// Fallback for tools with no known classification
    Unknown,
}

impl Modality {
    /// Every modality in one-hot order. The index of a modality in this
    /// slice is its embedding index in exports.
    pub const ALL: [Modality; 7] = [
        Modality::Touch,
        Modality::Vision,
        Modality::Taste,
        Modality::Motor,
        Modality::Proprio,
        Modality::Pain,
        Modality::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Touch => "touch",
            Modality::Vision => "vision",
            Modality::Taste => "taste",
            Modality::Motor => "motor",
            Modality::Proprio => "proprio",
            Modality::Pain => "pain",
            Modality::Unknown => "unknown",
        }
    }

    /// Position in [`Modality::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// One-hot encoding over [`Modality::ALL`]
    pub fn one_hot(&self) -> [f64; 7] {
        let mut v = [0.0; 7];
        v[self.index()] = 1.0;
        v
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a tool name by modality, ignoring the outcome.
///
/// Matching is case-insensitive. MCP-qualified names (`mcp__server__tool`)
/// and observer-wrapped names (`observed_tool`) are reduced to the bare tool
/// name first. Unknown tools map to [`Modality::Unknown`].
pub fn classify_tool(tool: &str) -> Modality {
    let lowered = tool.trim().to_ascii_lowercase();
    let name = bare_tool_name(&lowered);

    match name {
        "view" | "bash" | "bash_tool" | "read" | "grep" | "glob" | "find" | "ls" => {
            Modality::Touch
        }
        "read_page" | "web_search" | "web_fetch" => Modality::Vision,
        "think" => Modality::Taste,
        "create_file" | "file_create" | "str_replace" | "write" | "edit" => Modality::Motor,
        "execute" => Modality::Proprio,
        _ => Modality::Unknown,
    }
}

/// Coarse tool family used as a graph node feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    View,
    #[serde(rename = "bash_tool")]
    Bash,
    ReadPage,
    WebSearch,
    WebFetch,
    CreateFile,
    StrReplace,
    Execute,
    Unknown,
}

impl ToolType {
    /// Same normalization as [`classify_tool`]: case-insensitive, MCP and
    /// observer prefixes stripped.
    pub fn from_tool_name(tool: &str) -> Self {
        let lowered = tool.trim().to_ascii_lowercase();
        match bare_tool_name(&lowered) {
            "view" => ToolType::View,
            "bash" | "bash_tool" => ToolType::Bash,
            "read_page" => ToolType::ReadPage,
            "web_search" => ToolType::WebSearch,
            "web_fetch" => ToolType::WebFetch,
            "create_file" | "file_create" => ToolType::CreateFile,
            "str_replace" => ToolType::StrReplace,
            "execute" => ToolType::Execute,
            _ => ToolType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::View => "view",
            ToolType::Bash => "bash_tool",
            ToolType::ReadPage => "read_page",
            ToolType::WebSearch => "web_search",
            ToolType::WebFetch => "web_fetch",
            ToolType::CreateFile => "create_file",
            ToolType::StrReplace => "str_replace",
            ToolType::Execute => "execute",
            ToolType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn bare_tool_name(name: &str) -> &str {
    let name = match name.strip_prefix("mcp__") {
        Some(rest) => rest.split_once("__").map(|(_, tool)| tool).unwrap_or(rest),
        None => name,
    };
    name.strip_prefix("observed_").unwrap_or(name)
}

/// Maps actions to modalities.
///
/// `failure_as_pain` routes every failed action to [`Modality::Pain`]
/// regardless of tool; without it the outcome is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    pub failure_as_pain: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            failure_as_pain: true,
        }
    }
}

impl Classifier {
    pub fn new(failure_as_pain: bool) -> Self {
        Self { failure_as_pain }
    }

    /// Classifier that looks only at the tool name
    pub fn tool_only() -> Self {
        Self::new(false)
    }

    pub fn classify(&self, tool: &str, success: bool) -> Modality {
        if self.failure_as_pain && !success {
            return Modality::Pain;
        }
        classify_tool(tool)
    }
}
