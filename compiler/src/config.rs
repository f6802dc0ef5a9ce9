//! Compiler configuration options

/// Comment marker used when none is configured
pub const DEFAULT_COMMENT_MARKER: &str = ";";

/// Configuration options for the compiler
#[derive(Clone, Debug)]
pub struct CompilerConfig {
    /// Everything from this marker to the end of a line is ignored
    pub comment_marker: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            comment_marker: DEFAULT_COMMENT_MARKER.to_string(),
        }
    }
}

impl CompilerConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comment marker
    pub fn with_comment_marker(mut self, marker: impl Into<String>) -> Self {
        self.comment_marker = marker.into();
        self
    }
}
