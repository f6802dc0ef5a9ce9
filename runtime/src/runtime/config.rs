//! Runtime configuration options

/// Configuration options for the stackvm runtime
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub debug_mode: bool,
    pub stack_trace: bool,
    pub instruction_limit: Option<u64>,
    pub echo_output: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            stack_trace: false,
            instruction_limit: None,
            echo_output: false,
        }
    }
}

impl RuntimeConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable debug mode
    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    /// Enable or disable stack trace
    pub fn with_stack_trace(mut self, stack_trace: bool) -> Self {
        self.stack_trace = stack_trace;
        self
    }

    /// Bound the number of instructions a single execution may run
    pub fn with_instruction_limit(mut self, limit: Option<u64>) -> Self {
        self.instruction_limit = limit;
        self
    }

    /// Write printed values to stdout as they are produced
    pub fn with_echo_output(mut self, echo_output: bool) -> Self {
        self.echo_output = echo_output;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::new();
        assert!(!config.debug_mode);
        assert!(!config.stack_trace);
        assert_eq!(config.instruction_limit, None);
        assert!(!config.echo_output);
    }

    #[test]
    fn test_builder_chain() {
        let config = RuntimeConfig::default()
            .with_debug_mode(true)
            .with_stack_trace(true)
            .with_instruction_limit(Some(500))
            .with_echo_output(true);

        assert!(config.debug_mode);
        assert!(config.stack_trace);
        assert_eq!(config.instruction_limit, Some(500));
        assert!(config.echo_output);
    }
}
