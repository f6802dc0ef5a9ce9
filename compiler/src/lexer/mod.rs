use regex::Regex;
use crate::config::CompilerConfig;
use crate::error::{CompileError, CompileResult};

/// One meaningful line of source: its whitespace-separated tokens and the
/// 1-based line number it came from.
///
/// Blank and comment-only lines never become a `SourceLine`, so the position
/// of a `SourceLine` in the lexer's output is its instruction index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    number: usize,
    tokens: Vec<String>,
}

impl SourceLine {
    /// `None` when there are no tokens; every `SourceLine` has a mnemonic
    pub fn new(number: usize, tokens: Vec<String>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Self { number, tokens })
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn mnemonic(&self) -> &str {
        &self.tokens[0]
    }

    pub fn operands(&self) -> &[String] {
        &self.tokens[1..]
    }
}

pub struct Lexer {
    comment: Regex,
}

impl Lexer {
    pub fn new(config: &CompilerConfig) -> CompileResult<Self> {
        if config.comment_marker.trim().is_empty() {
            return Err(CompileError::Config("comment marker must not be empty".to_string()));
        }

        let pattern = format!("{}.*$", regex::escape(&config.comment_marker));
        let comment = Regex::new(&pattern).map_err(|e| CompileError::Config(e.to_string()))?;
        Ok(Self { comment })
    }

    /// Split source text into meaningful lines
    pub fn tokenize(&self, source: &str) -> Vec<SourceLine> {
        self.tokenize_lines(source.lines())
    }

    /// Split an ordered sequence of raw lines into meaningful lines
    pub fn tokenize_lines<I, S>(&self, lines: I) -> Vec<SourceLine>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .enumerate()
            .filter_map(|(i, raw)| {
                let code = self.comment.replace(raw.as_ref(), "");
                let tokens = code.split_whitespace().map(str::to_string).collect();
                SourceLine::new(i + 1, tokens)
            })
            .collect()
    }
}
