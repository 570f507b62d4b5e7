//! Program text loader.
//!
//! LS-8 programs are plain text, one byte per line written as an 8-digit binary
//! literal. Anything after `#` is a comment; blank and comment-only lines are
//! skipped.
//!
//! ```text
//! # Print the number 8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```
//!
//! Riddles handed out by the game server carry a fixed text preamble before the
//! program; [`LoaderConfig::skip_lines`] drops it.

use std::path::Path;

use tracing::debug;

use crate::{LoadError, MEMORY_SIZE};

/// Loader options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Number of leading lines to ignore before parsing.
    pub skip_lines: usize,
}

/// Parses program text into a memory image.
///
/// # Examples
///
/// ```
/// let image = ls8::loader::parse_program("10000010 # LDI\n\n# comment\n00000001\n").unwrap();
/// assert_eq!(image, vec![0b1000_0010, 0b0000_0001]);
/// ```
pub fn parse_program(source: &str) -> Result<Vec<u8>, LoadError> {
    parse_program_with(source, &LoaderConfig::default())
}

/// Parses program text with explicit options.
///
/// Line numbers in errors count from 1 and include skipped lines.
pub fn parse_program_with(source: &str, config: &LoaderConfig) -> Result<Vec<u8>, LoadError> {
    let mut image = Vec::new();

    for (index, line) in source.lines().enumerate().skip(config.skip_lines) {
        let code = line.split('#').next().unwrap_or_default().trim();
        if code.is_empty() {
            continue;
        }

        let byte = parse_literal(code).ok_or_else(|| LoadError::InvalidLiteral {
            line: index + 1,
            text: code.to_string(),
        })?;

        if image.len() == MEMORY_SIZE {
            return Err(LoadError::ProgramTooLarge {
                len: image.len() + 1,
            });
        }
        image.push(byte);
    }

    debug!(bytes = image.len(), skipped = config.skip_lines, "parsed program");
    Ok(image)
}

/// Reads and parses a program file.
pub fn load_file(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_program_with(&source, config)
}

/// Exactly eight `0`/`1` characters.
fn parse_literal(text: &str) -> Option<u8> {
    if text.len() != 8 || !text.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    u8::from_str_radix(text, 2).ok()
}
