//! Syntax highlighting for JSON output.

use once_cell::sync::Lazy;
use syntect::{
    easy::HighlightLines,
    highlighting::{Style, Theme, ThemeSet},
    parsing::{SyntaxReference, SyntaxSet},
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};

use crate::error::{ApiDocError, Result};

/// Lazily loaded syntect syntax definitions including newline handling.
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
/// Shared theme catalog for syntax highlighting.
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);
/// Cached lookup for the JSON syntax definition.
static JSON_SYNTAX: Lazy<Option<&'static SyntaxReference>> =
    Lazy::new(|| SYNTAX_SET.find_syntax_by_extension("json"));
/// Theme used for highlighting output.
static SOLARIZED_THEME: Lazy<Option<&'static Theme>> =
    Lazy::new(|| THEME_SET.themes.get("Solarized (dark)"));

/// Applies syntax highlighting to JSON text using the Solarized (dark) theme.
///
/// Returns the text with ANSI escape codes for terminal color output.
pub fn highlight_json(json: &str) -> Result<String> {
    let syntax = *JSON_SYNTAX
        .as_ref()
        .ok_or_else(|| ApiDocError::Highlight("JSON syntax not found".to_string()))?;
    let theme = *SOLARIZED_THEME
        .as_ref()
        .ok_or_else(|| ApiDocError::Highlight("Solarized (dark) theme not found".to_string()))?;
    let mut h = HighlightLines::new(syntax, theme);

    let mut output = String::new();
    for line in LinesWithEndings::from(json) {
        let ranges: Vec<(Style, &str)> = h.highlight_line(line, &SYNTAX_SET)?;
        output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
    }
    // Reset so the terminal does not inherit the last color.
    output.push_str("\x1b[0m");
    Ok(output)
}
