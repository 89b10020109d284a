//! Line scanner
//!
//! A cursor over the lines of a description. It knows about blank lines, comment
//! lines, `keyword: value` splitting, bracketed lists spanning several lines and
//! backtick-fenced raw blocks, but nothing about the grammar itself. None of its
//! operations fail; running off the end of the input yields `None`.

/// A `keyword: value` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldLine<'a> {
    /// 1-based line number
    pub line: usize,
    pub keyword: &'a str,
    pub value: &'a str,
    /// True when the keyword starts at column 0
    pub at_line_start: bool,
}

/// Cursor over the lines of a source text
#[derive(Debug)]
pub(crate) struct Scanner<'a> {
    lines: Vec<&'a str>,
    index: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            index: 0,
        }
    }

    /// Returns true for lines whose first non-whitespace character is `-`
    pub fn is_comment(line: &str) -> bool {
        line.trim_start().starts_with('-')
    }

    fn skip_ignorable(&mut self) {
        while let Some(line) = self.lines.get(self.index) {
            if line.trim().is_empty() || Self::is_comment(line) {
                self.index += 1;
            } else {
                break;
            }
        }
    }

    /// Skips blank and comment lines and returns the next meaningful line without consuming it
    pub fn peek_line(&mut self) -> Option<(usize, &'a str)> {
        self.skip_ignorable();
        self.lines.get(self.index).map(|line| (self.index + 1, *line))
    }

    /// Consumes the line under the cursor
    pub fn advance(&mut self) {
        if self.index < self.lines.len() {
            self.index += 1;
        }
    }

    /// Splits a line at its first `:` into a trimmed keyword and a trimmed value
    pub fn split_field(line: usize, text: &'a str) -> Option<FieldLine<'a>> {
        let (keyword, value) = text.split_once(':')?;
        Some(FieldLine {
            line,
            keyword: keyword.trim(),
            value: value.trim(),
            at_line_start: !text.starts_with(char::is_whitespace),
        })
    }

    /// Collects the contents of a bracketed list
    ///
    /// `text` must start with `[`. If the closing `]` is not on the same line, the
    /// following lines are consumed until one contains it; comment lines in between
    /// are dropped and the remaining lines are joined with `\n`.
    ///
    /// # Returns
    /// The text between the brackets and whatever follows the closing bracket, or
    /// `None` if the input ends before the list is closed
    pub fn collect_bracketed(&mut self, text: &'a str) -> Option<(String, &'a str)> {
        let opened = text.strip_prefix('[')?;
        if let Some((inner, rest)) = opened.split_once(']') {
            return Some((inner.to_string(), rest));
        }

        let mut inner = opened.to_string();
        while let Some(line) = self.lines.get(self.index).copied() {
            self.index += 1;
            if Self::is_comment(line) {
                continue;
            }
            inner.push('\n');
            if let Some((last, rest)) = line.split_once(']') {
                inner.push_str(last);
                return Some((inner, rest));
            }
            inner.push_str(line);
        }

        None
    }

    /// Captures a raw block up to the next line starting with a backtick
    ///
    /// The opening fence must already be consumed. Every captured line is kept
    /// verbatim and terminated with `\n`; the closing fence line is consumed.
    ///
    /// # Returns
    /// The captured text, or `None` if no closing fence exists
    pub fn capture_fenced(&mut self) -> Option<String> {
        let mut captured = String::new();
        while let Some(line) = self.lines.get(self.index).copied() {
            self.index += 1;
            if line.trim_start().starts_with('`') {
                return Some(captured);
            }
            captured.push_str(line);
            captured.push('\n');
        }

        None
    }
}
