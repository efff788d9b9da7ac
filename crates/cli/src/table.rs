//! Fixed-width text tables for the human (stderr) output.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Fit `s` into exactly `width` display columns: pad short text, cut long text with "..".
pub(crate) fn fit(s: &str, width: usize) -> String {
    let sw = UnicodeWidthStr::width(s);
    if sw <= width {
        return format!("{s}{}", " ".repeat(width - sw));
    }
    if width < 3 {
        return ".".repeat(width);
    }

    let budget = width - 2;
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    out.push_str("..");
    out.push_str(&" ".repeat(width - used - 2));
    out
}

/// Columns of a table, each with a header and a max width.
pub(crate) struct Table {
    headers: Vec<(&'static str, usize)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(crate) fn new(headers: &[(&'static str, usize)]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Render with each column sized to its widest cell, capped at the column max.
    pub(crate) fn render(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, (title, max))| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| UnicodeWidthStr::width(c.as_str()))
                    .chain(std::iter::once(title.len()))
                    .max()
                    .unwrap_or(0)
                    .min(*max)
            })
            .collect();

        let mut out = String::new();
        let line = |cells: Vec<&str>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| fit(c, *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };
        out.push_str(&line(self.headers.iter().map(|(t, _)| *t).collect()));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row.iter().map(String::as_str).collect()));
            out.push('\n');
        }
        out
    }
}
