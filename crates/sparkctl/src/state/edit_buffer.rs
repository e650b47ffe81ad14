//! Transient edit buffers.

use spark_model::Section;

use crate::editing::FieldTarget;

/// Text being edited, with a cursor.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
    multiline: bool,
}

impl TextBuffer {
    /// A one-line buffer seeded with `value`, cursor at the end.
    pub fn single_line(value: &str) -> Self {
        let line = value.replace(['\r', '\n'], " ");
        let col = line.chars().count();
        Self {
            lines: vec![line],
            row: 0,
            col,
            multiline: false,
        }
    }

    /// A multi-line buffer seeded with `text`, cursor at the start.
    pub fn multi_line(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            row: 0,
            col: 0,
            multiline: true,
        }
    }

    /// Buffer contents joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (row, column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(line) = self.lines.get_mut(self.row) {
            let at = Self::byte_index(line, self.col);
            line.insert(at, c);
            self.col += 1;
        }
    }

    /// Split the line at the cursor. Ignored in single-line buffers.
    pub fn insert_newline(&mut self) {
        if !self.multiline {
            return;
        }
        let Some(line) = self.lines.get_mut(self.row) else {
            return;
        };
        let at = Self::byte_index(line, self.col);
        let rest = line.split_off(at);
        // Carry the indentation over, YAML is indentation sensitive.
        let indent: String = line.chars().take_while(|c| *c == ' ').collect();
        self.row += 1;
        self.col = indent.chars().count();
        self.lines.insert(self.row, format!("{indent}{rest}"));
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            if let Some(line) = self.lines.get_mut(self.row) {
                let at = Self::byte_index(line, self.col - 1);
                line.remove(at);
                self.col -= 1;
            }
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            if let Some(prev) = self.lines.get_mut(self.row) {
                prev.push_str(&line);
            }
        }
    }

    pub fn delete(&mut self) {
        let len = self.line_len(self.row);
        if self.col < len {
            if let Some(line) = self.lines.get_mut(self.row) {
                let at = Self::byte_index(line, self.col);
                line.remove(at);
            }
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            if let Some(line) = self.lines.get_mut(self.row) {
                line.push_str(&next);
            }
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_len(self.row);
    }
}

/// The buffer of an edit in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditBuffer {
    /// Inline edit of one field.
    Field {
        target: FieldTarget,
        input: TextBuffer,
    },
    /// YAML editor for a section.
    Blob {
        section: Section,
        input: TextBuffer,
    },
}

impl EditBuffer {
    pub fn input(&self) -> &TextBuffer {
        match self {
            Self::Field { input, .. } | Self::Blob { input, .. } => input,
        }
    }

    pub fn input_mut(&mut self) -> &mut TextBuffer {
        match self {
            Self::Field { input, .. } | Self::Blob { input, .. } => input,
        }
    }

    /// Whether this is an inline field edit.
    pub fn is_field(&self) -> bool {
        matches!(self, Self::Field { .. })
    }
}
