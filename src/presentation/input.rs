//! Single-line draft editing
//!
//! The draft text itself lives in the session state; this only tracks the
//! cursor and computes the edited text, which goes back as `DraftChanged`.

/// Byte-offset cursor into the draft
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DraftCursor {
    cursor: usize,
}

impl DraftCursor {
    /// Keep the cursor valid after the draft changed underneath it
    pub fn sync(&mut self, draft: &str) {
        if self.cursor > draft.len() || !draft.is_char_boundary(self.cursor) {
            self.cursor = draft.len();
        }
    }

    pub fn insert_char(&mut self, draft: &str, ch: char) -> String {
        self.sync(draft);
        let mut text = draft.to_string();
        text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        text
    }

    pub fn insert_str(&mut self, draft: &str, insert: &str) -> String {
        self.sync(draft);
        let mut text = draft.to_string();
        // Newlines would break the single-line composer
        let insert: String = insert.chars().filter(|c| !c.is_control()).collect();
        text.insert_str(self.cursor, &insert);
        self.cursor += insert.len();
        text
    }

    pub fn backspace(&mut self, draft: &str) -> Option<String> {
        self.sync(draft);
        let len = prev_char_len(draft, self.cursor);
        if len == 0 {
            return None;
        }
        self.cursor -= len;
        let mut text = draft.to_string();
        text.drain(self.cursor..self.cursor + len);
        Some(text)
    }

    pub fn delete(&mut self, draft: &str) -> Option<String> {
        self.sync(draft);
        let len = next_char_len(draft, self.cursor);
        if len == 0 {
            return None;
        }
        let mut text = draft.to_string();
        text.drain(self.cursor..self.cursor + len);
        Some(text)
    }

    pub fn move_left(&mut self, draft: &str) {
        self.sync(draft);
        self.cursor -= prev_char_len(draft, self.cursor);
    }

    pub fn move_right(&mut self, draft: &str) {
        self.sync(draft);
        self.cursor += next_char_len(draft, self.cursor);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self, draft: &str) {
        self.cursor = draft.len();
    }

    /// Number of characters before the cursor
    pub fn column(&self, draft: &str) -> usize {
        draft.get(..self.cursor).map_or_else(
            || draft.chars().count(),
            |before| before.chars().count(),
        )
    }
}

fn prev_char_len(text: &str, cursor: usize) -> usize {
    text.get(..cursor)
        .and_then(|before| before.chars().next_back())
        .map_or(0, char::len_utf8)
}

fn next_char_len(text: &str, cursor: usize) -> usize {
    text.get(cursor..)
        .and_then(|after| after.chars().next())
        .map_or(0, char::len_utf8)
}
