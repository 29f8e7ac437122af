use tracing::error;

use crate::diary_entry::{DiaryEntry, MOOD_OPTIONS};
use crate::entry_store::{EntryKey, EntryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Content,
    Mood,
    Tags,
}

impl EditorField {
    pub fn next(self) -> EditorField {
        match self {
            EditorField::Title => EditorField::Content,
            EditorField::Content => EditorField::Mood,
            EditorField::Mood => EditorField::Tags,
            EditorField::Tags => EditorField::Title,
        }
    }

    pub fn prev(self) -> EditorField {
        match self {
            EditorField::Title => EditorField::Tags,
            EditorField::Content => EditorField::Title,
            EditorField::Mood => EditorField::Content,
            EditorField::Tags => EditorField::Mood,
        }
    }
}

/// How an editor session ended. Cancelled leaves the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    Saved,
    Deleted,
    Cancelled,
}

/// One day's entry being edited. All edits land in the draft; the store is
/// only touched by `save` and `delete`.
pub struct EntryEditor {
    pub key: EntryKey,
    pub draft: DiaryEntry,
    pub field: EditorField,
    pub tag_input: String,
    pub selected_tag: usize,
    /// Non-fatal notification shown in the dialog (e.g. a failed save).
    pub notice: Option<String>,
    had_entry: bool,
}

impl EntryEditor {
    /// Open the editor for `key`: the draft is the stored record on a hit,
    /// an empty entry on a miss.
    pub fn open(store: &EntryStore, key: EntryKey) -> Self {
        let (draft, had_entry) = match store.load(&key) {
            Some(entry) => (entry, true),
            None => (DiaryEntry::default(), false),
        };
        EntryEditor {
            key,
            draft,
            field: EditorField::Title,
            tag_input: String::new(),
            selected_tag: 0,
            notice: None,
            had_entry,
        }
    }

    /// Whether a record existed when the editor opened. Drives the cell's
    /// has-entry marker when the session is cancelled.
    pub fn had_entry(&self) -> bool {
        self.had_entry
    }

    pub fn focus_next(&mut self) {
        self.field = self.field.next();
    }

    pub fn focus_prev(&mut self) {
        self.field = self.field.prev();
    }

    pub fn insert_char(&mut self, c: char) {
        match self.field {
            EditorField::Title => self.draft.title.push(c),
            EditorField::Content => self.draft.content.push(c),
            EditorField::Tags => self.tag_input.push(c),
            EditorField::Mood => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            EditorField::Title => {
                self.draft.title.pop();
            }
            EditorField::Content => {
                self.draft.content.pop();
            }
            EditorField::Tags => {
                self.tag_input.pop();
            }
            EditorField::Mood => {}
        }
    }

    pub fn newline(&mut self) {
        if self.field == EditorField::Content {
            self.draft.content.push('\n');
        }
    }

    /// Step the mood through unset followed by the fixed labels, wrapping.
    pub fn cycle_mood(&mut self, delta: i32) {
        let slots = MOOD_OPTIONS.len() as i32 + 1;
        let current = MOOD_OPTIONS
            .iter()
            .position(|m| *m == self.draft.mood)
            .map(|i| i as i32 + 1)
            .unwrap_or(0);
        let next = (current + delta).rem_euclid(slots);
        self.draft.mood = if next == 0 {
            String::new()
        } else {
            MOOD_OPTIONS[next as usize - 1].to_string()
        };
    }

    /// Add the typed tag to the draft. The input is cleared only when the
    /// tag was actually added, so a duplicate stays visible for correction.
    pub fn commit_tag(&mut self) {
        let tag = self.tag_input.trim().to_string();
        if self.draft.add_tag(&tag) {
            self.tag_input.clear();
            self.selected_tag = self.draft.tags.len() - 1;
        }
    }

    pub fn select_tag(&mut self, delta: i32) {
        if self.draft.tags.is_empty() {
            return;
        }
        let last = self.draft.tags.len() as i32 - 1;
        self.selected_tag = (self.selected_tag as i32 + delta).clamp(0, last) as usize;
    }

    pub fn remove_selected_tag(&mut self) {
        if let Some(tag) = self.draft.tags.get(self.selected_tag).cloned() {
            self.draft.remove_tag(&tag);
            if self.selected_tag >= self.draft.tags.len() && self.selected_tag > 0 {
                self.selected_tag -= 1;
            }
        }
    }

    /// Commit the draft wholesale. On failure the draft is kept and a
    /// notification is recorded; the session stays open.
    pub fn save(&mut self, store: &mut EntryStore) -> bool {
        match store.save(&self.key, &self.draft) {
            Ok(()) => {
                self.had_entry = true;
                true
            }
            Err(e) => {
                error!(key = %self.key.storage_key(), error = %e, "save failed");
                self.notice = Some(format!("Save failed: {e}"));
                false
            }
        }
    }

    /// Clear this day's record entirely.
    pub fn delete(&mut self, store: &mut EntryStore) -> bool {
        match store.delete(&self.key) {
            Ok(_) => {
                self.had_entry = false;
                true
            }
            Err(e) => {
                error!(key = %self.key.storage_key(), error = %e, "delete failed");
                self.notice = Some(format!("Delete failed: {e}"));
                false
            }
        }
    }
}
