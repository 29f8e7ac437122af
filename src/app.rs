use std::collections::HashSet;

use chrono::{Datelike, Local};

use crate::calendar::{days_in_month, enumerate_days};
use crate::entry_store::{EntryKey, EntryStore};
use crate::navigator::SelectedDate;

/// Days are laid out seven to a row, as on the calendar screen.
pub const GRID_COLUMNS: u32 = 7;

pub struct App {
    pub selected: SelectedDate,
    pub cursor_day: u32,
    /// Days of the visible month that have a stored record.
    pub filled: HashSet<u32>,
    /// Transient one-line notification, cleared on the next action.
    pub status: Option<String>,
}

impl App {
    pub fn new(store: &EntryStore) -> Self {
        let today = Local::now().date_naive();
        let selected = SelectedDate {
            year: today.year(),
            month: today.month0(),
        };
        let mut app = App {
            selected,
            cursor_day: today.day(),
            filled: HashSet::new(),
            status: None,
        };
        app.refresh_markers(store);
        app
    }

    /// Adopt a month chosen in the picker: cursor back to day 1, markers
    /// recomputed for the new month.
    pub fn set_month(&mut self, selected: SelectedDate, store: &EntryStore) {
        self.selected = selected;
        self.cursor_day = 1;
        self.refresh_markers(store);
    }

    pub fn refresh_markers(&mut self, store: &EntryStore) {
        self.filled = enumerate_days(self.selected.year, self.selected.month)
            .filter(|day| store.contains(&self.key_for(*day)))
            .collect();
    }

    pub fn key_for(&self, day: u32) -> EntryKey {
        EntryKey::new(self.selected.year, self.selected.month, day)
    }

    pub fn cursor_key(&self) -> EntryKey {
        self.key_for(self.cursor_day)
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.selected.year, self.selected.month)
    }

    /// Move the cursor across the 7-wide grid, clamped to the month.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let last = self.days() as i32;
        let next = self.cursor_day as i32 + dx + dy * GRID_COLUMNS as i32;
        self.cursor_day = next.clamp(1, last) as u32;
    }

    pub fn mark_saved(&mut self) {
        self.filled.insert(self.cursor_day);
    }

    pub fn mark_cleared(&mut self) {
        self.filled.remove(&self.cursor_day);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary_entry::DiaryEntry;
    use tempfile::tempdir;

    fn open_store(dir: &tempfile::TempDir) -> EntryStore {
        EntryStore::open(dir.path().join("diary_entries.json")).unwrap()
    }

    #[test]
    fn set_month_resets_cursor_and_markers() {
        let dir = tempdir().unwrap();
        let mut store = open_store(&dir);
        let june_2030 = SelectedDate {
            year: 2030,
            month: 5,
        };
        store
            .save(
                &EntryKey::new(2030, 5, 12),
                &DiaryEntry {
                    title: "t".into(),
                    ..DiaryEntry::default()
                },
            )
            .unwrap();

        let mut app = App::new(&store);
        app.cursor_day = app.days().min(20);
        app.set_month(june_2030, &store);
        assert_eq!(app.selected, june_2030);
        assert_eq!(app.cursor_day, 1);
        assert_eq!(app.filled, HashSet::from([12]));
    }

    #[test]
    fn cursor_clamps_to_month_bounds() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let mut app = App::new(&store);
        app.set_month(
            SelectedDate {
                year: 2024,
                month: 1,
            },
            &store,
        );

        app.move_cursor(-1, 0);
        assert_eq!(app.cursor_day, 1);
        app.move_cursor(0, -1);
        assert_eq!(app.cursor_day, 1);
        app.cursor_day = 28;
        app.move_cursor(0, 1);
        assert_eq!(app.cursor_day, 29);
        app.move_cursor(1, 0);
        assert_eq!(app.cursor_day, 29);
    }

    #[test]
    fn grid_rows_move_by_seven() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let mut app = App::new(&store);
        app.set_month(
            SelectedDate {
                year: 2025,
                month: 2,
            },
            &store,
        );
        app.cursor_day = 10;
        app.move_cursor(0, 1);
        assert_eq!(app.cursor_day, 17);
        app.move_cursor(0, -1);
        assert_eq!(app.cursor_day, 10);
    }

    #[test]
    fn markers_follow_saves_and_clears() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let mut app = App::new(&store);
        app.cursor_day = 3;
        app.mark_saved();
        assert!(app.filled.contains(&3));
        app.mark_cleared();
        assert!(!app.filled.contains(&3));
    }
}
