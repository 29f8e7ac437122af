use serde::{Deserialize, Serialize};

/// Mood labels offered by the editor, in display order. The empty string
/// stands for "no mood set".
pub const MOOD_OPTIONS: [&str; 5] = [
    "😊 Happy",
    "😐 Neutral",
    "😢 Sad",
    "😠 Angry",
    "😌 Relaxed",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DiaryEntry {
    /// Append a tag unless it is empty or already present (exact match).
    /// Returns whether the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove a tag by exact match; removing an absent tag is a no-op.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.content.is_empty()
            && self.mood.is_empty()
            && self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_tag_dedups_exact_match() {
        let mut entry = DiaryEntry::default();
        assert!(entry.add_tag("work"));
        assert!(!entry.add_tag("work"));
        assert_eq!(entry.tags, vec!["work"]);
        // dedup is case-sensitive
        assert!(entry.add_tag("Work"));
        assert_eq!(entry.tags, vec!["work", "Work"]);
    }

    #[test]
    fn add_empty_tag_is_noop() {
        let mut entry = DiaryEntry::default();
        assert!(!entry.add_tag(""));
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn remove_tag_keeps_order_of_rest() {
        let mut entry = DiaryEntry::default();
        entry.add_tag("a");
        entry.add_tag("b");
        entry.add_tag("c");
        entry.remove_tag("b");
        assert_eq!(entry.tags, vec!["a", "c"]);
        entry.remove_tag("missing");
        assert_eq!(entry.tags, vec!["a", "c"]);
    }

    #[test]
    fn empty_means_every_field_unset() {
        let mut entry = DiaryEntry::default();
        assert!(entry.is_empty());
        entry.mood = MOOD_OPTIONS[0].to_string();
        assert!(!entry.is_empty());
    }

    #[test]
    fn serde_round_trip_preserves_tag_order() {
        let entry = DiaryEntry {
            title: "a day".into(),
            content: "some thoughts".into(),
            mood: "😌 Relaxed".into(),
            tags: vec!["z".into(), "a".into(), "m".into()],
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: DiaryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn missing_fields_deserialize_as_defaults() {
        let back: DiaryEntry = serde_json::from_str(r#"{"title":"only"}"#).unwrap();
        assert_eq!(back.title, "only");
        assert_eq!(back.content, "");
        assert_eq!(back.mood, "");
        assert!(back.tags.is_empty());
    }
}
