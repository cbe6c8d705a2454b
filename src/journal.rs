use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CreateEntryPayload, JournalEntry, Mood, UpdateEntryPayload};

/// In-memory journal. Entries are held newest-first; nothing is persisted
/// across restarts.
#[derive(Debug, Default)]
pub struct JournalStore {
    entries: Vec<JournalEntry>,
}

impl JournalStore {
    pub fn new() -> Self {
        JournalStore::default()
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Creates an entry with a fresh id and the current timestamp and puts
    /// it at the front of the list.
    pub fn create(&mut self, payload: CreateEntryPayload) -> Result<JournalEntry, ApiError> {
        if payload.title.trim().is_empty() {
            return Err(ApiError::Validation("title cannot be empty".into()));
        }
        if payload.content.trim().is_empty() {
            return Err(ApiError::Validation("content cannot be empty".into()));
        }

        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            title: payload.title,
            content: payload.content,
            date: Utc::now(),
            tags: payload.tags.unwrap_or_default(),
            mood: payload.mood.unwrap_or_default(),
        };
        self.entries.insert(0, entry.clone());
        Ok(entry)
    }

    /// Replaces the fields present in the payload. Identity and creation
    /// date are preserved, as is any field the payload leaves unset.
    pub fn update(
        &mut self,
        id: &str,
        payload: UpdateEntryPayload,
    ) -> Result<JournalEntry, ApiError> {
        if let Some(title) = &payload.title {
            if title.trim().is_empty() {
                return Err(ApiError::Validation("title cannot be empty".into()));
            }
        }
        if let Some(content) = &payload.content {
            if content.trim().is_empty() {
                return Err(ApiError::Validation("content cannot be empty".into()));
            }
        }

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ApiError::NotFound)?;

        if let Some(title) = payload.title {
            entry.title = title;
        }
        if let Some(content) = payload.content {
            entry.content = content;
        }
        if let Some(tags) = payload.tags {
            entry.tags = tags;
        }
        if let Some(mood) = payload.mood {
            entry.mood = mood;
        }
        Ok(entry.clone())
    }

    /// Removes the entry if present. Deleting an absent id is a no-op, not
    /// an error.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Conjunction of three independently optional predicates: free-text
    /// search over title/content, tag overlap, and calendar-date equality.
    pub fn filter(
        &self,
        search: &str,
        tags: &[String],
        date: Option<NaiveDate>,
    ) -> Vec<JournalEntry> {
        let needle = search.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                let matches_search = needle.is_empty()
                    || e.title.to_lowercase().contains(&needle)
                    || e.content.to_lowercase().contains(&needle);
                let matches_tags =
                    tags.is_empty() || e.tags.iter().any(|t| tags.iter().any(|f| f == t));
                let matches_date = date.is_none_or(|d| e.date.date_naive() == d);
                matches_search && matches_tags && matches_date
            })
            .cloned()
            .collect()
    }

    /// Distinct tags across all entries, sorted.
    pub fn tags_in_use(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .entries
            .iter()
            .flat_map(|e| e.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Seeds the sample reflections shown on first load. Used by the binary
    /// only; tests start from an empty store.
    pub fn seed_samples(&mut self) {
        let samples = [
            (
                "Morning Reflections",
                "Woke up feeling refreshed today. Spent 20 minutes meditating before the kids \
                 woke up. It's amazing how those quiet moments set the tone for my entire day.",
                vec!["#selfcare".to_string()],
                Mood::Happy,
                (2024, 12, 4),
            ),
            (
                "Balancing Act",
                "Today was challenging at work, but I managed to take a 10-minute walk during \
                 lunch. Called mom after dinner and it filled my heart.",
                vec!["#work".to_string(), "#family".to_string()],
                Mood::Calm,
                (2024, 12, 3),
            ),
            (
                "Weekend Self-Care",
                "Finally took that bubble bath I've been promising myself. My body was telling \
                 me to slow down and I actually listened. Small wins matter.",
                vec!["#selfcare".to_string()],
                Mood::Loved,
                (2024, 12, 1),
            ),
        ];

        for (title, content, tags, mood, (y, m, d)) in samples {
            let date = Utc
                .with_ymd_and_hms(y, m, d, 9, 0, 0)
                .single()
                .unwrap_or_else(Utc::now);
            self.entries.push(JournalEntry {
                id: Uuid::new_v4().to_string(),
                title: title.to_string(),
                content: content.to_string(),
                date,
                tags,
                mood,
            });
        }
    }
}
