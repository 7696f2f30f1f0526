//! Core catalog domain types

use serde::{Deserialize, Serialize};

/// Content category of a stored audio item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Quran recitation, grouped by narrator
    #[serde(rename = "quran")]
    Recitation,
    /// Standalone lecture
    Lecture,
}

impl Category {
    /// Storage string used in the `type` column of the audio table
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Recitation => "quran",
            Category::Lecture => "lecture",
        }
    }
}

/// A single stored audio item
///
/// `(category, narrator, title)` is unique, and so is `file_id` — an
/// opaque reference the transport resolves to the actual media blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioItem {
    pub category: Category,
    pub narrator: String,
    pub title: String,
    pub file_id: String,
}

/// A lecture catalog entry: title plus the narrator who delivered it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LectureEntry {
    pub title: String,
    pub narrator: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_storage_strings() {
        assert_eq!(Category::Recitation.as_str(), "quran");
        assert_eq!(Category::Lecture.as_str(), "lecture");
    }

    #[test]
    fn test_category_serde() {
        for (v, expected) in [
            (Category::Recitation, "\"quran\""),
            (Category::Lecture, "\"lecture\""),
        ] {
            let json = serde_json::to_string(&v).unwrap();
            assert_eq!(json, expected);
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, v);
        }
    }

    #[test]
    fn test_audio_item_roundtrip() {
        let item = AudioItem {
            category: Category::Recitation,
            narrator: "نورين محمد صديق".to_string(),
            title: "الفاتحة".to_string(),
            file_id: "AgAD-file-1".to_string(),
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: AudioItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
