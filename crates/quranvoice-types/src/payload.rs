//! Callback payload codec
//!
//! Every inline button encodes its target in the callback data string,
//! which Telegram caps at 64 bytes. Canonical selection payloads are
//! index-based — positions on the id-ordered list the screen was
//! rendered from — so arbitrarily long Arabic titles never overflow
//! the cap. The narrator rides along after the unit separator (U+001F)
//! so a selection never depends on recovered context. Name-based forms
//! emitted by earlier deployments are still parsed.

/// Telegram's limit on callback data, in bytes.
pub const MAX_CALLBACK_BYTES: usize = 64;

/// Field separator for canonical payloads. Never appears in narrator
/// names or titles, unlike '_'.
const SEP: char = '\u{1f}';

/// Decoded button-press payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPayload {
    /// Re-run the subscription check from the gate screen
    CheckSubscription,
    /// Open the title list for a narrator, at page 0
    SelectNarrator(String),
    /// Jump to a specific title page for a narrator
    TitlesPage { narrator: String, page: usize },
    /// Deliver the recitation at `index` on the narrator's title list
    SelectTitle { index: usize, narrator: String },
    /// Title selection by name, emitted by older keyboards. `narrator`
    /// is `None` for the oldest payloads, which carried the title only.
    SelectTitleByName {
        title: String,
        narrator: Option<String>,
    },
    /// Open the lecture list
    Lectures,
    /// Deliver the lecture at `index` on the lecture list
    SelectLecture(usize),
    /// Lecture selection by name, emitted by older keyboards
    SelectLectureByName { title: String, narrator: String },
    /// Return to the narrator menu
    BackToNarrators,
    /// Return to page 0 of a narrator's titles
    BackToTitles(String),
    /// The non-interactive page indicator button
    PageIndicator,
}

impl CallbackPayload {
    /// Encode into a callback data string
    pub fn encode(&self) -> String {
        match self {
            CallbackPayload::CheckSubscription => "check_subscription".to_string(),
            CallbackPayload::SelectNarrator(n) => format!("sheikh_{}", n),
            CallbackPayload::TitlesPage { narrator, page } => {
                format!("page_{}{}{}", narrator, SEP, page)
            }
            CallbackPayload::SelectTitle { index, narrator } => {
                format!("sura#{}{}{}", index, SEP, narrator)
            }
            CallbackPayload::SelectTitleByName { title, narrator } => match narrator {
                Some(n) => format!("sura_{}{}{}", title, SEP, n),
                None => format!("sura_{}", title),
            },
            CallbackPayload::Lectures => "lectures".to_string(),
            CallbackPayload::SelectLecture(index) => format!("lecture#{}", index),
            CallbackPayload::SelectLectureByName { title, narrator } => {
                format!("lecture_{}{}{}", title, SEP, narrator)
            }
            CallbackPayload::BackToNarrators => "back_to_sheikhs".to_string(),
            CallbackPayload::BackToTitles(n) => format!("back_to_suras_{}", n),
            CallbackPayload::PageIndicator => "current_page".to_string(),
        }
    }

    /// Parse a callback data string; `None` for unrecognized payloads
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "check_subscription" => return Some(CallbackPayload::CheckSubscription),
            "lectures" => return Some(CallbackPayload::Lectures),
            "current_page" => return Some(CallbackPayload::PageIndicator),
            "back_to_sheikhs" => return Some(CallbackPayload::BackToNarrators),
            _ => {}
        }

        if let Some(rest) = data.strip_prefix("back_to_suras_") {
            return Some(CallbackPayload::BackToTitles(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("sheikh_") {
            return Some(CallbackPayload::SelectNarrator(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("page_") {
            return parse_page(rest);
        }
        if let Some(rest) = data.strip_prefix("sura#") {
            let (index, narrator) = rest.split_once(SEP)?;
            return Some(CallbackPayload::SelectTitle {
                index: index.parse().ok()?,
                narrator: narrator.to_string(),
            });
        }
        if let Some(rest) = data.strip_prefix("sura_") {
            return Some(match rest.split_once(SEP) {
                Some((title, narrator)) => CallbackPayload::SelectTitleByName {
                    title: title.to_string(),
                    narrator: Some(narrator.to_string()),
                },
                None => CallbackPayload::SelectTitleByName {
                    title: rest.to_string(),
                    narrator: None,
                },
            });
        }
        if let Some(rest) = data.strip_prefix("lecture#") {
            return Some(CallbackPayload::SelectLecture(rest.parse().ok()?));
        }
        if let Some(rest) = data.strip_prefix("lecture_") {
            return parse_lecture(rest);
        }

        None
    }
}

fn parse_page(rest: &str) -> Option<CallbackPayload> {
    // Canonical: "{narrator}\x1f{page}". Legacy: "{narrator}_{page}",
    // where the page number follows the last underscore.
    let (narrator, page) = rest
        .split_once(SEP)
        .or_else(|| rest.rsplit_once('_'))?;
    let page = page.parse().ok()?;
    Some(CallbackPayload::TitlesPage {
        narrator: narrator.to_string(),
        page,
    })
}

fn parse_lecture(rest: &str) -> Option<CallbackPayload> {
    // Canonical: "{title}\x1f{narrator}". Legacy: "{title}_{narrator}",
    // split at the first underscore.
    let (title, narrator) = rest.split_once(SEP).or_else(|| rest.split_once('_'))?;
    Some(CallbackPayload::SelectLectureByName {
        title: title.to_string(),
        narrator: narrator.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_payload_roundtrips() {
        for payload in [
            CallbackPayload::CheckSubscription,
            CallbackPayload::Lectures,
            CallbackPayload::BackToNarrators,
            CallbackPayload::PageIndicator,
        ] {
            assert_eq!(CallbackPayload::parse(&payload.encode()), Some(payload));
        }
    }

    #[test]
    fn test_narrator_roundtrip() {
        let payload = CallbackPayload::SelectNarrator("نورين محمد صديق".to_string());
        assert_eq!(payload.encode(), "sheikh_نورين محمد صديق");
        assert_eq!(CallbackPayload::parse(&payload.encode()), Some(payload));
    }

    #[test]
    fn test_page_roundtrip() {
        let payload = CallbackPayload::TitlesPage {
            narrator: "محمد عثمان حاج".to_string(),
            page: 2,
        };
        assert_eq!(CallbackPayload::parse(&payload.encode()), Some(payload));
    }

    #[test]
    fn test_legacy_page_parses_by_last_underscore() {
        let parsed = CallbackPayload::parse("page_some_narrator_3");
        assert_eq!(
            parsed,
            Some(CallbackPayload::TitlesPage {
                narrator: "some_narrator".to_string(),
                page: 3,
            })
        );
    }

    #[test]
    fn test_title_roundtrip_carries_index_and_narrator() {
        let payload = CallbackPayload::SelectTitle {
            index: 4,
            narrator: "نورين محمد صديق".to_string(),
        };
        assert_eq!(payload.encode(), "sura#4\u{1f}نورين محمد صديق");
        assert_eq!(CallbackPayload::parse(&payload.encode()), Some(payload));
    }

    #[test]
    fn test_name_based_title_roundtrip() {
        let payload = CallbackPayload::SelectTitleByName {
            title: "الفاتحة".to_string(),
            narrator: Some("نورين محمد صديق".to_string()),
        };
        assert_eq!(CallbackPayload::parse(&payload.encode()), Some(payload));
    }

    #[test]
    fn test_oldest_title_form_has_no_narrator() {
        assert_eq!(
            CallbackPayload::parse("sura_البقرة"),
            Some(CallbackPayload::SelectTitleByName {
                title: "البقرة".to_string(),
                narrator: None,
            })
        );
    }

    #[test]
    fn test_lecture_roundtrip() {
        let payload = CallbackPayload::SelectLecture(7);
        assert_eq!(payload.encode(), "lecture#7");
        assert_eq!(CallbackPayload::parse(&payload.encode()), Some(payload));
    }

    #[test]
    fn test_name_based_lecture_roundtrip() {
        let payload = CallbackPayload::SelectLectureByName {
            title: "خطبة الجمعة".to_string(),
            narrator: "محمد عثمان حاج".to_string(),
        };
        assert_eq!(CallbackPayload::parse(&payload.encode()), Some(payload));
    }

    #[test]
    fn test_legacy_lecture_splits_at_first_underscore() {
        assert_eq!(
            CallbackPayload::parse("lecture_title_narrator name"),
            Some(CallbackPayload::SelectLectureByName {
                title: "title".to_string(),
                narrator: "narrator name".to_string(),
            })
        );
    }

    #[test]
    fn test_back_to_titles_roundtrip() {
        let payload = CallbackPayload::BackToTitles("محمد عثمان حاج".to_string());
        assert_eq!(CallbackPayload::parse(&payload.encode()), Some(payload));
    }

    #[test]
    fn test_canonical_payloads_fit_callback_data_limit() {
        // Arabic narrator names run ~2 bytes per char; with indexes in
        // place of titles every canonical payload stays under the cap
        // even at implausibly deep positions.
        let narrator = "نورين محمد صديق".to_string();
        for payload in [
            CallbackPayload::SelectNarrator(narrator.clone()),
            CallbackPayload::TitlesPage {
                narrator: narrator.clone(),
                page: 999,
            },
            CallbackPayload::SelectTitle {
                index: 9999,
                narrator: narrator.clone(),
            },
            CallbackPayload::SelectLecture(9999),
            CallbackPayload::BackToTitles(narrator),
        ] {
            let data = payload.encode();
            assert!(
                data.len() <= MAX_CALLBACK_BYTES,
                "{:?} encodes to {} bytes",
                payload,
                data.len()
            );
        }
    }

    #[test]
    fn test_unknown_payload_is_none() {
        assert_eq!(CallbackPayload::parse(""), None);
        assert_eq!(CallbackPayload::parse("bogus"), None);
        assert_eq!(CallbackPayload::parse("page_narrator"), None);
        assert_eq!(CallbackPayload::parse("page_narrator\u{1f}x"), None);
        assert_eq!(CallbackPayload::parse("sura#5"), None);
        assert_eq!(CallbackPayload::parse("sura#x\u{1f}narrator"), None);
        assert_eq!(CallbackPayload::parse("lecture#x"), None);
    }
}
