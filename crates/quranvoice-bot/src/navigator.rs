//! Navigation state machine
//!
//! Maps one incoming event to one outgoing action. The machine is
//! re-entered fresh on every event: the button payload is the
//! authoritative source of "where the user is", with the per-user
//! context used only when a legacy payload omits the narrator.

#[cfg(test)]
#[path = "navigator_tests.rs"]
mod navigator_tests;

use quranvoice_types::{paginate, Action, Button, CallbackPayload, Category, GateDecision, Screen};

use crate::context::NavigationContexts;
use crate::errors::Result;
use crate::store::CatalogStore;

const GATE_GREETING: &str = "📢 مرحباً بك في بوت القرآن الكريم!\n\
    ⚠️ يجب عليك الاشتراك في قناتنا أولاً لاستخدام البوت:";
const GATE_WARNING: &str = "⚠️ يجب عليك الاشتراك في قناتنا أولاً لاستخدام البوت:";
const NOT_SUBSCRIBED_YET: &str = "❌ لم تشترك بعد! اشترك ثم اضغط تحقق";
const NARRATOR_MENU_PROMPT: &str = "👳 اختر الشيخ الذي تريد الاستماع لتلاوته:";
const NO_TITLES: &str = "لا توجد سور متاحة لهذا الشيخ";
const NO_LECTURES: &str = "لا توجد خطب متاحة حالياً";
const TITLE_NOT_FOUND: &str = "⛔ لم يتم العثور على السورة المطلوبة";
const LECTURE_NOT_FOUND: &str = "⛔ لم يتم العثور على الخطبة المطلوبة";
const AMBIGUOUS_CONTEXT: &str = "حدث خطأ! يرجى المحاولة مرة أخرى";
const DELIVERED: &str = "✅ تم إرسال التلاوة بنجاح\nاستمع وارفع صوتك بالقرآن الكريم";

/// Incoming interaction event, already decoded by the handlers
#[derive(Debug, Clone)]
pub enum NavEvent {
    /// `/start` command or a gate-recheck text message
    Start,
    /// Inline button press, with the originating screen's text
    Button {
        payload: CallbackPayload,
        screen_text: Option<String>,
    },
}

/// The controller: renders the next screen or delivers an item
#[derive(Clone)]
pub struct Navigator {
    store: CatalogStore,
    contexts: NavigationContexts,
    narrators: Vec<String>,
    page_size: usize,
    channel_url: String,
}

impl Navigator {
    pub fn new(
        store: CatalogStore,
        contexts: NavigationContexts,
        narrators: Vec<String>,
        page_size: usize,
        channel_url: String,
    ) -> Self {
        Self {
            store,
            contexts,
            narrators,
            page_size,
            channel_url,
        }
    }

    /// Handle one event for one user.
    ///
    /// `decision` comes from the subscription gate; a Denied decision
    /// never reaches a catalog screen.
    pub fn respond(&self, user_id: u64, decision: GateDecision, event: &NavEvent) -> Result<Action> {
        if !decision.is_allowed() {
            return Ok(self.denied(event));
        }

        match event {
            NavEvent::Start => Ok(Action::Show(self.narrator_menu())),
            NavEvent::Button {
                payload,
                screen_text,
            } => self.button(user_id, payload, screen_text.as_deref()),
        }
    }

    fn denied(&self, event: &NavEvent) -> Action {
        match event {
            // Re-check pressed while still unsubscribed: alert, leave
            // the gate screen as it is.
            NavEvent::Button {
                payload: CallbackPayload::CheckSubscription,
                ..
            } => Action::Notice {
                text: NOT_SUBSCRIBED_YET.to_string(),
                alert: true,
            },
            NavEvent::Start => Action::Show(self.gate_screen(GATE_GREETING)),
            NavEvent::Button { .. } => Action::Show(self.gate_screen(GATE_WARNING)),
        }
    }

    fn button(
        &self,
        user_id: u64,
        payload: &CallbackPayload,
        screen_text: Option<&str>,
    ) -> Result<Action> {
        match payload {
            CallbackPayload::CheckSubscription | CallbackPayload::BackToNarrators => {
                Ok(Action::Show(self.narrator_menu()))
            }
            CallbackPayload::SelectNarrator(narrator) => {
                self.contexts.set_narrator(user_id, narrator);
                self.title_page(narrator, 0)
            }
            CallbackPayload::TitlesPage { narrator, page } => {
                self.contexts.set_narrator(user_id, narrator);
                self.title_page(narrator, *page)
            }
            CallbackPayload::BackToTitles(narrator) => {
                self.contexts.set_narrator(user_id, narrator);
                self.title_page(narrator, 0)
            }
            CallbackPayload::SelectTitle { index, narrator } => {
                self.deliver_title_at(*index, narrator)
            }
            CallbackPayload::SelectTitleByName { title, narrator } => {
                self.deliver_title_by_name(user_id, title, narrator.as_deref(), screen_text)
            }
            CallbackPayload::Lectures => self.lecture_list(),
            CallbackPayload::SelectLecture(index) => self.deliver_lecture_at(*index),
            CallbackPayload::SelectLectureByName { title, narrator } => {
                self.deliver_lecture(title, narrator)
            }
            CallbackPayload::PageIndicator => Ok(Action::Nothing),
        }
    }

    // ── Screens ───────────────────────────────────────────────────────────

    fn gate_screen(&self, text: &str) -> Screen {
        Screen::new(
            text,
            vec![
                vec![Button::url("اشترك في القناة", &self.channel_url)],
                vec![Button::callback(
                    "✅ تحقق من الاشتراك",
                    &CallbackPayload::CheckSubscription,
                )],
            ],
        )
    }

    fn narrator_menu(&self) -> Screen {
        let mut keyboard: Vec<Vec<Button>> = self
            .narrators
            .iter()
            .map(|n| {
                vec![Button::callback(
                    n.clone(),
                    &CallbackPayload::SelectNarrator(n.clone()),
                )]
            })
            .collect();
        keyboard.push(vec![Button::callback("الخطب", &CallbackPayload::Lectures)]);
        Screen::new(NARRATOR_MENU_PROMPT, keyboard)
    }

    fn title_page(&self, narrator: &str, page_index: usize) -> Result<Action> {
        let titles = self.store.titles_for_narrator(narrator)?;
        if titles.is_empty() {
            return Ok(Action::Notice {
                text: NO_TITLES.to_string(),
                alert: false,
            });
        }

        // The engine does not clamp; guard here so rendered navigation
        // can never point outside [0, total_pages - 1].
        let total_pages = titles.len().div_ceil(self.page_size);
        let page_index = page_index.min(total_pages - 1);
        let page = paginate(&titles, page_index, self.page_size);

        // Buttons carry the title's absolute position on the id-ordered
        // list, keeping the callback data inside Telegram's byte cap no
        // matter how long the title is.
        let mut keyboard: Vec<Vec<Button>> = page
            .titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                vec![Button::callback(
                    t.clone(),
                    &CallbackPayload::SelectTitle {
                        index: page_index * self.page_size + i,
                        narrator: narrator.to_string(),
                    },
                )]
            })
            .collect();

        let mut nav_row = Vec::new();
        if page.has_prev() {
            nav_row.push(Button::callback(
                "⬅️ السابق",
                &CallbackPayload::TitlesPage {
                    narrator: narrator.to_string(),
                    page: page.index - 1,
                },
            ));
        }
        nav_row.push(Button::callback(
            format!("صفحة {}", page.indicator()),
            &CallbackPayload::PageIndicator,
        ));
        if page.has_next() {
            nav_row.push(Button::callback(
                "التالي ➡️",
                &CallbackPayload::TitlesPage {
                    narrator: narrator.to_string(),
                    page: page.index + 1,
                },
            ));
        }
        keyboard.push(nav_row);
        keyboard.push(vec![Button::callback(
            "🔙 العودة",
            &CallbackPayload::BackToNarrators,
        )]);

        Ok(Action::Show(Screen::new(
            format!("📖 اختر سورة من تلاوة الشيخ {}:", narrator),
            keyboard,
        )))
    }

    fn lecture_list(&self) -> Result<Action> {
        let lectures = self.store.lectures()?;
        if lectures.is_empty() {
            return Ok(Action::Notice {
                text: NO_LECTURES.to_string(),
                alert: false,
            });
        }

        let mut keyboard: Vec<Vec<Button>> = lectures
            .iter()
            .enumerate()
            .map(|(i, l)| {
                vec![Button::callback(
                    format!("{} - {}", l.title, l.narrator),
                    &CallbackPayload::SelectLecture(i),
                )]
            })
            .collect();
        keyboard.push(vec![Button::callback(
            "🔙 العودة",
            &CallbackPayload::BackToNarrators,
        )]);

        Ok(Action::Show(Screen::new("📢 اختر خطبة للاستماع:", keyboard)))
    }

    // ── Delivery ──────────────────────────────────────────────────────────

    /// Deliver the title at `index` on the narrator's id-ordered list.
    /// The list is append-only, so an index from a rendered keyboard
    /// stays valid; anything out of range means a stale button.
    fn deliver_title_at(&self, index: usize, narrator: &str) -> Result<Action> {
        let titles = self.store.titles_for_narrator(narrator)?;
        match titles.get(index) {
            Some(title) => self.deliver_recitation(title, narrator),
            None => Ok(Action::Notice {
                text: TITLE_NOT_FOUND.to_string(),
                alert: true,
            }),
        }
    }

    fn deliver_title_by_name(
        &self,
        user_id: u64,
        title: &str,
        payload_narrator: Option<&str>,
        screen_text: Option<&str>,
    ) -> Result<Action> {
        match self.resolve_narrator(user_id, payload_narrator, screen_text) {
            Some(narrator) => self.deliver_recitation(title, &narrator),
            None => Ok(Action::Notice {
                text: AMBIGUOUS_CONTEXT.to_string(),
                alert: true,
            }),
        }
    }

    fn deliver_recitation(&self, title: &str, narrator: &str) -> Result<Action> {
        match self.store.resolve(title, narrator, Category::Recitation)? {
            Some(file_id) => Ok(Action::Deliver {
                file_id,
                title: format!("سورة {} - الشيخ {}", title, narrator),
                performer: "القرآن الكريم".to_string(),
                followup: Some(Screen::new(
                    DELIVERED,
                    vec![vec![Button::callback(
                        "🔙 العودة للسور",
                        &CallbackPayload::BackToTitles(narrator.to_string()),
                    )]],
                )),
            }),
            None => Ok(Action::Notice {
                text: TITLE_NOT_FOUND.to_string(),
                alert: true,
            }),
        }
    }

    /// Deliver the lecture at `index` on the first-insertion-ordered
    /// lecture list; out of range means a stale button.
    fn deliver_lecture_at(&self, index: usize) -> Result<Action> {
        let lectures = self.store.lectures()?;
        match lectures.get(index) {
            Some(entry) => self.deliver_lecture(&entry.title, &entry.narrator),
            None => Ok(Action::Notice {
                text: LECTURE_NOT_FOUND.to_string(),
                alert: true,
            }),
        }
    }

    fn deliver_lecture(&self, title: &str, narrator: &str) -> Result<Action> {
        match self.store.resolve(title, narrator, Category::Lecture)? {
            Some(file_id) => Ok(Action::Deliver {
                file_id,
                title: format!("{} - الشيخ {}", title, narrator),
                performer: "الخطبة".to_string(),
                followup: None,
            }),
            None => Ok(Action::Notice {
                text: LECTURE_NOT_FOUND.to_string(),
                alert: true,
            }),
        }
    }

    /// Recover the narrator for a title selection: explicit payload,
    /// then stored context, then a scan of the rendered screen text.
    /// The scan is a legacy shim for keyboards that predate explicit
    /// payloads; longest name first so a narrator whose name contains
    /// another's cannot be shadowed.
    fn resolve_narrator(
        &self,
        user_id: u64,
        payload_narrator: Option<&str>,
        screen_text: Option<&str>,
    ) -> Option<String> {
        if let Some(n) = payload_narrator {
            return Some(n.to_string());
        }
        if let Some(n) = self.contexts.narrator(user_id) {
            return Some(n);
        }
        let text = screen_text?;
        let mut by_length: Vec<&String> = self.narrators.iter().collect();
        by_length.sort_by_key(|n| std::cmp::Reverse(n.len()));
        by_length
            .into_iter()
            .find(|n| text.contains(n.as_str()))
            .cloned()
    }
}
