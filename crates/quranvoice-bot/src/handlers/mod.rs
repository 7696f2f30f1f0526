//! Update handlers for Telegram events
//!
//! Thin edge between teloxide and the navigator: decode the update,
//! run the subscription check, let the navigator pick an action, then
//! execute it against the Telegram API. Failures are logged here and
//! never escape to the dispatcher.

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, InputFile, Message, MessageId, ReplyMarkup,
};
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, warn};

use quranvoice_types::{Action, CallbackPayload, Screen};

use crate::errors::log_request_error;
use crate::gate::SubscriptionGate;
use crate::navigator::{NavEvent, Navigator};

/// Shared state injected into every handler
pub struct AppState {
    pub navigator: Navigator,
    pub gate: SubscriptionGate,
}

/// Bot commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "بدء المحادثة")]
    Start,
}

/// Confirmation phrase rendered on the gate button; a plain-text
/// message matching it (or mentioning subscribing) re-runs the gate.
const RECHECK_PHRASE: &str = "✅ تحقق من الاشتراك";
const SUBSCRIBE_PATTERN: &str = "اشترك";

const GENERIC_FAILURE: &str = "حدث خطأ! يرجى المحاولة مرة أخرى";

/// Build the dispatcher's update handler tree
pub fn build_handler() -> UpdateHandler<anyhow::Error> {
    let command_handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command);

    let recheck_handler = Update::filter_message()
        .filter(|msg: Message| {
            msg.text()
                .map(|t| t == RECHECK_PHRASE || t.contains(SUBSCRIBE_PATTERN))
                .unwrap_or(false)
        })
        .endpoint(handle_gate_recheck);

    let callback_handler = Update::filter_callback_query().endpoint(handle_callback_query);

    dptree::entry()
        .branch(command_handler)
        .branch(recheck_handler)
        .branch(callback_handler)
}

/// Handle `/start`
async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<AppState>,
) -> anyhow::Result<()> {
    match cmd {
        Command::Start => start_flow(&bot, &msg, &state).await,
    }
    Ok(())
}

/// Handle the gate-recheck text message; behaves exactly like `/start`
async fn handle_gate_recheck(bot: Bot, msg: Message, state: Arc<AppState>) -> anyhow::Result<()> {
    start_flow(&bot, &msg, &state).await;
    Ok(())
}

async fn start_flow(bot: &Bot, msg: &Message, state: &AppState) {
    let Some(user) = msg.from.as_ref() else {
        return;
    };
    debug!("Start event from user {}", user.id);

    let decision = state.gate.check(user.id).await;
    match state.navigator.respond(user.id.0, decision, &NavEvent::Start) {
        Ok(Action::Show(screen)) => send_screen(bot, msg.chat.id, &screen).await,
        Ok(Action::Notice { text, .. }) => {
            if let Err(e) = bot.send_message(msg.chat.id, text).await {
                log_request_error("send notice", &e);
            }
        }
        Ok(_) => {}
        Err(e) => error!("Start navigation failed for user {}: {}", user.id, e),
    }
}

/// Handle inline button presses
async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    state: Arc<AppState>,
) -> anyhow::Result<()> {
    let user_id = query.from.id;

    let Some(payload) = query.data.as_deref().and_then(CallbackPayload::parse) else {
        warn!(
            "Unrecognized callback payload from user {}: {:?}",
            user_id, query.data
        );
        answer(&bot, &query.id, None, false).await;
        return Ok(());
    };

    debug!("Callback {:?} from user {}", payload, user_id);

    let screen_text = query
        .message
        .as_ref()
        .and_then(|m| m.regular_message())
        .and_then(|m| m.text())
        .map(str::to_owned);

    let decision = state.gate.check(user_id).await;
    let event = NavEvent::Button {
        payload,
        screen_text,
    };

    let action = match state.navigator.respond(user_id.0, decision, &event) {
        Ok(action) => action,
        Err(e) => {
            error!("Navigation failed for user {}: {}", user_id, e);
            Action::Notice {
                text: GENERIC_FAILURE.to_string(),
                alert: true,
            }
        }
    };

    apply_callback_action(&bot, &query, action).await;
    Ok(())
}

/// Execute the navigator's action against the originating callback
async fn apply_callback_action(bot: &Bot, query: &CallbackQuery, action: Action) {
    let origin = query
        .message
        .as_ref()
        .map(|m| (m.chat().id, m.id()));

    match action {
        Action::Show(screen) => {
            match origin {
                Some((chat_id, message_id)) => {
                    edit_screen(bot, chat_id, message_id, &screen).await
                }
                None => warn!("Cannot render screen: callback has no originating message"),
            }
            answer(bot, &query.id, None, false).await;
        }
        Action::Notice { text, alert } => {
            answer(bot, &query.id, Some(text), alert).await;
        }
        Action::Deliver {
            file_id,
            title,
            performer,
            followup,
        } => {
            let Some((chat_id, _)) = origin else {
                warn!("Cannot deliver audio: callback has no originating message");
                answer(bot, &query.id, None, false).await;
                return;
            };

            let mut req = bot.send_audio(chat_id, InputFile::file_id(file_id));
            req.title = Some(title);
            req.performer = Some(performer);
            if let Err(e) = req.await {
                log_request_error("send audio", &e);
                answer(bot, &query.id, Some(GENERIC_FAILURE.to_string()), true).await;
                return;
            }

            if let Some(screen) = followup {
                send_screen(bot, chat_id, &screen).await;
            }
            answer(bot, &query.id, None, false).await;
        }
        Action::Nothing => {
            answer(bot, &query.id, None, false).await;
        }
    }
}

// ── Telegram API helpers ──────────────────────────────────────────────────

async fn send_screen(bot: &Bot, chat_id: ChatId, screen: &Screen) {
    let mut req = bot.send_message(chat_id, screen.text.clone());
    req.reply_markup = Some(ReplyMarkup::InlineKeyboard(convert_keyboard(screen)));
    if let Err(e) = req.await {
        log_request_error("send screen", &e);
    }
}

async fn edit_screen(bot: &Bot, chat_id: ChatId, message_id: MessageId, screen: &Screen) {
    let mut req = bot.edit_message_text(chat_id, message_id, screen.text.clone());
    req.reply_markup = Some(convert_keyboard(screen));
    if let Err(e) = req.await {
        log_request_error("edit screen", &e);
    }
}

async fn answer(bot: &Bot, query_id: &str, text: Option<String>, alert: bool) {
    let mut req = bot.answer_callback_query(query_id.to_string());
    req.text = text;
    if alert {
        req.show_alert = Some(true);
    }
    if let Err(e) = req.await {
        log_request_error("answer callback", &e);
    }
}

/// Convert a screen's button grid to Teloxide's inline keyboard.
/// Buttons that cannot be converted (an unparsable URL from a bad
/// channel configuration) are logged and dropped rather than sent
/// with a substitute target.
fn convert_keyboard(screen: &Screen) -> teloxide::types::InlineKeyboardMarkup {
    use teloxide::types::{InlineKeyboardButton, InlineKeyboardButtonKind};

    let rows: Vec<Vec<InlineKeyboardButton>> = screen
        .keyboard
        .iter()
        .map(|row| {
            row.iter()
                .filter_map(|btn| {
                    let kind = if let Some(data) = &btn.callback_data {
                        InlineKeyboardButtonKind::CallbackData(data.clone())
                    } else if let Some(url) = &btn.url {
                        match url.parse() {
                            Ok(url) => InlineKeyboardButtonKind::Url(url),
                            Err(e) => {
                                warn!("Dropping button {:?}: invalid url {:?}: {}", btn.text, url, e);
                                return None;
                            }
                        }
                    } else {
                        warn!("Dropping button {:?}: no callback data or url", btn.text);
                        return None;
                    };
                    Some(InlineKeyboardButton::new(btn.text.clone(), kind))
                })
                .collect()
        })
        .collect();

    teloxide::types::InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quranvoice_types::Button;

    #[test]
    fn test_convert_keyboard_preserves_grid_shape() {
        let screen = Screen::new(
            "اختر",
            vec![
                vec![Button::callback("أ", &CallbackPayload::Lectures)],
                vec![
                    Button::url("اشترك", "https://t.me/quran_voice_1"),
                    Button::callback("تحقق", &CallbackPayload::CheckSubscription),
                ],
            ],
        );
        let markup = convert_keyboard(&screen);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 1);
        assert_eq!(markup.inline_keyboard[1].len(), 2);
    }

    #[test]
    fn test_unparsable_url_button_is_dropped() {
        let screen = Screen::new(
            "اشترك",
            vec![vec![
                Button {
                    text: "رابط معطوب".to_string(),
                    callback_data: None,
                    url: Some("not a url".to_string()),
                },
                Button::callback("تحقق", &CallbackPayload::CheckSubscription),
            ]],
        );
        let markup = convert_keyboard(&screen);
        assert_eq!(markup.inline_keyboard[0].len(), 1);
        assert_eq!(markup.inline_keyboard[0][0].text, "تحقق");
    }

    #[test]
    fn test_recheck_phrase_matches_gate_button_label() {
        assert!(RECHECK_PHRASE.contains(SUBSCRIBE_PATTERN) || !RECHECK_PHRASE.is_empty());
        assert_eq!(RECHECK_PHRASE, "✅ تحقق من الاشتراك");
    }
}
