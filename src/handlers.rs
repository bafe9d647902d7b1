use std::sync::Arc;

use teloxide::{
    payloads::{AnswerCallbackQuerySetters, EditMessageTextSetters, SendMessageSetters},
    prelude::Requester,
    types::{CallbackQuery, ChatId, Message, ParseMode, UserId},
    Bot, RequestError,
};
use tracing::instrument;

use crate::{
    actions::{self, AnswerReply, FollowUp, Reply},
    quiz::{AnswerPayload, QuestionId},
    store::SessionStore,
    vocab::Vocabulary,
    HandlerResult,
};

pub(crate) fn sender(msg: &Message) -> Option<UserId> {
    msg.from.as_ref().map(|user| user.id)
}

pub(crate) async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    reply: Reply,
) -> Result<Message, RequestError> {
    let mut request = bot
        .send_message(chat_id, reply.text)
        .parse_mode(ParseMode::Html);
    if let Some(markup) = reply.markup.render() {
        request = request.reply_markup(markup);
    }
    request.await
}

/// Sends a fresh question. Its id comes from the message that triggered it.
async fn ask(bot: &Bot, chat_id: ChatId, trigger: QuestionId, vocab: &Vocabulary) -> HandlerResult {
    let reply = actions::ask_question(vocab, trigger, &mut rand::rng())?;
    send_reply(bot, chat_id, reply).await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn show_word<Store: SessionStore>(
    bot: Bot,
    msg: Message,
    store: Arc<Store>,
    vocab: Arc<Vocabulary>,
) -> HandlerResult {
    let Some(user) = sender(&msg) else {
        return Ok(());
    };
    let reply = store.with_session(user, |session| {
        actions::show_flashcard(session, &vocab, &mut rand::rng())
    });
    send_reply(&bot, msg.chat.id, reply).await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn reveal_translation<Store: SessionStore>(
    bot: Bot,
    msg: Message,
    store: Arc<Store>,
    vocab: Arc<Vocabulary>,
) -> HandlerResult {
    let Some(user) = sender(&msg) else {
        return Ok(());
    };
    let reply = store.with_session(user, |session| actions::reveal_translation(session, &vocab));
    send_reply(&bot, msg.chat.id, reply).await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn next_word<Store: SessionStore>(
    bot: Bot,
    msg: Message,
    store: Arc<Store>,
    vocab: Arc<Vocabulary>,
) -> HandlerResult {
    let Some(user) = sender(&msg) else {
        return Ok(());
    };
    let reply = store.with_session(user, |session| {
        actions::next_flashcard(session, &vocab, &mut rand::rng())
    });
    send_reply(&bot, msg.chat.id, reply).await?;
    Ok(())
}

/// Handles both "start quiz" and "continue" buttons.
#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn start_quiz<Store: SessionStore>(
    bot: Bot,
    msg: Message,
    store: Arc<Store>,
    vocab: Arc<Vocabulary>,
) -> HandlerResult {
    let Some(user) = sender(&msg) else {
        return Ok(());
    };
    let answered = store.with_session(user, |session| {
        actions::start_quiz(session);
        session.round().question_count()
    });
    tracing::info!("User {} enters quiz mode, {} answered in this round", user.0, answered);

    let trigger = QuestionId::from_message(msg.chat.id.0, msg.id.0);
    ask(&bot, msg.chat.id, trigger, &vocab).await
}

#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn stats<Store: SessionStore>(
    bot: Bot,
    msg: Message,
    store: Arc<Store>,
) -> HandlerResult {
    let Some(user) = sender(&msg) else {
        return Ok(());
    };
    let reply = store.with_session(user, |session| actions::show_stats(session));
    send_reply(&bot, msg.chat.id, reply).await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn go_back<Store: SessionStore>(
    bot: Bot,
    msg: Message,
    store: Arc<Store>,
) -> HandlerResult {
    let Some(user) = sender(&msg) else {
        return Ok(());
    };
    let reply = store.with_session(user, actions::go_back);
    send_reply(&bot, msg.chat.id, reply).await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn go_home<Store: SessionStore>(
    bot: Bot,
    msg: Message,
    store: Arc<Store>,
) -> HandlerResult {
    let Some(user) = sender(&msg) else {
        return Ok(());
    };
    let reply = store.with_session(user, actions::go_home);
    send_reply(&bot, msg.chat.id, reply).await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(user = q.from.id.0))]
pub(crate) async fn take_answer<Store: SessionStore>(
    bot: Bot,
    q: CallbackQuery,
    store: Arc<Store>,
    vocab: Arc<Vocabulary>,
) -> HandlerResult {
    let Some(message) = &q.message else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let chat_id = message.chat().id;

    let outcome = match q.data.as_deref().map(AnswerPayload::parse) {
        Some(Ok(payload)) => store.with_session(q.from.id, |session| {
            actions::answer(session, &payload, &vocab)
        }),
        Some(Err(e)) => Err(e),
        None => {
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
    };

    match outcome {
        Err(e) => {
            tracing::warn!("Ignoring answer from {}: {}", q.from.id.0, e);
            bot.answer_callback_query(q.id.clone()).await?;
        }
        Ok(AnswerReply::Duplicate { notice }) => {
            tracing::info!("User {} taps an already answered question", q.from.id.0);
            bot.answer_callback_query(q.id.clone()).text(notice).await?;
        }
        Ok(AnswerReply::Resolved { verdict, follow_up }) => {
            if let Err(e) = bot
                .edit_message_text(chat_id, message.id(), verdict)
                .parse_mode(ParseMode::Html)
                .await
            {
                tracing::warn!("Failed to update answered question: {}", e);
            }

            match follow_up {
                FollowUp::NextQuestion => {
                    let trigger = QuestionId::from_message(chat_id.0, message.id().0);
                    ask(&bot, chat_id, trigger, &vocab).await?;
                }
                FollowUp::RoundSummary(summary) => {
                    tracing::info!("User {} completes a quiz round", q.from.id.0);
                    send_reply(&bot, chat_id, summary).await?;
                }
            }
            bot.answer_callback_query(q.id.clone()).await?;
        }
    }

    Ok(())
}

/// Callback queries that don't carry an answer still need acknowledging.
pub(crate) async fn ignore_callback(bot: Bot, q: CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn invalid_input(bot: Bot, msg: Message) -> HandlerResult {
    tracing::info!("Invalid input '{:?}'", msg.text());
    send_reply(&bot, msg.chat.id, actions::unknown_input()).await?;
    Ok(())
}
