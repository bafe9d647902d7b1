use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters, prelude::Requester, types::Message, utils::command::BotCommands,
    Bot,
};
use tracing::instrument;

use crate::{
    actions,
    handlers::{send_reply, sender},
    keyboard::main_menu_keyboard,
    store::SessionStore,
    HandlerResult,
};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display help.")]
    Help,
    #[command(description = "start the bot")]
    Start,
}

pub(crate) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn start<Store: SessionStore>(
    bot: Bot,
    msg: Message,
    store: Arc<Store>,
) -> HandlerResult {
    let Some(user) = sender(&msg) else {
        return Ok(());
    };
    tracing::info!("User {} starts a session", user.0);

    let reply = store.with_session(user, actions::start_session);
    send_reply(&bot, msg.chat.id, reply).await?;
    Ok(())
}
