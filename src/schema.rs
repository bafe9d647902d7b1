use std::error::Error;

use teloxide::{
    dispatching::{DpHandlerDescription, UpdateFilterExt, UpdateHandler},
    dptree::{self, Handler},
    prelude::DependencyMap,
    types::{CallbackQuery, Message, Update},
};
use tracing::instrument;

use crate::{
    commands::{help, start, Command},
    handlers,
    keyboard::MenuAction,
    quiz::AnswerPayload,
    store::InMemSessionStore,
};

type Sessions = InMemSessionStore;

pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help))
        .branch(case![Command::Start].endpoint(start::<Sessions>));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(menu_scheme())
        .endpoint(handlers::invalid_input);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_query_scheme())
}

#[instrument(level = "debug")]
fn menu_scheme() -> Handler<
    'static,
    DependencyMap,
    Result<(), Box<dyn Error + Send + Sync + 'static>>,
    DpHandlerDescription,
> {
    use dptree::case;
    tracing::debug!("Building a dispatching tree for menu buttons");
    dptree::filter_map(|msg: Message| msg.text().and_then(MenuAction::from_label))
        .branch(case![MenuAction::ShowWord].endpoint(handlers::show_word::<Sessions>))
        .branch(
            case![MenuAction::RevealTranslation]
                .endpoint(handlers::reveal_translation::<Sessions>),
        )
        .branch(case![MenuAction::NextWord].endpoint(handlers::next_word::<Sessions>))
        .branch(case![MenuAction::StartQuiz].endpoint(handlers::start_quiz::<Sessions>))
        .branch(case![MenuAction::ContinueQuiz].endpoint(handlers::start_quiz::<Sessions>))
        .branch(case![MenuAction::Stats].endpoint(handlers::stats::<Sessions>))
        .branch(case![MenuAction::Back].endpoint(handlers::go_back::<Sessions>))
        .branch(case![MenuAction::Home].endpoint(handlers::go_home::<Sessions>))
}

#[instrument(level = "debug")]
fn callback_query_scheme() -> Handler<
    'static,
    DependencyMap,
    Result<(), Box<dyn Error + Send + Sync + 'static>>,
    DpHandlerDescription,
> {
    tracing::debug!("Building a dispatching tree for callback queries");
    Update::filter_callback_query()
        .branch(
            dptree::filter(|q: CallbackQuery| {
                q.data.as_deref().is_some_and(AnswerPayload::is_answer)
            })
            .endpoint(handlers::take_answer::<Sessions>),
        )
        .endpoint(handlers::ignore_callback)
}
