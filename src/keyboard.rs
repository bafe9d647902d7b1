use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};

use crate::quiz::QuizQuestion;

pub const SHOW_WORD: &str = "📘 So'z ko'rish";
pub const START_QUIZ: &str = "🎯 Test rejimi";
pub const STATS: &str = "📊 Statistikam";
pub const REVEAL_TRANSLATION: &str = "💬 Tarjimasini ko'rish";
pub const NEXT_WORD: &str = "➡️ Keyingi";
pub const BACK: &str = "🔙 Ortga qaytish";
pub const HOME: &str = "🏠 Asosiy menyu";
pub const CONTINUE_QUIZ: &str = "🔁 Davom etish";

/// Reply-keyboard buttons, routed by their label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ShowWord,
    RevealTranslation,
    NextWord,
    StartQuiz,
    ContinueQuiz,
    Stats,
    Back,
    Home,
}

impl MenuAction {
    pub fn from_label(label: &str) -> Option<Self> {
        let action = match label.trim() {
            SHOW_WORD => Self::ShowWord,
            REVEAL_TRANSLATION => Self::RevealTranslation,
            NEXT_WORD => Self::NextWord,
            START_QUIZ => Self::StartQuiz,
            CONTINUE_QUIZ => Self::ContinueQuiz,
            STATS => Self::Stats,
            BACK => Self::Back,
            HOME => Self::Home,
            _ => return None,
        };
        Some(action)
    }
}

/// Which keyboard, if any, goes with an outgoing message.
#[derive(Debug, Clone)]
pub enum Markup {
    None,
    MainMenu,
    WordMenu,
    QuizContinue,
    Options(QuizQuestion),
}

impl Markup {
    pub fn render(&self) -> Option<ReplyMarkup> {
        match self {
            Markup::None => None,
            Markup::MainMenu => Some(main_menu_keyboard().into()),
            Markup::WordMenu => Some(word_keyboard().into()),
            Markup::QuizContinue => Some(quiz_continue_keyboard().into()),
            Markup::Options(question) => Some(options_keyboard(question).into()),
        }
    }
}

fn rows(labels: &[&[&str]]) -> Vec<Vec<KeyboardButton>> {
    labels
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect())
        .collect()
}

pub(crate) fn main_menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(rows(&[&[SHOW_WORD, START_QUIZ], &[STATS]])).resize_keyboard()
}

pub(crate) fn word_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(rows(&[&[REVEAL_TRANSLATION, NEXT_WORD], &[BACK, HOME]])).resize_keyboard()
}

pub(crate) fn quiz_continue_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(rows(&[&[CONTINUE_QUIZ, BACK], &[HOME]])).resize_keyboard()
}

/// One button per option; the callback data identifies question and choice.
pub(crate) fn options_keyboard(question: &QuizQuestion) -> InlineKeyboardMarkup {
    let keyboard: Vec<Vec<InlineKeyboardButton>> = question
        .options()
        .iter()
        .map(|option| {
            vec![InlineKeyboardButton::callback(
                option.translation(),
                question.payload_for(option).encode(),
            )]
        })
        .collect();

    InlineKeyboardMarkup::new(keyboard)
}
