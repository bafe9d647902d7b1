//! Per-event transitions of a user's session.
//!
//! Every function here mutates a [`SessionState`] and describes the message
//! to send back; nothing talks to Telegram, so handlers stay thin and the
//! whole flow can be exercised in tests.

use rand::Rng;
use teloxide::utils::html::{bold, escape};

use crate::{
    error::{InsufficientDataError, MalformedRequest},
    keyboard::Markup,
    quiz::{self, AnswerPayload, AnswerResult, QuestionId, Verdict},
    state::{Mode, SessionState, ROUND_LENGTH},
    vocab::Vocabulary,
};

pub(crate) const ALREADY_ANSWERED: &str = "Siz bu savolga allaqachon javob berdingiz!";

/// An outgoing message: HTML text plus its keyboard.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub markup: Markup,
}

impl Reply {
    fn new(text: impl Into<String>, markup: Markup) -> Self {
        Self {
            text: text.into(),
            markup,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FollowUp {
    NextQuestion,
    RoundSummary(Reply),
}

#[derive(Debug, Clone)]
pub enum AnswerReply {
    /// The question was already scored; only a short notice is shown.
    Duplicate { notice: &'static str },
    Resolved { verdict: String, follow_up: FollowUp },
}

pub fn start_session(session: &mut SessionState) -> Reply {
    session.enter(Mode::Menu);
    Reply::new(
        format!(
            "🇰🇷 {}\n\nYangi so'zlarni o'rganing va test orqali mustahkamlang 👇",
            bold("Koreys tili Flashcard botiga xush kelibsiz!")
        ),
        Markup::MainMenu,
    )
}

pub fn show_flashcard<R: Rng + ?Sized>(
    session: &mut SessionState,
    vocab: &Vocabulary,
    rng: &mut R,
) -> Reply {
    let idx = rng.random_range(0..vocab.len());
    session.enter(Mode::Flashcard);
    session.current_card = Some(idx);

    let term = vocab.entries()[idx].term();
    Reply::new(format!("🇰🇷 {}", bold(&escape(term))), Markup::WordMenu)
}

pub fn reveal_translation(session: &SessionState, vocab: &Vocabulary) -> Reply {
    match session.current_card.and_then(|idx| vocab.get(idx)) {
        Some(entry) => Reply::new(
            format!("📝 {}", bold(&escape(entry.translation()))),
            Markup::None,
        ),
        None => Reply::new("Avval so'z tanlang 👇", Markup::MainMenu),
    }
}

pub fn next_flashcard<R: Rng + ?Sized>(
    session: &mut SessionState,
    vocab: &Vocabulary,
    rng: &mut R,
) -> Reply {
    if session.mode != Mode::Flashcard {
        return Reply::new(
            "Bu tugma faqat so'z o'rganish rejimida ishlaydi 👇",
            Markup::MainMenu,
        );
    }
    show_flashcard(session, vocab, rng)
}

/// Switches to quiz mode. An unfinished round is resumed, not restarted.
pub fn start_quiz(session: &mut SessionState) {
    session.enter(Mode::Quiz);
}

pub fn ask_question<R: Rng + ?Sized>(
    vocab: &Vocabulary,
    id: QuestionId,
    rng: &mut R,
) -> Result<Reply, InsufficientDataError> {
    let question = quiz::generate_question(vocab, id, rng)?;
    Ok(Reply::new(
        format!(
            "🇰🇷 Bu so'z nimani anglatadi?\n\n👉 {}",
            bold(&escape(question.term()))
        ),
        Markup::Options(question),
    ))
}

pub fn answer(
    session: &mut SessionState,
    payload: &AnswerPayload,
    vocab: &Vocabulary,
) -> Result<AnswerReply, MalformedRequest> {
    let (correct, chosen) = payload.resolve(vocab)?;

    let resolution = match quiz::submit_answer(session, payload.question_id(), correct, chosen) {
        AnswerResult::AlreadyAnswered => {
            return Ok(AnswerReply::Duplicate {
                notice: ALREADY_ANSWERED,
            })
        }
        AnswerResult::Resolved(resolution) => resolution,
    };

    let shown = bold(&escape(&resolution.correct_answer));
    let verdict = match resolution.verdict {
        Verdict::Correct => format!("✅ To'g'ri javob!\n📗 So'z: {shown}"),
        Verdict::Incorrect => format!("❌ Noto'g'ri!\nTo'g'ri javob: {shown}"),
    };

    let follow_up = match resolution.round_complete {
        Some(final_score) => {
            session.enter(Mode::Menu);
            FollowUp::RoundSummary(Reply::new(
                format!(
                    "🎯 Siz {ROUND_LENGTH} ta testni yakunladingiz!\n✅ To'g'ri javoblar: {}",
                    bold(&format!("{final_score} ta"))
                ),
                Markup::QuizContinue,
            ))
        }
        None => {
            session.enter(Mode::Quiz);
            FollowUp::NextQuestion
        }
    };

    Ok(AnswerReply::Resolved { verdict, follow_up })
}

pub fn show_stats(session: &SessionState) -> Reply {
    Reply::new(
        format!(
            "📈 Siz hozircha {} so'zni to'g'ri topdingiz!",
            bold(&format!("{} ta", session.total_correct))
        ),
        Markup::None,
    )
}

pub fn go_back(session: &mut SessionState) -> Reply {
    session.enter(Mode::Menu);
    Reply::new("🔙 Ortga qaytdingiz!", Markup::MainMenu)
}

pub fn go_home(session: &mut SessionState) -> Reply {
    session.enter(Mode::Menu);
    Reply::new("🏠 Asosiy menyuga qaytdingiz.", Markup::MainMenu)
}

pub fn unknown_input() -> Reply {
    Reply::new(
        "Bu buyruqni tushunmadim. Quyidagi menyudan foydalaning 👇",
        Markup::MainMenu,
    )
}
