use std::{collections::HashSet, fmt};

use rand::{
    seq::{IndexedRandom, SliceRandom},
    Rng,
};

use crate::{
    error::{InsufficientDataError, MalformedRequest},
    state::{QuizRound, SessionState, ROUND_LENGTH},
    vocab::{Vocabulary, OPTION_COUNT},
};

const PAYLOAD_TAG: &str = "answer";
const PAYLOAD_SEPARATOR: char = '|';

/// Identifies a question by the chat and message it was asked in reply to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn from_message(chat_id: i64, message_id: i32) -> Self {
        Self(format!("{chat_id}_{message_id}"))
    }

    pub fn parse(raw: &str) -> Result<Self, MalformedRequest> {
        if raw.is_empty() || raw.contains(PAYLOAD_SEPARATOR) {
            return Err(MalformedRequest::QuestionId(raw.to_owned()));
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    entry: usize,
    translation: String,
}

impl QuizOption {
    fn new(entry: usize, translation: &str) -> Self {
        Self {
            entry,
            translation: translation.to_owned(),
        }
    }

    pub fn entry(&self) -> usize {
        self.entry
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }
}

#[derive(Debug, Clone)]
pub struct QuizQuestion {
    id: QuestionId,
    term: String,
    correct: QuizOption,
    options: Vec<QuizOption>,
}

impl QuizQuestion {
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn correct(&self) -> &QuizOption {
        &self.correct
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    /// Callback payload sent back when `option` is chosen.
    pub fn payload_for(&self, option: &QuizOption) -> AnswerPayload {
        AnswerPayload {
            question_id: self.id.clone(),
            correct_entry: self.correct.entry,
            chosen_entry: option.entry,
        }
    }
}

/// Builds a question: one random entry plus three distractors whose
/// translations differ from it and from each other, in shuffled order.
pub fn generate_question<R: Rng + ?Sized>(
    vocab: &Vocabulary,
    id: QuestionId,
    rng: &mut R,
) -> Result<QuizQuestion, InsufficientDataError> {
    let entries = vocab.entries();
    if entries.is_empty() {
        return Err(InsufficientDataError {
            required: OPTION_COUNT,
            available: 0,
        });
    }

    let correct_idx = rng.random_range(0..entries.len());
    let correct = &entries[correct_idx];

    let mut seen = HashSet::from([correct.translation()]);
    let candidates: Vec<usize> = (0..entries.len())
        .filter(|&idx| seen.insert(entries[idx].translation()))
        .collect();

    if candidates.len() < OPTION_COUNT - 1 {
        return Err(InsufficientDataError {
            required: OPTION_COUNT,
            available: candidates.len() + 1,
        });
    }

    let correct_option = QuizOption::new(correct_idx, correct.translation());
    let mut options = vec![correct_option.clone()];
    options.extend(
        candidates
            .choose_multiple(rng, OPTION_COUNT - 1)
            .map(|&idx| QuizOption::new(idx, entries[idx].translation())),
    );
    options.shuffle(rng);

    Ok(QuizQuestion {
        id,
        term: correct.term().to_owned(),
        correct: correct_option,
        options,
    })
}

/// Callback data of an option button: `answer|{question_id}|{correct}|{chosen}`.
///
/// The last two fields are vocabulary indices rather than texts so the
/// payload stays within Telegram's 64-byte callback data limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerPayload {
    question_id: QuestionId,
    correct_entry: usize,
    chosen_entry: usize,
}

impl AnswerPayload {
    pub fn is_answer(data: &str) -> bool {
        data.starts_with(PAYLOAD_TAG) && data[PAYLOAD_TAG.len()..].starts_with(PAYLOAD_SEPARATOR)
    }

    pub fn parse(data: &str) -> Result<Self, MalformedRequest> {
        let parts: Vec<&str> = data.split(PAYLOAD_SEPARATOR).collect();
        let [tag, question_id, correct, chosen] = parts.as_slice() else {
            return Err(MalformedRequest::FieldCount(parts.len()));
        };
        if *tag != PAYLOAD_TAG {
            return Err(MalformedRequest::Tag((*tag).to_owned()));
        }

        Ok(Self {
            question_id: QuestionId::parse(question_id)?,
            correct_entry: parse_entry(correct)?,
            chosen_entry: parse_entry(chosen)?,
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "{PAYLOAD_TAG}{sep}{}{sep}{}{sep}{}",
            self.question_id,
            self.correct_entry,
            self.chosen_entry,
            sep = PAYLOAD_SEPARATOR
        )
    }

    pub fn question_id(&self) -> &QuestionId {
        &self.question_id
    }

    /// Looks up the correct and chosen translations.
    pub fn resolve<'v>(&self, vocab: &'v Vocabulary) -> Result<(&'v str, &'v str), MalformedRequest> {
        let lookup = |idx: usize| {
            vocab
                .get(idx)
                .map(|entry| entry.translation())
                .ok_or(MalformedRequest::UnknownEntry(idx))
        };
        Ok((lookup(self.correct_entry)?, lookup(self.chosen_entry)?))
    }
}

fn parse_entry(raw: &str) -> Result<usize, MalformedRequest> {
    raw.parse()
        .map_err(|_| MalformedRequest::EntryIndex(raw.to_owned()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub verdict: Verdict,
    pub correct_answer: String,
    /// Final score of the round this answer completed.
    pub round_complete: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerResult {
    AlreadyAnswered,
    Resolved(Resolution),
}

/// Scores an answer. Each question id is resolved at most once per round;
/// the round resets after [`ROUND_LENGTH`] resolved questions.
pub fn submit_answer(
    session: &mut SessionState,
    question_id: &QuestionId,
    correct_answer: &str,
    chosen_answer: &str,
) -> AnswerResult {
    let round = &mut session.round;
    if round.answered.contains(question_id) {
        return AnswerResult::AlreadyAnswered;
    }

    round.answered.insert(question_id.clone());
    round.question_count += 1;

    let verdict = if chosen_answer == correct_answer {
        round.score += 1;
        session.total_correct += 1;
        Verdict::Correct
    } else {
        Verdict::Incorrect
    };

    let round_complete = if round.question_count >= ROUND_LENGTH {
        let final_score = round.score;
        *round = QuizRound::default();
        Some(final_score)
    } else {
        None
    };

    AnswerResult::Resolved(Resolution {
        verdict,
        correct_answer: correct_answer.to_owned(),
        round_complete,
    })
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::vocab::VocabEntry;

    fn vocab() -> Vocabulary {
        Vocabulary::new(vec![
            VocabEntry::new("물", "water"),
            VocabEntry::new("불", "fire"),
            VocabEntry::new("산", "mountain"),
            VocabEntry::new("강", "river"),
        ])
        .unwrap()
    }

    fn qid(n: i32) -> QuestionId {
        QuestionId::from_message(42, n)
    }

    fn resolution(result: AnswerResult) -> Resolution {
        match result {
            AnswerResult::Resolved(resolution) => resolution,
            AnswerResult::AlreadyAnswered => panic!("question was already answered"),
        }
    }

    #[test]
    fn four_word_vocabulary_uses_every_translation_once() {
        let vocab = vocab();
        let mut rng = StdRng::seed_from_u64(7);

        for n in 0..50 {
            let question = generate_question(&vocab, qid(n), &mut rng).unwrap();
            let mut translations: Vec<&str> =
                question.options().iter().map(QuizOption::translation).collect();
            translations.sort_unstable();

            assert_eq!(translations, ["fire", "mountain", "river", "water"]);
            let correct = vocab.get(question.correct().entry()).unwrap();
            assert_eq!(correct.term(), question.term());
            assert_eq!(correct.translation(), question.correct().translation());
        }
    }

    #[test]
    fn options_are_distinct_and_contain_correct_once() {
        let vocab = Vocabulary::parse(
            "물,water\n불,fire\n산,mountain\n강,river\n바다,sea\n하늘,sky\n비,rain\n눈,snow\n호수,water\n",
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(2024);

        for n in 0..200 {
            let question = generate_question(&vocab, qid(n), &mut rng).unwrap();
            let options = question.options();
            assert_eq!(options.len(), OPTION_COUNT);

            let distinct: HashSet<&str> = options.iter().map(QuizOption::translation).collect();
            assert_eq!(distinct.len(), OPTION_COUNT);

            let correct_count = options
                .iter()
                .filter(|option| option.translation() == question.correct().translation())
                .count();
            assert_eq!(correct_count, 1);
        }
    }

    #[test]
    fn same_seed_gives_same_question() {
        let vocab = vocab();
        let first = generate_question(&vocab, qid(1), &mut StdRng::seed_from_u64(99)).unwrap();
        let second = generate_question(&vocab, qid(1), &mut StdRng::seed_from_u64(99)).unwrap();

        assert_eq!(first.options(), second.options());
        assert_eq!(first.correct(), second.correct());
    }

    #[test]
    fn too_few_translations_is_insufficient_data() {
        let vocab = Vocabulary::parse("물,water\n불,fire\n산,fire\n강,river\n").unwrap();
        let err = generate_question(&vocab, qid(1), &mut StdRng::seed_from_u64(1)).unwrap_err();

        assert_eq!(err.required, 4);
        assert_eq!(err.available, 3);
    }

    #[test]
    fn duplicate_submission_is_scored_once() {
        let mut session = SessionState::default();
        let id = qid(1);

        let first = resolution(submit_answer(&mut session, &id, "water", "water"));
        assert_eq!(first.verdict, Verdict::Correct);

        let second = submit_answer(&mut session, &id, "water", "fire");
        assert_eq!(second, AnswerResult::AlreadyAnswered);

        assert_eq!(session.round().score(), 1);
        assert_eq!(session.round().question_count(), 1);
        assert_eq!(session.total_correct(), 1);
    }

    #[test]
    fn incorrect_answer_reveals_correct_one() {
        let mut session = SessionState::default();
        let result = resolution(submit_answer(&mut session, &qid(3), "river", "fire"));

        assert_eq!(result.verdict, Verdict::Incorrect);
        assert_eq!(result.correct_answer, "river");
        assert_eq!(result.round_complete, None);
        assert_eq!(session.round().score(), 0);
        assert!(session.round().is_answered(&qid(3)));
    }

    #[test]
    fn round_of_twenty_reports_score_and_resets() {
        let mut session = SessionState::default();

        for n in 0..ROUND_LENGTH as i32 {
            let chosen = if n < 12 { "water" } else { "fire" };
            let result = resolution(submit_answer(&mut session, &qid(n), "water", chosen));

            if n + 1 < ROUND_LENGTH as i32 {
                assert_eq!(result.round_complete, None);
                assert_eq!(session.round().question_count(), n as u32 + 1);
            } else {
                assert_eq!(result.round_complete, Some(12));
            }
        }

        assert_eq!(session.round().question_count(), 0);
        assert_eq!(session.round().answered_len(), 0);
        assert_eq!(session.round().score(), 0);
        assert_eq!(session.total_correct(), 12);

        let next = resolution(submit_answer(&mut session, &qid(100), "water", "water"));
        assert_eq!(next.round_complete, None);
        assert_eq!(session.round().question_count(), 1);
        assert_eq!(session.round().score(), 1);
    }

    #[test]
    fn total_correct_never_decreases() {
        let mut session = SessionState::default();
        let mut last = 0;

        for n in 0..45 {
            let chosen = if n % 3 == 0 { "fire" } else { "water" };
            submit_answer(&mut session, &qid(n), "water", chosen);

            assert!(session.total_correct() >= last);
            assert!(session.total_correct() - last <= 1);
            last = session.total_correct();
        }

        assert_eq!(session.total_correct(), 30);
    }

    #[test]
    fn payload_round_trips_through_callback_data() {
        let vocab = vocab();
        let question = generate_question(&vocab, qid(77), &mut StdRng::seed_from_u64(3)).unwrap();
        let option = &question.options()[2];

        let data = question.payload_for(option).encode();
        assert!(data.len() <= 64);
        assert!(AnswerPayload::is_answer(&data));

        let payload = AnswerPayload::parse(&data).unwrap();
        assert_eq!(payload.question_id(), &qid(77));

        let (correct, chosen) = payload.resolve(&vocab).unwrap();
        assert_eq!(correct, question.correct().translation());
        assert_eq!(chosen, option.translation());
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert_eq!(
            AnswerPayload::parse("answer|42_1|0"),
            Err(MalformedRequest::FieldCount(3))
        );
        assert_eq!(
            AnswerPayload::parse("answer|42_1|0|1|2"),
            Err(MalformedRequest::FieldCount(5))
        );
        assert_eq!(
            AnswerPayload::parse("vote|42_1|0|1"),
            Err(MalformedRequest::Tag("vote".into()))
        );
        assert_eq!(
            AnswerPayload::parse("answer||0|1"),
            Err(MalformedRequest::QuestionId(String::new()))
        );
        assert_eq!(
            AnswerPayload::parse("answer|42_1|water|1"),
            Err(MalformedRequest::EntryIndex("water".into()))
        );
        assert!(!AnswerPayload::is_answer("answers|1"));
    }

    #[test]
    fn payload_with_unknown_entry_does_not_resolve() {
        let payload = AnswerPayload::parse("answer|42_1|0|17").unwrap();

        assert_eq!(
            payload.resolve(&vocab()),
            Err(MalformedRequest::UnknownEntry(17))
        );
    }
}
