use std::collections::HashSet;

use crate::quiz::QuestionId;

/// Number of answered questions that make up one quiz round.
pub const ROUND_LENGTH: u32 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Menu,
    Flashcard,
    Quiz,
}

/// Progress through the current quiz round.
#[derive(Debug, Clone, Default)]
pub struct QuizRound {
    pub(crate) question_count: u32,
    pub(crate) score: u32,
    pub(crate) answered: HashSet<QuestionId>,
}

impl QuizRound {
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_answered(&self, id: &QuestionId) -> bool {
        self.answered.contains(id)
    }

    pub fn answered_len(&self) -> usize {
        self.answered.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub(crate) mode: Mode,
    // index into the vocabulary; only meaningful in flashcard mode
    pub(crate) current_card: Option<usize>,
    pub(crate) round: QuizRound,
    pub(crate) total_correct: u64,
}

impl SessionState {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_card(&self) -> Option<usize> {
        self.current_card
    }

    pub fn round(&self) -> &QuizRound {
        &self.round
    }

    pub fn total_correct(&self) -> u64 {
        self.total_correct
    }

    pub(crate) fn enter(&mut self, mode: Mode) {
        if mode != Mode::Flashcard {
            self.current_card = None;
        }
        self.mode = mode;
    }
}
