//! Locally graded vocabulary quiz.
//!
//! One [`Quiz`] per started quiz. Every question takes exactly one answer;
//! once all are answered the quiz is complete and further answers are ignored.

use crate::models::QuizQuestion;

pub const PASS_PERCENT: u32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    /// Terminal: the backend had no questions.
    Empty,
    Active,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graded {
    pub given: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizItem {
    pub question: QuizQuestion,
    pub graded: Option<Graded>,
}

impl QuizItem {
    pub fn is_answered(&self) -> bool {
        self.graded.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect { expected: String },
    /// No state change: already answered, quiz not active, or bad index.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    pub percent: u32,
}

impl QuizScore {
    pub fn new(correct: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((correct as f64 / total as f64) * 100.0).round() as u32
        };
        Self { correct, total, percent }
    }

    pub fn passed(&self) -> bool {
        self.percent >= PASS_PERCENT
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    phase: QuizPhase,
    items: Vec<QuizItem>,
}

impl Quiz {
    pub fn loading() -> Self {
        Self {
            phase: QuizPhase::Loading,
            items: Vec::new(),
        }
    }

    pub fn start(questions: Vec<QuizQuestion>) -> Self {
        let phase = if questions.is_empty() {
            QuizPhase::Empty
        } else {
            QuizPhase::Active
        };
        Self {
            phase,
            items: questions
                .into_iter()
                .map(|question| QuizItem { question, graded: None })
                .collect(),
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn answered(&self) -> usize {
        self.items.iter().filter(|item| item.is_answered()).count()
    }

    /// Grades `input` for the question at `index` (zero-based).
    pub fn answer(&mut self, index: usize, input: &str) -> AnswerOutcome {
        if self.phase != QuizPhase::Active {
            return AnswerOutcome::Ignored;
        }
        let Some(item) = self.items.get_mut(index) else {
            return AnswerOutcome::Ignored;
        };
        if item.is_answered() {
            return AnswerOutcome::Ignored;
        }

        let correct = answers_match(input, &item.question.answer);
        item.graded = Some(Graded {
            given: input.trim().to_string(),
            correct,
        });

        if self.items.iter().all(QuizItem::is_answered) {
            self.phase = QuizPhase::Complete;
        }

        if correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect {
                expected: self.items[index].question.answer.clone(),
            }
        }
    }

    /// Final score, available once complete.
    pub fn score(&self) -> Option<QuizScore> {
        if self.phase != QuizPhase::Complete {
            return None;
        }
        let correct = self
            .items
            .iter()
            .filter(|item| item.graded.as_ref().is_some_and(|g| g.correct))
            .count();
        Some(QuizScore::new(correct, self.items.len()))
    }
}

pub fn answers_match(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}
