//! Bonus-question collaborator interface.
//!
//! Question content lives outside the engine. A `QuestionSource` hands out
//! questions by index; the game only stores a shuffled order and a cursor
//! (`QuestionDeck`).

use serde::{Deserialize, Serialize};

use crate::core::rng::GameRng;

/// A multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: usize,
}

impl Question {
    pub fn new(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        answer_index: usize,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            answer_index,
        }
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.answer_index
    }
}

/// Supplies questions by index.
pub trait QuestionSource {
    fn len(&self) -> usize;

    fn question(&self, index: usize) -> Option<&Question>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QuestionSource for [Question] {
    fn len(&self) -> usize {
        <[Question]>::len(self)
    }

    fn question(&self, index: usize) -> Option<&Question> {
        self.get(index)
    }
}

impl QuestionSource for Vec<Question> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn question(&self, index: usize) -> Option<&Question> {
        self.get(index)
    }
}

/// Shuffled question order with a cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDeck {
    order: Vec<usize>,
    drawn: usize,
}

impl QuestionDeck {
    /// Shuffle the indices `0..count`.
    #[must_use]
    pub fn shuffled(count: usize, rng: &mut GameRng) -> Self {
        let mut order: Vec<usize> = (0..count).collect();
        rng.shuffle(&mut order);
        Self { order, drawn: 0 }
    }

    /// Questions not yet asked.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.order.len() - self.drawn
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.remaining() > 0
    }

    /// Take the next question index.
    pub fn draw(&mut self) -> Option<usize> {
        let index = *self.order.get(self.drawn)?;
        self.drawn += 1;
        Some(index)
    }

    /// Shuffled order, for inspection.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}
