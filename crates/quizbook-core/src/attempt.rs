//! Interactive quiz attempts.
//!
//! The scoring loop talks to the outside world only through [`AttemptIo`], so
//! the same code runs against a terminal ([`ConsoleIo`]) or a canned answer
//! script ([`ScriptedIo`]).

use std::collections::VecDeque;
use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::error::{AnswerError, QuizError, Result};
use crate::model::{Question, Quiz, ScoreRecord};

/// Everything an attempt needs from its user.
pub trait AttemptIo {
    fn on_quiz_start(&mut self, quiz: &Quiz) -> Result<()>;

    fn show_question(&mut self, number: usize, question: &Question) -> Result<()>;

    /// Read one raw answer line. `None` means input is exhausted.
    fn read_answer(&mut self) -> Result<Option<String>>;

    fn on_invalid_answer(&mut self, error: &AnswerError) -> Result<()>;

    fn on_quiz_complete(&mut self, quiz: &Quiz, record: &ScoreRecord) -> Result<()>;
}

/// Parse a typed answer into a 1-based option number.
pub fn parse_answer(input: &str, option_count: usize) -> std::result::Result<usize, AnswerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnswerError::Empty);
    }
    let answer: i64 = trimmed
        .parse()
        .map_err(|_| AnswerError::NotANumber(trimmed.to_string()))?;
    if answer < 1 || answer as u64 > option_count as u64 {
        return Err(AnswerError::OutOfRange {
            answer,
            option_count,
        });
    }
    Ok(answer as usize)
}

impl Quiz {
    /// Ask every question in order and score the answers.
    ///
    /// Rejected answers re-prompt the same question as often as needed. If
    /// input runs out first the attempt fails with
    /// [`QuizError::AttemptAborted`].
    pub fn attempt(&self, io: &mut dyn AttemptIo) -> Result<ScoreRecord> {
        io.on_quiz_start(self)?;

        let mut score = 0;
        for (i, question) in self.questions().iter().enumerate() {
            io.show_question(i + 1, question)?;

            let answer = loop {
                let Some(line) = io.read_answer()? else {
                    return Err(QuizError::AttemptAborted);
                };
                match parse_answer(&line, question.options().len()) {
                    Ok(answer) => break answer,
                    Err(e) => io.on_invalid_answer(&e)?,
                }
            };

            if question.is_correct(answer) {
                score += 1;
            }
        }

        let record = ScoreRecord::new(score, self.len())?;
        io.on_quiz_complete(self, &record)?;
        Ok(record)
    }
}

/// Line-oriented terminal IO over any reader/writer pair.
pub struct ConsoleIo<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleIo<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` without a newline and read the reply.
    ///
    /// Returns `None` at end of input. The trailing line break is stripped.
    pub fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> AttemptIo for ConsoleIo<R, W> {
    fn on_quiz_start(&mut self, quiz: &Quiz) -> Result<()> {
        self.say(format_args!(
            "\n--- Starting Quiz: {} ({} Questions) ---",
            quiz.title(),
            quiz.len()
        ))
    }

    fn show_question(&mut self, _number: usize, question: &Question) -> Result<()> {
        self.say(format_args!("\n{question}"))
    }

    fn read_answer(&mut self) -> Result<Option<String>> {
        self.prompt("Your answer (enter the number, e.g., 1, 2...): ")
    }

    fn on_invalid_answer(&mut self, error: &AnswerError) -> Result<()> {
        self.say(format_args!("Invalid input. Please try again. ({error})"))
    }

    fn on_quiz_complete(&mut self, _quiz: &Quiz, _record: &ScoreRecord) -> Result<()> {
        self.say("--- Quiz Finished ---")
    }
}

/// Feeds a fixed list of answer lines and records what the attempt did.
#[derive(Debug, Default)]
pub struct ScriptedIo {
    answers: VecDeque<String>,
    /// Questions shown, by 1-based number.
    pub shown: Vec<usize>,
    /// Every rejected answer, in order.
    pub rejected: Vec<AnswerError>,
    pub completed: bool,
}

impl ScriptedIo {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Answer lines not consumed by the attempt.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl AttemptIo for ScriptedIo {
    fn on_quiz_start(&mut self, _quiz: &Quiz) -> Result<()> {
        Ok(())
    }

    fn show_question(&mut self, number: usize, _question: &Question) -> Result<()> {
        self.shown.push(number);
        Ok(())
    }

    fn read_answer(&mut self) -> Result<Option<String>> {
        Ok(self.answers.pop_front())
    }

    fn on_invalid_answer(&mut self, error: &AnswerError) -> Result<()> {
        self.rejected.push(error.clone());
        Ok(())
    }

    fn on_quiz_complete(&mut self, _quiz: &Quiz, _record: &ScoreRecord) -> Result<()> {
        self.completed = true;
        Ok(())
    }
}
