//! Interactive console prompts
//!
//! [`Prompter`] works over any reader/writer pair so the binaries can use the
//! terminal while tests feed scripted answers.

use crate::document::LayoutMode;
use crate::error::{Error, Result};
use crate::qr::ErrorCorrection;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Line-oriented question/answer helper
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompter bound to the process terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Wrap an input and output stream
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a line of guidance without waiting for an answer.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Ask `question` and return the answer without its line terminator.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Offer the two layout modes and, for fixed size, ask for the dimensions.
    pub fn choose_layout(&mut self) -> Result<LayoutMode> {
        self.say("Choose how images are placed:")?;
        self.say("1: Automatic columns")?;
        self.say("2: Fixed image size (cm)")?;

        let fixed = loop {
            match self.ask("Selection (1 or 2): ")?.trim() {
                "1" => break false,
                "2" => break true,
                _ => self.say("Invalid choice. Enter 1 or 2.")?,
            }
        };

        if !fixed {
            return Ok(LayoutMode::Auto);
        }
        self.ask_dimensions()
    }

    /// Ask for fixed image width and height in centimetres.
    ///
    /// A non-numeric answer to either question starts over from the width.
    pub fn ask_dimensions(&mut self) -> Result<LayoutMode> {
        loop {
            let Some(width_cm) = self.ask_number("Image width (cm): ")? else {
                continue;
            };
            let Some(height_cm) = self.ask_number("Image height (cm): ")? else {
                continue;
            };
            return Ok(LayoutMode::Fixed {
                width_cm,
                height_cm,
            });
        }
    }

    fn ask_number(&mut self, question: &str) -> Result<Option<f64>> {
        let answer = self.ask(question)?;
        match answer.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => {
                tracing::debug!(answer = %answer, "Rejected non-numeric answer");
                self.say("Please enter a number.")?;
                Ok(None)
            }
        }
    }

    /// Describe the levels and read one. An invalid letter is an error, not a retry.
    pub fn ask_level(&mut self, default: Option<ErrorCorrection>) -> Result<ErrorCorrection> {
        self.say("Choose an error-correction level:")?;
        for level in ErrorCorrection::ALL {
            self.say(&format!(
                "{}: about {}% recoverable",
                level.letter(),
                level.recovery_percent()
            ))?;
        }

        let question = match default {
            Some(level) => format!("Error-correction level (L/M/Q/H) [{level}]: "),
            None => "Error-correction level (L/M/Q/H): ".to_string(),
        };
        let answer = self.ask(&question)?;
        match (answer.trim().is_empty(), default) {
            (true, Some(level)) => Ok(level),
            _ => answer.parse(),
        }
    }

    /// Give back the underlying streams
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}
