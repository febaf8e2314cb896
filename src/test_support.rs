//! Shared test doubles.

use std::{collections::VecDeque, io};

use crate::usecases::sign_in::LineTerminal;

/// Scripted terminal: queued input lines, captured output. `None` plays an
/// EOF.
pub struct FakeTerminal {
    inputs: VecDeque<Option<String>>,
    pub output: Vec<String>,
}

impl FakeTerminal {
    pub fn new(inputs: Vec<Option<&str>>) -> Self {
        Self {
            inputs: inputs
                .into_iter()
                .map(|item| item.map(|value| value.to_owned()))
                .collect(),
            output: Vec::new(),
        }
    }
}

impl LineTerminal for FakeTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_owned());
        Ok(())
    }

    fn prompt_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.inputs.pop_front().flatten())
    }
}
