use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Outcome of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    Value(T),
    /// Ctrl-D / end of input
    Cancelled,
    /// Ctrl-C
    Interrupted,
}

/// Parses a 1-based menu number into a 0-based index.
pub fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let n = input.trim().parse::<usize>().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

/// Line-based prompts on top of rustyline.
pub struct Prompter {
    editor: DefaultEditor,
}

impl Prompter {
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Self { editor: DefaultEditor::new()? })
    }

    fn read(&mut self, prompt: &str) -> Result<Answer<String>, ReadlineError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Answer::Value(line)),
            Err(ReadlineError::Interrupted) => Ok(Answer::Interrupted),
            Err(ReadlineError::Eof) => Ok(Answer::Cancelled),
            Err(e) => Err(e),
        }
    }

    /// Shows numbered choices and asks until a valid number is entered.
    pub fn select(&mut self, title: &str, choices: &[String]) -> Result<Answer<usize>, ReadlineError> {
        println!("{}", title.bold());
        for (i, choice) in choices.iter().enumerate() {
            println!("  {} {}", format!("{:>2}.", i + 1).cyan(), choice);
        }

        loop {
            let input = match self.read(&format!("Select [1-{}]: ", choices.len()))? {
                Answer::Value(input) => input,
                Answer::Cancelled => return Ok(Answer::Cancelled),
                Answer::Interrupted => return Ok(Answer::Interrupted),
            };
            if input.trim().is_empty() {
                continue;
            }
            match parse_choice(&input, choices.len()) {
                Some(index) => return Ok(Answer::Value(index)),
                None => println!("{}", format!("Please enter a number between 1 and {}", choices.len()).yellow()),
            }
        }
    }

    /// Asks for a line of free text, trimmed.
    pub fn text(&mut self, message: &str) -> Result<Answer<String>, ReadlineError> {
        Ok(match self.read(&format!("{} ", message))? {
            Answer::Value(text) => {
                let text = text.trim().to_string();
                if !text.is_empty() {
                    let _ = self.editor.add_history_entry(text.as_str());
                }
                Answer::Value(text)
            }
            other => other,
        })
    }

    /// Waits for Enter.
    pub fn pause(&mut self) -> Result<Answer<()>, ReadlineError> {
        Ok(match self.read("Press Enter to continue...")? {
            Answer::Value(_) => Answer::Value(()),
            Answer::Cancelled => Answer::Cancelled,
            Answer::Interrupted => Answer::Interrupted,
        })
    }
}
