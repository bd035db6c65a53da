//! Terminal prompting. The hidden password read is the only OS-specific part
//! and is delegated to `rpassword`.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

pub trait Prompter {
    /// Reads one line of visible input.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Reads one line without echoing it.
    fn read_secret(&mut self, prompt: &str) -> Result<String>;
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        let n = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read from stdin")?;
        if n == 0 {
            anyhow::bail!("stdin closed while waiting for input");
        }
        Ok(line)
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String> {
        rpassword::prompt_password(prompt).context("read password")
    }
}

/// Asks until a non-empty (trimmed) answer is given.
pub fn ask<P: Prompter + ?Sized>(prompter: &mut P, prompt: &str, hidden: bool) -> Result<String> {
    loop {
        let answer = if hidden {
            prompter.read_secret(prompt)?
        } else {
            prompter.read_line(prompt)?
        };
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use std::collections::VecDeque;

    /// Answers prompts from a queue and records which prompts were hidden.
    #[derive(Default)]
    pub struct ScriptedPrompter {
        pub answers: VecDeque<String>,
        pub asked: Vec<(String, bool)>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|s| s.to_string()).collect(),
                asked: Vec::new(),
            }
        }

        fn next(&mut self, prompt: &str, hidden: bool) -> Result<String> {
            self.asked.push((prompt.to_string(), hidden));
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("no scripted answer for {:?}", prompt))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn read_line(&mut self, prompt: &str) -> Result<String> {
            self.next(prompt, false)
        }

        fn read_secret(&mut self, prompt: &str) -> Result<String> {
            self.next(prompt, true)
        }
    }
}
