//! Interactive input: line sources, the quit sentinel and typed field prompts

use crate::error::{ExplorerError, Result as ExplorerResult};
use crate::ui::menu::COMMANDS;
use anyhow::Result;
use crossterm::style::Stylize;
use reedline::{
    default_emacs_keybindings, ColumnarMenu, Completer, Emacs, FileBackedHistory, KeyCode,
    KeyModifiers, MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, Reedline, ReedlineEvent, ReedlineMenu, Signal, Span, Suggestion,
};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::debug;

const HISTORY_SIZE: usize = 200;
const COMPLETION_MENU: &str = "command_completion";

/// Outcome of a prompt: a value, or the user asked to leave
#[derive(Debug, Clone, PartialEq)]
pub enum PromptInput<T> {
    Value(T),
    Quit,
}

/// `q` or `quit` in any case, surrounding whitespace ignored
pub fn is_quit(input: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit")
}

pub fn parse_patient_id(input: &str) -> ExplorerResult<i64> {
    input.trim().parse::<i64>().map_err(|_| {
        ExplorerError::InvalidInput(format!(
            "Please enter a valid numerical value for the patient ID, got '{}'",
            input.trim()
        ))
    })
}

pub fn parse_threshold(input: &str) -> ExplorerResult<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            ExplorerError::InvalidInput(format!(
                "Please enter a valid number, got '{}'",
                input.trim()
            ))
        })
}

/// Where input lines come from. `None` means the input ended (Ctrl-C,
/// Ctrl-D or end of a script).
pub trait LineSource {
    fn read_line(&mut self, label: &str) -> Result<Option<String>>;
}

/// Prompt showing a field label, e.g. `Patient ID: `
struct FieldPrompt<'a> {
    label: &'a str,
}

impl Prompt for FieldPrompt<'_> {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.label)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => "> ".into(),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                reedline::PromptViMode::Normal => "N> ".into(),
                reedline::PromptViMode::Insert => "I> ".into(),
            },
            PromptEditMode::Custom(str) => format!("{str}> ").into(),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse search: {})",
            prefix, history_search.term
        ))
    }
}

/// Tab completion for the backslash commands
pub struct CommandCompleter;

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let input = &line[..pos];
        if !input.starts_with('\\') || input.contains(' ') {
            return Vec::new();
        }

        COMMANDS
            .iter()
            .filter(|(name, _)| name.starts_with(input))
            .map(|(name, description)| Suggestion {
                value: name.to_string(),
                description: Some(description.to_string()),
                extra: None,
                span: Span { start: 0, end: pos },
                style: None,
                append_whitespace: matches!(*name, "\\load" | "\\export"),
            })
            .collect()
    }
}

/// Terminal line editor with history and command completion
pub struct ReedlineSource {
    editor: Reedline,
}

impl ReedlineSource {
    pub fn new(history_file: Option<PathBuf>) -> Result<Self> {
        let completion_menu = Box::new(
            ColumnarMenu::default()
                .with_name(COMPLETION_MENU)
                .with_columns(1)
                .with_column_padding(2),
        );

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
        );

        let mut editor = Reedline::create()
            .with_completer(Box::new(CommandCompleter))
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(Box::new(Emacs::new(keybindings)));

        if let Some(path) = history_file {
            let history = FileBackedHistory::with_file(HISTORY_SIZE, path)?;
            editor = editor.with_history(Box::new(history));
        }

        Ok(Self { editor })
    }
}

impl LineSource for ReedlineSource {
    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        match self.editor.read_line(&FieldPrompt { label })? {
            Signal::Success(line) => Ok(Some(line)),
            Signal::CtrlC | Signal::CtrlD => Ok(None),
        }
    }
}

/// Replays fixed lines, for piped stdin and tests
#[derive(Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self::new(lines))
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        let line = self.lines.pop_front();
        debug!("Scripted input for '{}': {:?}", label, line);
        Ok(line)
    }
}

/// Ask until a non-empty answer arrives. The quit sentinel and the end of
/// input both yield `Quit`.
pub fn prompt_text(source: &mut dyn LineSource, label: &str) -> Result<PromptInput<String>> {
    loop {
        let Some(line) = source.read_line(label)? else {
            return Ok(PromptInput::Quit);
        };
        let line = line.trim();

        if is_quit(line) {
            return Ok(PromptInput::Quit);
        }
        if !line.is_empty() {
            return Ok(PromptInput::Value(line.to_string()));
        }
        println!("{}", format!("Please enter a valid input for {}", label).yellow());
    }
}

/// Ask until `parse` accepts the answer; rejections are printed and the
/// question repeated
pub fn prompt_parsed<T, F>(
    source: &mut dyn LineSource,
    label: &str,
    parse: F,
) -> Result<PromptInput<T>>
where
    F: Fn(&str) -> ExplorerResult<T>,
{
    loop {
        match prompt_text(source, label)? {
            PromptInput::Quit => return Ok(PromptInput::Quit),
            PromptInput::Value(text) => match parse(&text) {
                Ok(value) => return Ok(PromptInput::Value(value)),
                Err(e) => eprintln!("{}", e.to_string().red()),
            },
        }
    }
}
