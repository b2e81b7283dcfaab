//! Line-oriented session driving a [`CascadeSelector`].
//!
//! Each input line is one command. Levels are named by column or by 1-based
//! position; values containing spaces can be quoted.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use cascade_core::{CascadeSelector, UploadOutcome};
use cascade_model::{CellValue, EXPORT_MIME_TYPE, LevelChain};
use tracing::info;

use crate::render::{join_values, status_table};

pub const HELP: &str = "\
commands:
  load PATH                 read a workbook or CSV (first sheet, header row)
  options LEVEL             list the values LEVEL offers
  select LEVEL VALUE...     replace LEVEL's selection, clearing later levels
  clear LEVEL               clear LEVEL and every level after it
  reset                     clear every level
  id TEXT                   set the pending identifier
  add [ID]                  save the current selections as a combination
  status                    show every level and the pending count
  save [PATH]               write combinations as JSON lines and clear them
  help                      show this text
  quit                      leave the session";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Load(PathBuf),
    Options(String),
    Select { level: String, values: Vec<String> },
    Clear(String),
    Reset,
    Id(String),
    Add(Option<String>),
    Status,
    Save(Option<PathBuf>),
    Help,
    Quit,
}

/// Split a line on whitespace, keeping quoted runs together.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }
    if let Some(q) = quote {
        bail!("unterminated {q} quote");
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let mut tokens = tokenize(trimmed)?.into_iter();
    let Some(name) = tokens.next() else {
        return Ok(None);
    };
    let rest: Vec<String> = tokens.collect();
    let level_arg = |rest: &[String]| -> Result<String> {
        rest.first()
            .cloned()
            .ok_or_else(|| anyhow!("{name} needs a level"))
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "load" => match rest.as_slice() {
            [path] => SessionCommand::Load(PathBuf::from(path)),
            _ => bail!("usage: load PATH"),
        },
        "options" => SessionCommand::Options(level_arg(&rest)?),
        "select" => SessionCommand::Select {
            level: level_arg(&rest)?,
            values: rest[1..].to_vec(),
        },
        "clear" => SessionCommand::Clear(level_arg(&rest)?),
        "reset" => SessionCommand::Reset,
        "id" => SessionCommand::Id(rest.join(" ")),
        "add" => SessionCommand::Add((!rest.is_empty()).then(|| rest.join(" "))),
        "status" => SessionCommand::Status,
        "save" => match rest.as_slice() {
            [] => SessionCommand::Save(None),
            [path] => SessionCommand::Save(Some(PathBuf::from(path))),
            _ => bail!("usage: save [PATH]"),
        },
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Counts from one [`Session::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub executed: usize,
    pub failed: usize,
}

pub struct Session {
    selector: CascadeSelector,
    export_path: PathBuf,
    saves: usize,
    prompt: bool,
    stop_on_error: bool,
}

impl Session {
    pub fn new(chain: LevelChain, export_path: impl Into<PathBuf>) -> Self {
        Self {
            selector: CascadeSelector::new(chain),
            export_path: export_path.into(),
            saves: 0,
            prompt: false,
            stop_on_error: false,
        }
    }

    /// Print a `> ` prompt before each line.
    #[must_use]
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Abort [`run`](Self::run) on the first failing command.
    #[must_use]
    pub fn with_stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }

    pub fn selector(&self) -> &CascadeSelector {
        &self.selector
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    /// Number of successful `save` commands.
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Load `path` as the newest upload and describe the outcome on `out`.
    pub fn load<W: Write>(&mut self, path: &Path, out: &mut W) -> Result<UploadOutcome> {
        let outcome = self.selector.load_path(path);
        match outcome {
            UploadOutcome::Applied { rows } => {
                writeln!(out, "loaded {rows} rows from {}", path.display())?;
            }
            UploadOutcome::Failed => {
                writeln!(
                    out,
                    "could not read {}; no options available",
                    path.display()
                )?;
            }
            UploadOutcome::Stale => {}
        }
        Ok(outcome)
    }

    /// Write the combination log to `path` and clear it.
    ///
    /// The log is kept if the file cannot be written.
    pub fn save(&mut self, path: Option<&Path>) -> Result<(PathBuf, usize)> {
        let path = path.map_or_else(|| self.export_path.clone(), Path::to_path_buf);
        let count = self.selector.combinations().len();
        self.selector.export_log_with(|blob| -> Result<()> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            std::fs::write(&path, blob).with_context(|| format!("write {}", path.display()))
        })?;
        self.saves += 1;
        info!(path = %path.display(), count, mime = EXPORT_MIME_TYPE, "export written");
        Ok((path, count))
    }

    pub fn execute<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<Flow> {
        match command {
            SessionCommand::Load(path) => {
                self.load(&path, out)?;
            }
            SessionCommand::Options(level) => {
                let level = self.resolve(&level)?;
                self.write_options(level, out)?;
            }
            SessionCommand::Select { level, values } => {
                let level = self.resolve(&level)?;
                let values = self.match_values(level, &values);
                let cleared = self.selector.set_level(level, values)?;
                self.write_selection(level, cleared, out)?;
            }
            SessionCommand::Clear(level) => {
                let level = self.resolve(&level)?;
                let cleared = self.selector.clear_level(level)?;
                self.write_selection(level, cleared, out)?;
            }
            SessionCommand::Reset => {
                self.selector.reset_selections();
                writeln!(out, "all levels cleared")?;
            }
            SessionCommand::Id(text) => {
                self.selector.set_identifier(text);
                writeln!(out, "id: {}", self.selector.identifier())?;
            }
            SessionCommand::Add(id) => {
                let id = id.unwrap_or_else(|| self.selector.identifier().to_string());
                let pending = self.selector.add(id.clone());
                writeln!(out, "added \"{id}\" ({pending} pending)")?;
            }
            SessionCommand::Status => {
                writeln!(out, "{}", status_table(&self.selector.level_views()))?;
                writeln!(out, "pending: {}", self.selector.pending_count())?;
            }
            SessionCommand::Save(path) => {
                let (path, count) = self.save(path.as_deref())?;
                writeln!(
                    out,
                    "saved {count} combinations to {} ({EXPORT_MIME_TYPE})",
                    path.display()
                )?;
            }
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands until end of input or `quit`.
    ///
    /// Failing commands are reported on `out` as `error: ...`; with
    /// stop-on-error the first one is returned instead, tagged with its line.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> Result<RunReport> {
        let mut report = RunReport::default();
        let mut line = String::new();
        let mut line_no = 0;
        loop {
            if self.prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;
            let result = parse_command(&line).and_then(|command| match command {
                Some(command) => self.execute(command, out).map(Some),
                None => Ok(None),
            });
            match result {
                Ok(None) => {}
                Ok(Some(flow)) => {
                    report.executed += 1;
                    if flow == Flow::Quit {
                        break;
                    }
                }
                Err(error) if self.stop_on_error => {
                    return Err(error.context(format!("line {line_no}: {}", line.trim())));
                }
                Err(error) => {
                    report.failed += 1;
                    writeln!(out, "error: {error:#}")?;
                }
            }
        }
        Ok(report)
    }

    fn resolve(&self, level: &str) -> Result<usize> {
        Ok(self.selector.chain().resolve(level)?)
    }

    /// Map typed tokens to offered values by their display text. Tokens that
    /// match nothing are passed through as text and rejected downstream.
    fn match_values(&self, level: usize, tokens: &[String]) -> Vec<CellValue> {
        let offered = self.selector.options(level);
        tokens
            .iter()
            .map(|token| {
                offered
                    .iter()
                    .find(|value| value.to_string() == *token)
                    .cloned()
                    .unwrap_or_else(|| CellValue::text(token.as_str()))
            })
            .collect()
    }

    fn column(&self, level: usize) -> &str {
        self.selector
            .chain()
            .get(level)
            .map_or("", |spec| spec.column.as_str())
    }

    fn write_options<W: Write>(&self, level: usize, out: &mut W) -> Result<()> {
        let column = self.column(level);
        if !self.selector.is_enabled(level) {
            let parent = self
                .selector
                .chain()
                .parent_of(level)
                .map_or("", |parent| self.column(parent));
            writeln!(out, "{column} is disabled until {parent} has a selection")?;
            return Ok(());
        }
        let max = self
            .selector
            .chain()
            .get(level)
            .map_or(0, |spec| spec.max_selections);
        writeln!(out, "{column} (max {max}):")?;
        let options = self.selector.options(level);
        if options.is_empty() {
            writeln!(out, "- (no options)")?;
        }
        for value in options {
            writeln!(out, "- {value}")?;
        }
        Ok(())
    }

    fn write_selection<W: Write>(&self, level: usize, cleared: usize, out: &mut W) -> Result<()> {
        let selected = self.selector.selection(level);
        let shown = if selected.is_empty() {
            "(none)".to_string()
        } else {
            join_values(selected)
        };
        write!(out, "{}: {shown}", self.column(level))?;
        if cleared > 0 {
            write!(out, " (cleared {cleared} later levels)")?;
        }
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_keeps_quoted_runs() {
        assert_eq!(
            tokenize(r#"select L_1 "New York" 'a b' plain"#).unwrap(),
            vec!["select", "L_1", "New York", "a b", "plain"]
        );
        assert_eq!(tokenize(r#"id """#).unwrap(), vec!["id", ""]);
        assert!(tokenize(r#"select L_1 "open"#).is_err());
    }

    #[test]
    fn parse_recognizes_commands() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("# note").unwrap(), None);
        assert_eq!(
            parse_command("SELECT 2 X Y").unwrap(),
            Some(SessionCommand::Select {
                level: "2".to_string(),
                values: vec!["X".to_string(), "Y".to_string()],
            })
        );
        assert_eq!(
            parse_command("reset").unwrap(),
            Some(SessionCommand::Reset)
        );
        assert_eq!(
            parse_command("add").unwrap(),
            Some(SessionCommand::Add(None))
        );
        assert_eq!(
            parse_command("id batch 7").unwrap(),
            Some(SessionCommand::Id("batch 7".to_string()))
        );
        assert_eq!(
            parse_command("save out.jsonl").unwrap(),
            Some(SessionCommand::Save(Some(PathBuf::from("out.jsonl"))))
        );
        assert!(parse_command("options").is_err());
        assert!(parse_command("frobnicate").is_err());
    }
}
