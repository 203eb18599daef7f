//! Shell session: maps shell commands onto the course builder API.

use std::sync::Arc;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, instrument};

use crate::application::services::CourseBuilderService;
use crate::cli::args::{DraftField, ShellCommand, ShellLine};
use crate::cli::error::{CliError, CliResult};
use crate::cli::render::render_tree;
use crate::config::Settings;
use crate::domain::{DragEvent, DraftUpdate, DropLocation, NoOpReason, NodeKind, Outcome};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::Prompter;
use crate::infrastructure::InfraError;

/// What the shell should print after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The tree changed.
    Done(String),
    /// Well-formed request that had no effect.
    Unchanged(String),
    /// Data to print as is.
    Text(String),
    /// Nothing to print.
    Silent,
    Quit,
}

/// Split a shell line into words. Single and double quotes group words.
pub fn split_line(line: &str) -> CliResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if let Some(q) = quote {
        return Err(CliError::InvalidArgs(format!("unterminated {q} quote")));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn rename_prompt(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Course => "New Course Title:",
        NodeKind::Module => "New Module Title:",
        NodeKind::Resource => "New Resource Title:",
    }
}

fn outcome_reply(outcome: Outcome, done: String) -> Reply {
    match outcome {
        Outcome::Applied => Reply::Done(done),
        Outcome::Unchanged(reason) => Reply::Unchanged(reason.to_string()),
    }
}

pub struct Session {
    service: CourseBuilderService,
    settings: Arc<Settings>,
    prompter: Arc<dyn Prompter>,
}

impl Session {
    pub fn new(container: &ServiceContainer) -> Self {
        Self {
            service: container.course_builder(),
            settings: Arc::clone(&container.settings),
            prompter: Arc::clone(&container.prompter),
        }
    }

    pub fn service(&self) -> &CourseBuilderService {
        &self.service
    }

    /// Parse and run one line. Blank lines and `#` comments are skipped.
    pub fn execute_line(&mut self, line: &str) -> CliResult<Reply> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(Reply::Silent);
        }
        let words = split_line(trimmed)?;
        match ShellLine::try_parse_from(words) {
            Ok(parsed) => self.execute(parsed.command),
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                Ok(Reply::Text(e.to_string()))
            }
            Err(e) => Err(CliError::Usage(e.to_string().trim_end().to_string())),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, command: ShellCommand) -> CliResult<Reply> {
        let reply = match command {
            ShellCommand::Course { title, description } => {
                let course = self.service.create_course(&title, &description).value;
                Reply::Done(format!("created course {} ({})", course.id, course.title))
            }
            ShellCommand::Module { course, title } => {
                let module = self.service.add_module(course, &title)?.value;
                Reply::Done(format!(
                    "added module {} ({}) to course {}",
                    module.id, module.title, course
                ))
            }
            ShellCommand::Draft { module, field } => {
                let update = match field {
                    DraftField::Title { value } => DraftUpdate::Title(value),
                    DraftField::Kind { kind } => DraftUpdate::Kind(kind),
                    DraftField::Url { url } => DraftUpdate::Url(url),
                    DraftField::File { path } => DraftUpdate::File(path),
                };
                let draft = self.service.set_draft(module, update)?;
                Reply::Text(format!(
                    "draft for module {}: '{}' [{}] {:?}",
                    module, draft.title, draft.kind, draft.payload
                ))
            }
            ShellCommand::Resource { course, module } => {
                let resource = self.service.add_resource(course, module)?.value;
                Reply::Done(format!(
                    "added {} resource {} ({}) to module {}",
                    resource.kind, resource.id, resource.title, module
                ))
            }
            ShellCommand::Rename { kind, id, title } => {
                let title = match title {
                    Some(title) => Some(title),
                    None => self
                        .prompter
                        .prompt(rename_prompt(kind))
                        .map_err(|e| InfraError::io("read rename prompt", e))?,
                };
                let outcome = self.service.rename(kind, id, title.as_deref())?.value;
                outcome_reply(outcome, format!("renamed {kind} {id}"))
            }
            ShellCommand::Delete { kind, id } => {
                let removal = self.service.delete(kind, id).value;
                if removal.is_empty() {
                    Reply::Unchanged(format!("{}: {kind} {id}", NoOpReason::AbsentNode))
                } else {
                    Reply::Done(format!(
                        "deleted {kind} {id} ({} modules, {} resources)",
                        removal.modules.len(),
                        removal.resources.len()
                    ))
                }
            }
            ShellCommand::Drag {
                kind,
                from,
                from_index,
                to,
                to_index,
            } => {
                let destination = to
                    .zip(to_index)
                    .map(|(container, index)| DropLocation::new(container, index));
                let event = DragEvent::new(kind, DropLocation::new(from, from_index), destination);
                let outcome = self.service.resolve_drag(&event)?.value;
                outcome_reply(outcome, format!("moved {kind}"))
            }
            ShellCommand::Toggle { kind, id } => {
                let open = match kind {
                    NodeKind::Course => self.service.toggle_course(id).value,
                    NodeKind::Module => self.service.toggle_module(id).value,
                    NodeKind::Resource => {
                        return Err(CliError::InvalidArgs(
                            "only courses and modules can be toggled".into(),
                        ))
                    }
                };
                let state = if open.is_some() { "expanded" } else { "collapsed" };
                Reply::Text(format!("{kind} {id} {state}"))
            }
            ShellCommand::Show { all } => Reply::Text(render_tree(
                &self.service.snapshot(),
                &self.service.view(),
                all,
            )),
            ShellCommand::Dump => {
                let snapshot = self.service.snapshot();
                let text = toml::to_string_pretty(&*snapshot)
                    .map_err(|e| CliError::Usage(format!("serialize tree: {e}")))?;
                Reply::Text(text)
            }
            ShellCommand::About => {
                self.prompter.alert(&self.settings.help_message);
                Reply::Silent
            }
            ShellCommand::Contact => {
                self.prompter.alert(&self.settings.contact_message);
                Reply::Silent
            }
            ShellCommand::Quit => Reply::Quit,
        };
        debug!("reply: {:?}", reply);
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("course Intro", vec!["course", "Intro"])]
    #[case("course \"Intro to Rust\" 'first steps'", vec!["course", "Intro to Rust", "first steps"])]
    #[case("  rename  course 1   ''", vec!["rename", "course", "1", ""])]
    #[case("draft 2 url https://x.org/a?b=c", vec!["draft", "2", "url", "https://x.org/a?b=c"])]
    fn given_line_when_splitting_then_quotes_group_words(
        #[case] line: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(split_line(line).unwrap(), expected);
    }

    #[test]
    fn given_unterminated_quote_when_splitting_then_invalid_args() {
        assert!(matches!(
            split_line("course \"Intro"),
            Err(CliError::InvalidArgs(_))
        ));
    }
}
