//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{Container, NodeId, NodeKind, ResourceKind};

/// Build courses from modules and resources, reorder them by drag-and-drop commands
#[derive(Parser, Debug)]
#[command(name = "coursetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive shell (default)
    Shell,

    /// Run shell commands from a file, one per line
    Run {
        /// Script file ('#' starts a comment line)
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create global config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

/// One line typed into the shell.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    /// Create a course
    Course {
        title: String,
        #[arg(default_value = "")]
        description: String,
    },

    /// Add a module to a course
    Module { course: NodeId, title: String },

    /// Edit the pending resource of a module
    Draft {
        module: NodeId,
        #[command(subcommand)]
        field: DraftField,
    },

    /// Add the pending resource of a module
    Resource { course: NodeId, module: NodeId },

    /// Rename a course, module or resource (prompts when no title is given)
    Rename {
        kind: NodeKind,
        id: NodeId,
        title: Option<String>,
    },

    /// Delete a course, module or resource with everything below it
    Delete { kind: NodeKind, id: NodeId },

    /// Drop an item: drag <kind> <from> <index> [<to> <index>]
    Drag {
        kind: NodeKind,
        /// Source droppable, e.g. course-1 or module-1-2
        from: Container,
        from_index: usize,
        /// Destination droppable; omit to cancel the drag
        #[arg(requires = "to_index")]
        to: Option<Container>,
        to_index: Option<usize>,
    },

    /// Expand or collapse a course or module
    Toggle { kind: NodeKind, id: NodeId },

    /// Print the tree
    Show {
        /// Expand every course and module
        #[arg(short, long)]
        all: bool,
    },

    /// Print the tree as TOML
    Dump,

    /// Show the help message
    About,

    /// Show contact details
    Contact,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum DraftField {
    /// Resource title
    Title { value: String },
    /// link, image or pdf
    Kind { kind: ResourceKind },
    /// URL of a link resource
    Url { url: String },
    /// Image or PDF file
    File {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
        ShellLine::command().debug_assert();
    }

    #[test]
    fn given_drag_without_destination_when_parsing_then_destination_is_none() {
        let line = ShellLine::try_parse_from(["drag", "module", "course-1", "0"]).unwrap();
        assert_eq!(
            line.command,
            ShellCommand::Drag {
                kind: NodeKind::Module,
                from: Container::Course(NodeId::new(1)),
                from_index: 0,
                to: None,
                to_index: None,
            }
        );
    }

    #[test]
    fn given_destination_without_index_when_parsing_then_rejected() {
        let result = ShellLine::try_parse_from(["drag", "module", "course-1", "0", "course-2"]);
        assert!(result.is_err());
    }
}
