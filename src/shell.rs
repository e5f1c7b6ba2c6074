//! Line commands for the interactive shell.

use clap::{Parser, Subcommand};

use crate::app::{App, Confirm};
use crate::error::{ActionError, ActionResult};
use crate::forms;
use crate::models::{AssignmentKind, TaskPatch};
use crate::quiz::AnswerOutcome;
use crate::view::AuthPane;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the current view
    Show,
    /// Re-read the session and reload everything
    Refresh,
    /// Show the welcome pane
    Welcome,
    /// Show the sign-in pane
    LoginForm,
    /// Show the registration pane
    RegisterForm,
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        email: String,
        password: String,
    },
    Logout,
    /// Set the language you are learning (2-3 letter code)
    Language {
        code: String,
    },
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Vocab(VocabCommand),
    #[command(subcommand)]
    Quiz(QuizCommand),
    #[command(subcommand)]
    Assignment(AssignmentCommand),
    Quit,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum TaskCommand {
    Add {
        #[arg(required = true)]
        name: Vec<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },
    Done {
        id: i64,
    },
    Undo {
        id: i64,
    },
    Rename {
        id: i64,
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Set or clear (no date) the due date
    Due {
        id: i64,
        date: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum VocabCommand {
    Add {
        #[arg(required = true)]
        word: Vec<String>,
        /// Defaults to your learning language
        #[arg(long)]
        lang: Option<String>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum QuizCommand {
    Start,
    /// Answer question N (1-based)
    Answer {
        number: usize,
        #[arg(required = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum AssignmentCommand {
    /// basic, translation, fill_blank or multiple_choice
    Generate {
        kind: String,
    },
    Open {
        id: i64,
    },
    /// Option number for multiple choice, text otherwise
    Answer {
        question: String,
        #[arg(required = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    Submit,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// `Ok(None)` for a blank line. Parse errors carry clap's rendered message.
pub fn parse(input: &str) -> Result<Option<Command>, clap::Error> {
    let words: Vec<&str> = input.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    Line::try_parse_from(words).map(|line| Some(line.command))
}

pub async fn execute(app: &mut App, command: Command, confirm: &dyn Confirm) -> Flow {
    let result = match command {
        Command::Quit => return Flow::Quit,
        Command::Show => Ok(()),
        Command::Refresh => {
            app.refresh().await;
            Ok(())
        }
        Command::Welcome => {
            app.show_pane(AuthPane::Welcome);
            Ok(())
        }
        Command::LoginForm => {
            app.show_pane(AuthPane::Login);
            Ok(())
        }
        Command::RegisterForm => {
            app.show_pane(AuthPane::Register);
            Ok(())
        }
        Command::Login { username, password } => app.login(&username, &password).await,
        Command::Register {
            username,
            email,
            password,
        } => app.register(&username, &email, &password).await,
        Command::Logout => app.logout().await,
        Command::Language { code } => app.set_language(&code).await,
        Command::Task(command) => execute_task(app, command, confirm).await,
        Command::Vocab(VocabCommand::Add { word, lang }) => app.add_vocab(&word.join(" "), lang.as_deref()).await,
        Command::Quiz(QuizCommand::Start) => app.start_quiz().await,
        Command::Quiz(QuizCommand::Answer { number, text }) => {
            let outcome = match number.checked_sub(1) {
                Some(index) => app.answer_quiz(index, &text.join(" ")),
                None => AnswerOutcome::Ignored,
            };
            tracing::debug!(?outcome, question = number, "quiz answer");
            Ok(())
        }
        Command::Assignment(command) => execute_assignment(app, command).await,
    };

    if let Err(err) = result {
        tracing::debug!(error = %err, validation = err.is_validation(), "command failed");
    }
    Flow::Continue
}

async fn execute_task(app: &mut App, command: TaskCommand, confirm: &dyn Confirm) -> ActionResult<()> {
    match command {
        TaskCommand::Add { name, due } => {
            let due = due.as_deref().map(forms::parse_due_date).transpose()?;
            app.create_task(&name.join(" "), due).await
        }
        TaskCommand::Done { id } => app.set_task_completed(id, true).await,
        TaskCommand::Undo { id } => app.set_task_completed(id, false).await,
        TaskCommand::Rename { id, name } => app.update_task(id, TaskPatch::renamed(name.join(" "))).await,
        TaskCommand::Due { id, date } => {
            let date = date.as_deref().map(forms::parse_due_date).transpose()?;
            app.update_task(id, TaskPatch::due(date)).await
        }
        TaskCommand::Delete { id } => app.delete_task(id, confirm).await.map(|_| ()),
    }
}

async fn execute_assignment(app: &mut App, command: AssignmentCommand) -> ActionResult<()> {
    match command {
        AssignmentCommand::Generate { kind } => {
            let kind: AssignmentKind = kind.parse().map_err(ActionError::Validation)?;
            app.generate_assignment(kind).await.map(|_| ())
        }
        AssignmentCommand::Open { id } => app.open_assignment(id).await,
        AssignmentCommand::Answer { question, value } => app.answer_assignment(&question, &value.join(" ")),
        AssignmentCommand::Submit => app.submit_assignment().await.map(|_| ()),
        AssignmentCommand::Close => {
            app.close_assignment();
            Ok(())
        }
    }
}
