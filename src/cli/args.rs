//! Command-line argument parsing for the notely CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use chrono::NaiveDate;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Sign in with a code sent to `email`
    SignIn { email: String },
    /// Create an account and sign in
    SignUp {
        email: String,
        name: String,
        date_of_birth: Option<NaiveDate>,
    },
    /// List notes
    List,
    /// Create a note
    Add { content: String },
    /// Replace a note's content
    Edit { id: String, content: String },
    /// Delete a note
    Remove { id: String },
    /// Forget the session
    SignOut,
    /// Show whether a session is held
    Status,
    /// Arguments that could not be parsed
    Invalid(String),
}

/// Usage text printed by `help` and on invalid arguments.
pub const USAGE: &str = "\
Usage: notely <command>

Commands:
  signin <email>                              Sign in with a one-time code
  signup <email> --name <name> [--dob DATE]   Create an account (DATE is YYYY-MM-DD)
  notes                                       List your notes
  add <content>                               Create a note
  edit <id> <content>                         Replace a note's content
  rm <id>                                     Delete a note
  signout                                     Sign out
  status                                      Show session status
  --version                                   Show version";

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use notely::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["notely".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();
    let Some(command) = args.first() else {
        return CliCommand::Help;
    };
    let rest = &args[1..];

    match command.as_str() {
        "--version" | "-V" => CliCommand::Version,
        "--help" | "-h" | "help" => CliCommand::Help,
        "signin" => match rest {
            [email] => CliCommand::SignIn {
                email: email.clone(),
            },
            _ => CliCommand::Invalid("signin takes exactly one email".to_string()),
        },
        "signup" => parse_signup(rest),
        "notes" | "ls" => CliCommand::List,
        "add" if !rest.is_empty() => CliCommand::Add {
            content: rest.join(" "),
        },
        "add" => CliCommand::Invalid("add needs note content".to_string()),
        "edit" if rest.len() >= 2 => CliCommand::Edit {
            id: rest[0].clone(),
            content: rest[1..].join(" "),
        },
        "edit" => CliCommand::Invalid("edit needs an id and note content".to_string()),
        "rm" | "delete" => match rest {
            [id] => CliCommand::Remove { id: id.clone() },
            _ => CliCommand::Invalid("rm takes exactly one id".to_string()),
        },
        "signout" => CliCommand::SignOut,
        "status" => CliCommand::Status,
        other => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}

fn parse_signup(rest: &[String]) -> CliCommand {
    let mut email = None;
    let mut name = None;
    let mut date_of_birth = None;

    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--name" => match iter.next() {
                Some(value) => name = Some(value.clone()),
                None => return CliCommand::Invalid("--name needs a value".to_string()),
            },
            "--dob" => match iter.next().map(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d")) {
                Some(Ok(date)) => date_of_birth = Some(date),
                Some(Err(_)) => {
                    return CliCommand::Invalid("--dob must be YYYY-MM-DD".to_string())
                }
                None => return CliCommand::Invalid("--dob needs a value".to_string()),
            },
            value if email.is_none() && !value.starts_with("--") => {
                email = Some(value.to_string())
            }
            other => return CliCommand::Invalid(format!("unexpected argument '{}'", other)),
        }
    }

    match (email, name) {
        (Some(email), Some(name)) => CliCommand::SignUp {
            email,
            name,
            date_of_birth,
        },
        (None, _) => CliCommand::Invalid("signup needs an email".to_string()),
        (_, None) => CliCommand::Invalid("signup needs --name".to_string()),
    }
}
