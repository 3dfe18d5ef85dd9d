//! Command handlers.
//!
//! Each handler talks to a [`Notely`] client and writes human-readable output.
//! Input and output are passed in so the handlers can run against buffers.

use color_eyre::eyre::{eyre, Result};
use std::io::{BufRead, Write};

use super::args::{CliCommand, USAGE};
use super::version::version_line;
use crate::app::Notely;
use crate::auth::{AuthFlow, CodeDelivery, OtpChallenge, SignUpProfile};
use crate::error::NotelyError;
use crate::notes::{Note, NotesViewStatus};
use crate::routing::{GuardDecision, RedirectReason, Route};

/// Typed at the code prompt to ask for a new code.
const RESEND: &str = "r";

/// Run a parsed command.
pub async fn run_command<R: BufRead, W: Write>(
    app: &Notely,
    command: CliCommand,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    match command {
        CliCommand::Version => writeln!(out, "{}", version_line())?,
        CliCommand::Help => writeln!(out, "{}", USAGE)?,
        CliCommand::Invalid(reason) => {
            writeln!(out, "{}\n\n{}", reason, USAGE)?;
            return Err(eyre!("invalid arguments: {}", reason));
        }
        CliCommand::SignIn { email } => {
            authenticate(app, AuthFlow::SignIn, &email, input, out).await?
        }
        CliCommand::SignUp {
            email,
            name,
            date_of_birth,
        } => {
            let flow = AuthFlow::SignUp(SignUpProfile {
                name,
                date_of_birth,
            });
            authenticate(app, flow, &email, input, out).await?
        }
        CliCommand::List => {
            let notes = report(out, app.load().await)?;
            print_notes(out, &notes, app.view_status())?;
        }
        CliCommand::Add { content } => {
            report(out, app.load().await)?;
            let note = report(out, app.create(&content).await)?;
            writeln!(out, "Created note {}", note.id)?;
        }
        CliCommand::Edit { id, content } => {
            report(out, app.load().await)?;
            let note = report(out, app.update(&id, &content).await)?;
            writeln!(out, "Updated note {}", note.id)?;
        }
        CliCommand::Remove { id } => {
            report(out, app.load().await)?;
            report(out, app.delete(&id).await)?;
            writeln!(out, "Deleted note {}", id)?;
        }
        CliCommand::SignOut => {
            app.sign_out().await;
            writeln!(out, "Signed out")?;
        }
        CliCommand::Status => print_status(app, out)?,
    }
    Ok(())
}

/// Request a code, then prompt until a code verifies or input ends.
async fn authenticate<R: BufRead, W: Write>(
    app: &Notely,
    flow: AuthFlow,
    email: &str,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let mut challenge = app.challenge(flow);
    let delivery = report(out, app.request_code(&mut challenge, email).await)?;
    print_delivery(out, &challenge, &delivery)?;

    loop {
        write!(out, "Enter code ({} to resend): ", RESEND)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            challenge.abandon();
            writeln!(out)?;
            return Err(eyre!("cancelled"));
        }
        let line = line.trim();

        if line.eq_ignore_ascii_case(RESEND) {
            match app.resend_code(&mut challenge).await {
                Ok(delivery) => print_delivery(out, &challenge, &delivery)?,
                Err(e) => writeln!(out, "{}", e.user_message())?,
            }
            continue;
        }

        match app.verify_code(&mut challenge, email, line).await {
            Ok(user) => {
                let who = user
                    .map(|u| u.name)
                    .unwrap_or_else(|| challenge.email().to_string());
                writeln!(out, "Signed in as {}", who)?;
                return Ok(());
            }
            Err(e @ NotelyError::Validation { .. })
            | Err(e @ NotelyError::Verification { .. }) => writeln!(out, "{}", e.user_message())?,
            Err(e) if e.is_retryable() => writeln!(out, "{}", e.user_message())?,
            Err(e) => {
                writeln!(out, "{}", e.user_message())?;
                return Err(e.into());
            }
        }
    }
}

fn print_delivery<W: Write>(
    out: &mut W,
    challenge: &OtpChallenge,
    delivery: &CodeDelivery,
) -> Result<()> {
    let minutes = delivery.valid_for.as_secs() / 60;
    writeln!(
        out,
        "A code was sent to {}. It is valid for {} minute{}.",
        challenge.email(),
        minutes,
        if minutes == 1 { "" } else { "s" }
    )?;
    if let Some(code) = &delivery.code {
        writeln!(out, "Code: {}", code)?;
    }
    Ok(())
}

fn print_notes<W: Write>(out: &mut W, notes: &[Note], status: NotesViewStatus) -> Result<()> {
    match status {
        NotesViewStatus::Loading => writeln!(out, "Loading...")?,
        NotesViewStatus::Empty => writeln!(out, "No notes yet. Create your first one!")?,
        NotesViewStatus::Populated => {
            for note in notes {
                writeln!(
                    out,
                    "{}  {}  {}",
                    note.id,
                    note.created_at.format("%Y-%m-%d"),
                    note.content
                )?;
            }
        }
    }
    Ok(())
}

fn print_status<W: Write>(app: &Notely, out: &mut W) -> Result<()> {
    let line = match app.navigate(Route::Dashboard) {
        GuardDecision::Allow { .. } => "Signed in",
        GuardDecision::Redirect {
            reason: RedirectReason::SessionExpired,
            ..
        } => "Session expired. Sign in again.",
        GuardDecision::Redirect {
            reason: RedirectReason::NoSession,
            ..
        } => "Not signed in",
    };
    writeln!(out, "{} ({})", line, app.config().api_base_url)?;
    Ok(())
}

/// Print the user-facing message for a failure before returning it.
fn report<T, W: Write>(out: &mut W, result: Result<T, NotelyError>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            writeln!(out, "{}", e.user_message())?;
            Err(e.into())
        }
    }
}
