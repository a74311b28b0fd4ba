//! Interactive terminal view over the registration session

use anyhow::Result;
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use regdesk::{
    FormField, RegistrationController, RegistrationState, Session, SubmitAttempt, SubmitStatus,
};
use std::sync::Arc;

enum Leave {
    Logout,
    Quit,
}

pub async fn run(session: &mut Session) -> Result<()> {
    let term = Term::stdout();
    term.clear_screen()?;
    print_banner();

    loop {
        let Some(controller) = login(session)? else {
            return Ok(());
        };

        let leave = registration(&controller).await?;
        session.logout();
        println!();
        println!("  {} Logged out", style("ℹ").blue());

        if let Leave::Quit = leave {
            return Ok(());
        }
    }
}

fn print_banner() {
    println!();
    println!("{}", style("  Registration Desk").cyan().bold());
    println!(
        "  {}",
        style("Sign in to submit your registration details").dim()
    );
    println!();
}

/// Prompt until the credentials match or the user quits
fn login(session: &mut Session) -> Result<Option<Arc<RegistrationController>>> {
    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("  Sign in")
            .items(&["Sign In", "Quit"])
            .default(0)
            .interact()?;
        if choice == 1 {
            return Ok(None);
        }

        let email: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("  Email ID")
            .allow_empty(true)
            .interact_text()?;
        let password: String = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("  Password")
            .allow_empty_password(true)
            .interact()?;

        match session.login(&email, &password) {
            Ok(controller) => {
                println!("  {} Signed in", style("✓").green());
                println!();
                return Ok(Some(controller));
            }
            Err(e) => {
                println!("  {} {}", style("✗").red(), style(e).red());
                println!();
            }
        }
    }
}

async fn registration(controller: &RegistrationController) -> Result<Leave> {
    let fields = FormField::ALL;
    let mut items: Vec<String> = fields
        .iter()
        .map(|f| format!("Edit {}", f.label()))
        .collect();
    items.push("Submit Details".to_string());
    items.push("Logout".to_string());
    items.push("Quit".to_string());
    let submit = fields.len();

    loop {
        print_form(&controller.snapshot());

        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("  Registration")
            .items(&items)
            .default(submit)
            .interact()?;

        if let Some(field) = fields.get(choice) {
            edit_field(controller, *field)?;
            continue;
        }
        match choice - submit {
            0 => submit_form(controller).await?,
            1 => return Ok(Leave::Logout),
            _ => return Ok(Leave::Quit),
        }
    }
}

fn edit_field(controller: &RegistrationController, field: FormField) -> Result<()> {
    let current = controller.snapshot().form().get(field).to_string();
    let required = if field.is_required() { " *" } else { "" };
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("  {}{}", field.label(), required))
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    controller.edit(field, value);
    Ok(())
}

async fn submit_form(controller: &RegistrationController) -> Result<()> {
    match controller.request_submit() {
        SubmitAttempt::Busy => {
            println!("  {} Submitting...", style("→").cyan());
        }
        SubmitAttempt::Invalid(errors) => {
            println!();
            for message in errors.values() {
                println!("  {} {}", style("✗").red(), style(message).red());
            }
        }
        SubmitAttempt::AwaitingConfirmation => {
            println!();
            println!("  {}", style("Confirm Submission").bold());
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("  Would you like to submit your details?")
                .default(true)
                .interact()?;
            if !confirmed {
                controller.cancel();
                println!("  {} Cancelled", style("✗").red());
                return Ok(());
            }
            println!("  {} Submitting...", style("→").cyan());
            // Outcome is rendered from the state on the next redraw
            if controller.confirm().await.is_none() {
                println!(
                    "  {} {}",
                    style("⚠").yellow(),
                    style("Submission not started: another one is still in progress").yellow()
                );
            }
        }
    }
    Ok(())
}

fn print_form(state: &RegistrationState) {
    println!();
    println!("  {}", style("Registration Details").bold());
    println!();
    for field in FormField::ALL {
        let value = state.form().get(field);
        let shown = if value.is_empty() {
            style("-".to_string()).dim()
        } else {
            style(value.to_string()).cyan()
        };
        let marker = if field.is_required() { "*" } else { " " };
        println!("  {}{:<14} {}", marker, field.label(), shown);
        if let Some(error) = state.error(field) {
            println!("  {:<15} {}", "", style(error).red());
        }
    }
    println!();

    match state.status() {
        SubmitStatus::Idle => {}
        SubmitStatus::Success => {
            println!(
                "  {} {}",
                style("✓").green(),
                style("Details submitted successfully.").green()
            );
        }
        SubmitStatus::Error(message) => {
            let message = if message.is_empty() {
                "Submission failed. Please try again."
            } else {
                message.as_str()
            };
            println!("  {} {}", style("✗").red(), style(message).red());
        }
    }
    if state.is_submitting() {
        println!("  {} Submitting...", style("→").cyan());
    }
    println!();
}
