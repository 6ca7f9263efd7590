use inquire::{Confirm, InquireError, Password, PasswordDisplayMode};
use seogeo_core::SecretPrompt;

/// Hidden terminal prompt for the DataForSEO credential.
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn prompt_secret(&self) -> Option<String> {
        read_api_key()
    }
}

/// Reads a key without echoing it. Blank input and cancellation yield `None`.
pub fn read_api_key() -> Option<String> {
    match Password::new("DataForSEO API key:")
        .with_display_mode(PasswordDisplayMode::Hidden)
        .with_help_message("login:password or the Base64 string from the dashboard, Esc to skip")
        .without_confirmation()
        .prompt()
    {
        Ok(value) if value.trim().is_empty() => None,
        Ok(value) => Some(value.trim().to_string()),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => None,
        Err(e) => {
            tracing::warn!("could not read API key: {}", e);
            None
        }
    }
}

/// Yes/no question defaulting to no. Cancellation counts as no.
pub fn confirm(question: &str) -> bool {
    match Confirm::new(question).with_default(false).prompt() {
        Ok(answer) => answer,
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => false,
        Err(e) => {
            tracing::warn!("could not read answer: {}", e);
            false
        }
    }
}
