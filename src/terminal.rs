//! Terminal host: a line-oriented [`ChatView`] plus the input dispatcher.
//!
//! SYSTEM CONTEXT
//! ==============
//! A browser host maps the view calls onto DOM nodes; this host prints them
//! and reads visitor actions from stdin, one line each:
//!
//! - `/ask`, `/survey`, `/report` (or any other `/name`) select a mode
//! - `/home` returns to the menu, `/quit` exits
//! - `/yes`, `/no` press the matching quick reply when one is visible
//! - `/cancel` cancels the credential dialog
//! - anything else is a chat message
//!
//! While the credential dialog is open, lines fill its fields in order:
//! username, password, format.

use std::io::Write;
use std::path::PathBuf;

use crate::api::ReportFormat;
use crate::widget::ChatWidget;
use crate::widget::message::{Message, QuickReplySet, Sender};
use crate::widget::view::{ChatView, ModalSpec};

// =============================================================================
// INPUT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Select(String),
    Home,
    QuickReply(String),
    Cancel,
    Quit,
    Text(String),
}

/// Classify one line of visitor input.
#[must_use]
pub fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Text(trimmed.to_string());
    };
    match command.to_ascii_lowercase().as_str() {
        "home" => Input::Home,
        "quit" | "exit" => Input::Quit,
        "cancel" => Input::Cancel,
        "yes" => Input::QuickReply("yes".into()),
        "no" => Input::QuickReply("no".into()),
        _ => Input::Select(command.to_string()),
    }
}

// =============================================================================
// MODAL FORM
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub username: String,
    pub password: String,
    pub format: ReportFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Stage {
    Username,
    Password { username: String },
    Format { username: String, password: String },
}

/// Collects the credential dialog's fields one line at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalForm {
    spec: ModalSpec,
    stage: Stage,
}

impl ModalForm {
    #[must_use]
    pub fn new(spec: ModalSpec) -> Self {
        Self { spec, stage: Stage::Username }
    }

    /// Prompt for the field the next line fills.
    #[must_use]
    pub fn prompt(&self) -> String {
        match self.stage {
            Stage::Username => "username:".to_string(),
            Stage::Password { .. } => "password:".to_string(),
            Stage::Format { .. } => {
                let names: Vec<&str> = self.spec.formats.iter().map(|f| f.as_str()).collect();
                format!("format ({}) [{}]:", names.join("/"), self.spec.default_format)
            }
        }
    }

    /// Start over from the username field.
    pub fn restart(&mut self) {
        self.stage = Stage::Username;
    }

    /// Consume one line. Returns the completed submission after the last field.
    ///
    /// # Errors
    ///
    /// Returns a message when the format line names an unsupported format;
    /// the form stays on the format field.
    pub fn feed(&mut self, line: &str) -> Result<Option<Submission>, String> {
        let value = line.trim_end_matches(['\r', '\n']).to_string();
        match std::mem::replace(&mut self.stage, Stage::Username) {
            Stage::Username => {
                self.stage = Stage::Password { username: value };
                Ok(None)
            }
            Stage::Password { username } => {
                self.stage = Stage::Format { username, password: value };
                Ok(None)
            }
            Stage::Format { username, password } => {
                let format = if value.trim().is_empty() {
                    self.spec.default_format
                } else {
                    match value.parse::<ReportFormat>() {
                        Ok(format) if self.spec.formats.contains(&format) => format,
                        Ok(_) | Err(_) => {
                            let message = format!("unsupported format '{}'", value.trim());
                            self.stage = Stage::Format { username, password };
                            return Err(message);
                        }
                    }
                };
                Ok(Some(Submission { username, password, format }))
            }
        }
    }
}

// =============================================================================
// VIEW
// =============================================================================

pub struct TerminalView<W: Write> {
    out: W,
    download_dir: PathBuf,
    quick_replies: Vec<QuickReplySet>,
    modal: Option<ModalForm>,
}

impl<W: Write> TerminalView<W> {
    #[must_use]
    pub fn new(out: W, download_dir: PathBuf) -> Self {
        Self { out, download_dir, quick_replies: Vec::new(), modal: None }
    }

    #[must_use]
    pub fn out(&self) -> &W {
        &self.out
    }

    #[must_use]
    pub fn modal_active(&self) -> bool {
        self.modal.is_some()
    }

    /// Id of the visible set offering `value`, if any.
    #[must_use]
    pub fn quick_reply_for(&self, value: &str) -> Option<&str> {
        self.quick_replies
            .iter()
            .find(|set| set.option(value).is_some())
            .map(|set| set.id.as_str())
    }

    /// Feed a line to the open dialog, printing the next prompt or a format error.
    pub fn feed_modal(&mut self, line: &str) -> Option<Submission> {
        let form = self.modal.as_mut()?;
        let result = form.feed(line);
        let prompt = form.prompt();
        match result {
            Ok(Some(submission)) => Some(submission),
            Ok(None) => {
                self.line(&format!("  {prompt}"));
                None
            }
            Err(message) => {
                self.line(&format!("  ! {message}"));
                self.line(&format!("  {prompt}"));
                None
            }
        }
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::debug!(error = %e, "terminal write failed");
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render_message(&mut self, message: &Message, _html: &str) {
        let prefix = match message.sender {
            Sender::User => "you>",
            Sender::Bot => "olyph>",
        };
        self.line(&format!("{prefix} {}", message.text));
    }

    fn clear_messages(&mut self) {
        self.line("----------------------------------------");
    }

    fn show_quick_replies(&mut self, set: &QuickReplySet) {
        let buttons: Vec<String> = set
            .options
            .iter()
            .map(|o| format!("[/{}] {}", o.value, o.label))
            .collect();
        self.line(&format!("  {}", buttons.join("   ")));
        self.quick_replies.retain(|s| s.id != set.id);
        self.quick_replies.push(set.clone());
    }

    fn remove_quick_replies(&mut self, id: &str) {
        self.quick_replies.retain(|s| s.id != id);
    }

    fn show_modal(&mut self, spec: &ModalSpec) {
        let form = ModalForm::new(spec.clone());
        let prompt = form.prompt();
        self.modal = Some(form);
        self.line(&format!("== {} == (/cancel to abort)", spec.title));
        self.line(&format!("  {prompt}"));
    }

    fn show_modal_error(&mut self, error: &str) {
        let Some(form) = self.modal.as_mut() else {
            return;
        };
        form.restart();
        let prompt = form.prompt();
        self.line(&format!("  ! {error}"));
        self.line(&format!("  {prompt}"));
    }

    fn close_modal(&mut self) {
        self.modal = None;
    }

    fn toggle_menu(&mut self, visible: bool) {
        if visible {
            self.line("  options: /ask  /survey  /report");
        }
    }

    fn toggle_home(&mut self, visible: bool) {
        if visible {
            self.line("  (/home to start over)");
        }
    }

    fn open_external(&mut self, url: &str) {
        self.line(&format!("  -> open in your browser: {url}"));
    }

    fn save_file(&mut self, filename: &str, bytes: &[u8]) {
        let path = self.download_dir.join(filename);
        match std::fs::write(&path, bytes) {
            Ok(()) => {
                tracing::info!(path = %path.display(), bytes = bytes.len(), "report saved");
                self.line(&format!("  saved {}", path.display()));
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "report save failed");
                self.line(&format!("  ! could not save {}: {e}", path.display()));
            }
        }
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Route one input line to the widget. Returns `false` when the visitor quits.
pub async fn dispatch<W: Write>(widget: &mut ChatWidget<TerminalView<W>>, line: &str) -> bool {
    let input = parse_line(line);

    if widget.view().modal_active() {
        match input {
            Input::Quit => return false,
            Input::Cancel => widget.cancel_modal(),
            Input::Home => widget.go_home(),
            _ => {
                if let Some(submission) = widget.view_mut().feed_modal(line) {
                    widget
                        .submit_credentials(&submission.username, &submission.password, submission.format)
                        .await;
                }
            }
        }
        return true;
    }

    match input {
        Input::Quit => return false,
        Input::Select(name) => widget.select_mode(&name),
        Input::Home => widget.go_home(),
        Input::Cancel => {}
        Input::QuickReply(value) => match widget.view().quick_reply_for(&value).map(str::to_owned) {
            Some(set_id) => widget.choose_quick_reply(&set_id, &value).await,
            None => widget.send_message(&value).await,
        },
        Input::Text(text) => widget.send_message(&text).await,
    }
    true
}

#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;
