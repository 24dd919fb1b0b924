//! The display surface the controller drives.
//!
//! DESIGN
//! ======
//! The controller never touches a concrete UI. A browser host maps these
//! calls onto DOM nodes; the terminal host prints them; tests record them.
//! All methods are infallible from the controller's point of view: a host
//! that cannot perform an action logs it and carries on.

use crate::api::ReportFormat;

use super::message::{Message, QuickReplySet};

/// What the credential modal should present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSpec {
    pub title: String,
    pub formats: Vec<ReportFormat>,
    pub default_format: ReportFormat,
}

pub trait ChatView {
    /// Append a message. `html` is the escaped, linkified rendering of `message.text`.
    fn render_message(&mut self, message: &Message, html: &str);

    /// Remove every rendered message.
    fn clear_messages(&mut self);

    fn show_quick_replies(&mut self, set: &QuickReplySet);

    fn remove_quick_replies(&mut self, id: &str);

    fn show_modal(&mut self, spec: &ModalSpec);

    /// Inline error inside the open modal.
    fn show_modal_error(&mut self, error: &str);

    fn close_modal(&mut self);

    /// Show or hide the Ask/Survey/Report menu.
    fn toggle_menu(&mut self, visible: bool);

    /// Show or hide the Home control.
    fn toggle_home(&mut self, visible: bool);

    /// Open `url` in a new browsing context.
    fn open_external(&mut self, url: &str);

    /// Hand a downloaded file to the visitor.
    fn save_file(&mut self, filename: &str, bytes: &[u8]);
}
