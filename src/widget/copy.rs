//! Bot-facing text.

pub const WELCOME: &str = "Hi! I'm Olyph AI. Choose an option below: Ask, Survey or Report.";
pub const CHOOSE_FIRST: &str = "Please choose an option first: Ask, Survey or Report.";

pub const ASK_ACK: &str = "Great, ask me anything about Olyphaunt Solutions.";
pub const ASK_ONLINE: &str = "🟢 Olyph AI is online. Type your question below.";
pub const DEFAULT_REPLY: &str = "🤖 I'm not certain about that. Could you rephrase or provide more details?";
pub const ASK_FAILED: &str = "⚠️ Something went wrong. Please try again later.";

pub const SURVEY_ACK: &str = "Thanks for helping us! Opening the survey in a new tab...";
pub const FOLLOWUP_QUESTION: &str = "Have you filled in the survey?";
pub const FOLLOWUP_SET_ID: &str = "survey-followup";
pub const FOLLOWUP_YES_LABEL: &str = "Yes, I filled it";
pub const FOLLOWUP_NO_LABEL: &str = "No, not yet";
pub const FOLLOWUP_HINT: &str = "Please reply yes or no: have you filled in the survey?";
pub const FOLLOWUP_DONE: &str = "Your survey answer is already noted. Use Home to start over.";
pub const SURVEY_CONFIRMED: &str = "✅ Thank you! Your survey response has been recorded.";
pub const SURVEY_UNCONFIRMED: &str =
    "We couldn't confirm your submission yet. If you just submitted, it may take a moment to appear.";
pub const SURVEY_FAILED: &str = "⚠️ Could not reach the survey service. Please try again later.";

pub const REPORT_ACK: &str = "Please sign in to download the report.";
pub const REPORT_IN_MODAL: &str = "Please complete the sign-in dialog to download the report.";
pub const REPORT_DONE: &str = "Your report is ready. Use Home to start over.";
pub const REPORT_THANKS: &str = "✅ Your report has been downloaded. Thank you!";
pub const REPORT_CANCELLED: &str = "Report download cancelled.";
pub const MISSING_CREDENTIALS: &str = "Please enter both username and password.";

/// Warning for an option name that is not on the menu.
#[must_use]
pub fn invalid_option(name: &str) -> String {
    format!("⚠️ \"{}\" is not a valid option. Please choose Ask, Survey or Report.", name.trim())
}

/// Reply for visitors who have not filled in the survey yet.
#[must_use]
pub fn survey_support(phone: &str, contact_url: &str) -> String {
    format!("No problem! If you need help, call us at {phone} or reach us at {contact_url}")
}
