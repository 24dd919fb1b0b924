//! Chat widget controller: the mode state machine behind the message log.
//!
//! DESIGN
//! ======
//! `ChatWidget` is the single owner of session state. Hosts feed it visitor
//! actions (`select_mode`, `send_message`, `choose_quick_reply`,
//! `submit_credentials`, `cancel_modal`, `go_home`) and the timer events that
//! arrive on the scheduler's channel (`handle_event`). Every call runs to
//! completion under `&mut self`, so no two actions ever interleave; the only
//! suspension points are backend calls.
//!
//! States: Idle (menu visible) -> Ask | Survey | Report (menu hidden, Home
//! visible) -> Idle on Home. The first valid selection wins; later selections
//! are ignored until Home.
//!
//! TIMERS
//! ======
//! Delayed work (Ask "online" notice, opening the survey form, the survey
//! follow-up question, quick-reply expiry) is scheduled through
//! [`timer::Scheduler`]. Each event carries the token of the task that
//! produced it and is dropped unless the controller still holds that token,
//! so Home or an early answer beats an already-fired timer.
//!
//! ERROR HANDLING
//! ==============
//! Backend failures never escape: Ask and Survey failures become one bot
//! message, report failures become inline modal errors and the modal stays
//! open for another attempt.

pub mod copy;
pub mod followup;
pub mod message;
pub mod render;
pub mod session;
pub mod timer;
pub mod view;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ChatApi, Credentials, ReportFormat};
use crate::config::WidgetConfig;
use followup::FollowupAnswer;
use message::{Message, QuickReplyOption, QuickReplySet};
use session::{Mode, SessionState};
use timer::{Scheduler, TimerHandle, TimerToken};
use view::{ChatView, ModalSpec};

// =============================================================================
// EVENTS
// =============================================================================

/// Timer-driven events delivered back into the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Ask mode: announce that the assistant is online.
    OnlineNotice { token: TimerToken },
    /// Survey mode: open the external form.
    OpenSurveyForm { token: TimerToken },
    /// Survey mode: ask whether the form was filled in.
    FollowupDue { token: TimerToken },
    /// A quick-reply set reached the end of its lifetime.
    QuickRepliesExpired { id: String, token: TimerToken },
}

struct ActiveQuickReplies {
    set: QuickReplySet,
    expiry: TimerHandle,
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct ChatWidget<V: ChatView> {
    config: WidgetConfig,
    view: V,
    api: Arc<dyn ChatApi>,
    scheduler: Scheduler<WidgetEvent>,
    session: SessionState,
    log: Vec<Message>,
    /// One-shot notices (online message, form opening) keyed by token.
    notices: HashMap<TimerToken, TimerHandle>,
    quick_replies: HashMap<String, ActiveQuickReplies>,
    modal_open: bool,
}

impl<V: ChatView> ChatWidget<V> {
    #[must_use]
    pub fn new(config: WidgetConfig, view: V, api: Arc<dyn ChatApi>, scheduler: Scheduler<WidgetEvent>) -> Self {
        Self {
            config,
            view,
            api,
            scheduler,
            session: SessionState::new(),
            log: Vec::new(),
            notices: HashMap::new(),
            quick_replies: HashMap::new(),
            modal_open: false,
        }
    }

    // -------------------------------------------------------------------------
    // accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    #[must_use]
    pub fn quick_replies(&self, id: &str) -> Option<&QuickReplySet> {
        self.quick_replies.get(id).map(|active| &active.set)
    }

    #[must_use]
    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // visitor actions
    // -------------------------------------------------------------------------

    /// Greet the visitor and show the menu.
    pub fn start(&mut self) {
        self.post(Message::bot(copy::WELCOME));
        self.view.toggle_menu(true);
        self.view.toggle_home(false);
    }

    /// Menu click. Ignored once a mode is active; unknown names get a warning.
    pub fn select_mode(&mut self, name: &str) {
        if let Some(current) = self.session.mode() {
            debug!(requested = name, current = %current, "mode already selected, ignoring");
            return;
        }
        let mode = match name.parse::<Mode>() {
            Ok(mode) => mode,
            Err(e) => {
                warn!(error = %e, "invalid mode selection");
                self.post(Message::bot(copy::invalid_option(name)));
                return;
            }
        };
        self.session.select(mode);
        info!(mode = %mode, "mode selected");
        self.view.toggle_menu(false);
        self.view.toggle_home(true);

        match mode {
            Mode::Ask => {
                self.post(Message::bot(copy::ASK_ACK));
                let delay = self.config.online_delay;
                let handle = self
                    .scheduler
                    .schedule(delay, |token| WidgetEvent::OnlineNotice { token });
                self.notices.insert(handle.token(), handle);
            }
            Mode::Survey => {
                self.post(Message::bot(copy::SURVEY_ACK));
                let open_delay = self.config.form_open_delay;
                let handle = self
                    .scheduler
                    .schedule(open_delay, |token| WidgetEvent::OpenSurveyForm { token });
                self.notices.insert(handle.token(), handle);

                let followup_delay = self.config.followup_delay;
                let followup = self
                    .scheduler
                    .schedule(followup_delay, |token| WidgetEvent::FollowupDue { token });
                self.session.arm_followup(followup);
            }
            Mode::Report => {
                self.post(Message::bot(copy::REPORT_ACK));
                self.open_modal();
            }
        }
    }

    /// Text typed into the input box.
    pub async fn send_message(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.post(Message::user(text));

        if self.modal_open {
            self.post(Message::bot(copy::REPORT_IN_MODAL));
            return;
        }

        match self.session.mode() {
            None => self.post(Message::bot(copy::CHOOSE_FIRST)),
            Some(Mode::Ask) => self.ask(text).await,
            Some(Mode::Survey) => {
                if !self.session.awaiting_followup() {
                    self.post(Message::bot(copy::FOLLOWUP_DONE));
                } else if let Some(answer) = FollowupAnswer::classify(text) {
                    self.resolve_followup(answer).await;
                } else {
                    self.post(Message::bot(copy::FOLLOWUP_HINT));
                }
            }
            Some(Mode::Report) => self.post(Message::bot(copy::REPORT_DONE)),
        }
    }

    /// Quick-reply click. Ignored if the set already expired or was used.
    pub async fn choose_quick_reply(&mut self, set_id: &str, value: &str) {
        let Some(active) = self.quick_replies.get(set_id) else {
            debug!(set_id, "quick replies no longer present, ignoring click");
            return;
        };
        let Some(label) = active.set.option(value).map(|o| o.label.clone()) else {
            warn!(set_id, value, "quick reply value not in set");
            return;
        };
        self.drop_quick_replies(set_id);
        self.post(Message::user(label));

        if set_id == copy::FOLLOWUP_SET_ID {
            if let Ok(answer) = value.parse::<FollowupAnswer>() {
                self.resolve_followup(answer).await;
            }
        }
    }

    /// Settle the survey follow-up. Only the first call has any effect.
    pub async fn resolve_followup(&mut self, answer: FollowupAnswer) {
        if !self.session.awaiting_followup() {
            debug!(answer = %answer, "follow-up already resolved or not in survey");
            return;
        }
        self.session.answer_followup();
        self.drop_quick_replies(copy::FOLLOWUP_SET_ID);
        info!(answer = %answer, "survey follow-up resolved");

        match answer {
            FollowupAnswer::Yes => match self.api.survey_status().await {
                Ok(status) if status.is_ok() => self.post(Message::bot(copy::SURVEY_CONFIRMED)),
                Ok(status) => {
                    info!(status = ?status.status, "survey submission not confirmed");
                    self.post(Message::bot(copy::SURVEY_UNCONFIRMED));
                }
                Err(e) => {
                    warn!(error = %e, "survey status request failed");
                    self.post(Message::bot(copy::SURVEY_FAILED));
                }
            },
            FollowupAnswer::No => {
                let text = copy::survey_support(&self.config.support_phone, &self.config.contact_url);
                self.post(Message::bot(text));
            }
        }
    }

    /// Modal Submit. Empty fields are rejected without touching the network.
    pub async fn submit_credentials(&mut self, username: &str, password: &str, format: ReportFormat) {
        if !self.modal_open {
            debug!("submit without an open modal, ignoring");
            return;
        }
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            self.view.show_modal_error(copy::MISSING_CREDENTIALS);
            return;
        }

        let credentials = Credentials { username: username.to_string(), password: password.to_string() };
        match self.api.download_report(Some(&credentials), format).await {
            Ok(file) => {
                info!(filename = %file.filename, bytes = file.bytes.len(), "report downloaded");
                self.view.save_file(&file.filename, &file.bytes);
                self.modal_open = false;
                self.view.close_modal();
                self.post(Message::bot(copy::REPORT_THANKS));
                self.view.toggle_menu(false);
                self.view.toggle_home(true);
            }
            Err(e) => {
                warn!(error = %e, "report download rejected");
                self.view.show_modal_error(&e.user_message());
            }
        }
    }

    /// Modal Cancel: close it and hand the menu back.
    pub fn cancel_modal(&mut self) {
        if !self.modal_open {
            return;
        }
        self.modal_open = false;
        self.view.close_modal();
        self.post(Message::bot(copy::REPORT_CANCELLED));
        self.session.reset();
        self.view.toggle_menu(true);
        self.view.toggle_home(false);
    }

    /// Home: cancel everything pending, clear the log, show the menu.
    pub fn go_home(&mut self) {
        info!(mode = ?self.session.mode(), "returning home");
        self.session.reset();
        for (_, handle) in self.notices.drain() {
            handle.cancel();
        }
        let ids: Vec<String> = self.quick_replies.keys().cloned().collect();
        for id in ids {
            self.drop_quick_replies(&id);
        }
        if self.modal_open {
            self.modal_open = false;
            self.view.close_modal();
        }
        self.log.clear();
        self.view.clear_messages();
        self.start();
    }

    // -------------------------------------------------------------------------
    // timer events
    // -------------------------------------------------------------------------

    pub fn handle_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::OnlineNotice { token } => {
                if self.notices.remove(&token).is_some() {
                    self.post(Message::bot(copy::ASK_ONLINE));
                }
            }
            WidgetEvent::OpenSurveyForm { token } => {
                if self.notices.remove(&token).is_some() {
                    info!(url = %self.config.survey_form_url, "opening survey form");
                    self.view.open_external(&self.config.survey_form_url);
                }
            }
            WidgetEvent::FollowupDue { token } => {
                if self.session.take_followup(token) && self.session.awaiting_followup() {
                    self.post(Message::bot(copy::FOLLOWUP_QUESTION));
                    self.show_quick_replies(followup_set());
                } else {
                    debug!(token = token.get(), "stale follow-up timer");
                }
            }
            WidgetEvent::QuickRepliesExpired { id, token } => {
                let live = self
                    .quick_replies
                    .get(&id)
                    .is_some_and(|active| active.expiry.token() == token);
                if live {
                    debug!(set_id = %id, "quick replies expired");
                    self.quick_replies.remove(&id);
                    self.view.remove_quick_replies(&id);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // internals
    // -------------------------------------------------------------------------

    async fn ask(&mut self, text: &str) {
        match self.api.ask(text).await {
            Ok(reply) => {
                let reply = reply
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| copy::DEFAULT_REPLY.to_string());
                self.post(Message::bot(reply));
            }
            Err(e) => {
                warn!(error = %e, "ask request failed");
                self.post(Message::bot(copy::ASK_FAILED));
            }
        }
    }

    fn open_modal(&mut self) {
        if self.modal_open {
            return;
        }
        self.modal_open = true;
        self.view.show_modal(&ModalSpec {
            title: "Download report".to_string(),
            formats: vec![ReportFormat::Csv, ReportFormat::Xlsx],
            default_format: self.config.report_format,
        });
    }

    /// Show a quick-reply set with its expiry timer. No-op if `set.id` is live.
    fn show_quick_replies(&mut self, set: QuickReplySet) {
        if self.quick_replies.contains_key(&set.id) {
            return;
        }
        let id = set.id.clone();
        let lifetime = self.config.quick_reply_lifetime;
        let expiry = self.scheduler.schedule(lifetime, {
            let id = id.clone();
            move |token| WidgetEvent::QuickRepliesExpired { id, token }
        });
        self.view.show_quick_replies(&set);
        self.quick_replies.insert(id, ActiveQuickReplies { set, expiry });
    }

    fn drop_quick_replies(&mut self, id: &str) {
        if let Some(active) = self.quick_replies.remove(id) {
            active.expiry.cancel();
            self.view.remove_quick_replies(id);
        }
    }

    fn post(&mut self, message: Message) {
        let html = render::render_text(&message.text);
        self.view.render_message(&message, &html);
        self.log.push(message);
    }
}

fn followup_set() -> QuickReplySet {
    QuickReplySet {
        id: copy::FOLLOWUP_SET_ID.to_string(),
        options: vec![
            QuickReplyOption {
                label: copy::FOLLOWUP_YES_LABEL.to_string(),
                value: FollowupAnswer::Yes.value().to_string(),
            },
            QuickReplyOption {
                label: copy::FOLLOWUP_NO_LABEL.to_string(),
                value: FollowupAnswer::No.value().to_string(),
            },
        ],
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
