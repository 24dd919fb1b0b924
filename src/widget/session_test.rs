use super::*;
use crate::widget::timer::Scheduler;
use std::time::Duration;

#[test]
fn mode_parses_case_insensitively() {
    assert_eq!(" Ask ".parse::<Mode>().unwrap(), Mode::Ask);
    assert_eq!("SURVEY".parse::<Mode>().unwrap(), Mode::Survey);
    assert_eq!("report".parse::<Mode>().unwrap(), Mode::Report);
}

#[test]
fn unknown_mode_is_rejected() {
    let err = "feedback".parse::<Mode>().unwrap_err();
    assert_eq!(err, ModeParseError("feedback".into()));
    assert_eq!(err.to_string(), "unknown option 'feedback'");
}

#[test]
fn new_session_is_unselected() {
    let state = SessionState::new();
    assert_eq!(state.mode(), None);
    assert!(!state.option_selected());
    assert!(!state.survey_followup_answered());
    assert!(state.pending_followup().is_none());
}

#[test]
fn first_selection_wins() {
    let mut state = SessionState::new();
    assert!(state.select(Mode::Report));
    assert!(!state.select(Mode::Ask));
    assert_eq!(state.mode(), Some(Mode::Report));
    assert!(state.option_selected());
}

#[tokio::test(start_paused = true)]
async fn answering_latches_and_cancels_timer() {
    let (mut scheduler, _rx) = Scheduler::<()>::channel();
    let mut state = SessionState::new();
    state.select(Mode::Survey);
    state.arm_followup(scheduler.schedule(Duration::from_secs(60), |_| ()));
    assert!(state.awaiting_followup());

    assert!(state.answer_followup());
    assert!(!state.answer_followup());
    assert!(state.pending_followup().is_none());
    assert!(!state.awaiting_followup());
}

#[tokio::test(start_paused = true)]
async fn take_followup_only_matches_armed_token() {
    let (mut scheduler, _rx) = Scheduler::<()>::channel();
    let mut state = SessionState::new();
    state.select(Mode::Survey);
    let stale = scheduler.schedule(Duration::from_secs(1), |_| ());
    let stale_token = stale.token();
    state.arm_followup(stale);
    let live = scheduler.schedule(Duration::from_secs(1), |_| ());
    let live_token = live.token();
    state.arm_followup(live);

    assert!(!state.take_followup(stale_token));
    assert!(state.take_followup(live_token));
    assert!(state.pending_followup().is_none());
}

#[tokio::test(start_paused = true)]
async fn reset_restores_initial_state() {
    let (mut scheduler, _rx) = Scheduler::<()>::channel();
    let mut state = SessionState::new();
    state.select(Mode::Survey);
    state.arm_followup(scheduler.schedule(Duration::from_secs(60), |_| ()));
    state.answer_followup();

    state.reset();
    assert_eq!(state.mode(), None);
    assert!(!state.survey_followup_answered());
    assert!(state.pending_followup().is_none());
    assert!(state.select(Mode::Ask));
}
