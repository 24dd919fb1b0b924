//! Olyph chat widget: a three-mode support assistant (Ask, Survey, Report).
//!
//! [`widget::ChatWidget`] owns the conversation state and drives a
//! [`widget::view::ChatView`]; [`api::ChatApi`] is its only way out to the
//! backend. [`terminal`] hosts the widget on stdin/stdout.

pub mod api;
pub mod config;
pub mod terminal;
pub mod widget;
