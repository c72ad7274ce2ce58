//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with status and session history
//! - Symptom entry (typed, or spoken via `audio`)
//! - Prediction report, read aloud when voice is on

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use ui::Activity;
pub use worker::{AssistantWorker, WorkerHandle, WorkerProgress, WorkerTask};
