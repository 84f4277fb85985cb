//! Line-based console driving the drawing engine.
//!
//! ## Module Structure
//!
//! - [`parser`] - Command registry and line grammar
//! - [`session`] - Per-line dispatch against workspace and history
//! - [`input`] - Non-blocking stdin reader

mod input;
pub mod parser;
mod session;


pub use input::{ConsoleLine, StdinReader};
pub use session::{Console, Flow};

use std::io::Write;

use bevy::prelude::*;

use crate::canvas::Workspace;
use crate::config::{AppConfig, ConfigLoaded, ConfigResetNotification, SetUndoCapacityRequest};
use crate::editor::history::CommandHistoryManager;
use crate::report::{ReportLog, Reporter, Severity};

/// Startup system printing the greeting
fn print_banner() {
    println!(
        "vectorforge {} - type 'help' for commands",
        env!("CARGO_PKG_VERSION")
    );
}

/// System to run every line received since the last frame
fn process_console_lines(
    mut lines: MessageReader<ConsoleLine>,
    mut console: ResMut<Console>,
    mut workspace: ResMut<Workspace>,
    mut history: ResMut<CommandHistoryManager>,
    mut reports: ResMut<ReportLog>,
    mut capacity_requests: MessageWriter<SetUndoCapacityRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    for ConsoleLine(line) in lines.read() {
        trace!("console> {}", line);
        match console.handle_line(line, &mut workspace, &mut history, &mut *reports) {
            Flow::Continue => {}
            Flow::DefaultCapacity(capacity) => {
                capacity_requests.write(SetUndoCapacityRequest { capacity });
            }
            Flow::Quit => {
                info!("Quit requested from the console");
                exit.write(AppExit::Success);
                return;
            }
        }
    }
}

/// System to surface a config reset once
fn report_config_reset(
    mut notification: ResMut<ConfigResetNotification>,
    mut reports: ResMut<ReportLog>,
) {
    if !notification.show {
        return;
    }
    notification.show = false;
    if let Some(reason) = notification.reason.take() {
        reports.report_warning(&format!("{}; using default settings", reason));
    }
}

/// System to print buffered reports and the prompt
fn flush_reports(
    mut reports: ResMut<ReportLog>,
    mut console: ResMut<Console>,
    config: Res<AppConfig>,
) {
    let drained = reports.drain();
    let needs_prompt = console.take_needs_prompt();
    if drained.is_empty() && !needs_prompt {
        return;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for report in drained {
        let _ = match report.severity {
            Severity::Info => writeln!(out, "{}", report.message),
            Severity::Warning => writeln!(out, "warning: {}", report.message),
            Severity::Error => writeln!(out, "error: {}", report.message),
        };
    }
    let _ = write!(out, "{}", console.prompt_text(&config.data.prompt));
    let _ = out.flush();
}

pub struct ConsolePlugin;

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Console>()
            .init_resource::<ReportLog>()
            .init_resource::<StdinReader>()
            .add_message::<ConsoleLine>()
            .add_systems(Startup, print_banner.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    input::poll_stdin,
                    process_console_lines,
                    report_config_reset,
                    flush_reports,
                )
                    .chain(),
            );
    }
}
