//! User-facing message sink.
//!
//! Engine code hands every non-fatal problem to a [`Reporter`] instead of
//! printing it. The [`ReportLog`] resource buffers the messages for the
//! console to print and mirrors each one into the log.

use bevy::prelude::*;

pub trait Reporter {
    fn report_error(&mut self, message: &str);
    fn report_warning(&mut self, message: &str);
    fn report_info(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub severity: Severity,
    pub message: String,
}

#[derive(Resource, Debug, Default)]
pub struct ReportLog {
    entries: Vec<Report>,
}

impl ReportLog {
    #[allow(dead_code)]
    pub fn entries(&self) -> &[Report] {
        &self.entries
    }

    pub fn drain(&mut self) -> Vec<Report> {
        std::mem::take(&mut self.entries)
    }

    #[allow(dead_code)]
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.with_severity(Severity::Error)
    }

    #[allow(dead_code)]
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.with_severity(Severity::Warning)
    }

    #[allow(dead_code)]
    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |report| report.severity == severity)
            .map(|report| report.message.as_str())
    }

    fn push(&mut self, severity: Severity, message: &str) {
        self.entries.push(Report {
            severity,
            message: message.to_string(),
        });
    }
}

impl Reporter for ReportLog {
    fn report_error(&mut self, message: &str) {
        warn!("reported error: {}", message);
        self.push(Severity::Error, message);
    }

    fn report_warning(&mut self, message: &str) {
        info!("reported warning: {}", message);
        self.push(Severity::Warning, message);
    }

    fn report_info(&mut self, message: &str) {
        debug!("{}", message);
        self.push(Severity::Info, message);
    }
}
