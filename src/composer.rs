use crate::DeviceFinding;

pub const NOTIFICATION_TITLE: &str = "Batterivarning";
pub const CRITICAL_HEADING: &str = "🚨 KRITISK LÅG BATTERI:";
pub const LOW_HEADING: &str = "⚠️ Lågt batteri:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    title: String,
    body: String,
    critical_count: usize,
    low_count: usize,
}

impl NotificationMessage {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn critical_count(&self) -> usize {
        self.critical_count
    }

    pub fn low_count(&self) -> usize {
        self.low_count
    }
}

/// Builds the consolidated notification, `None` when there is nothing to report.
pub fn compose(critical: &[DeviceFinding], low: &[DeviceFinding]) -> Option<NotificationMessage> {
    if critical.is_empty() && low.is_empty() {
        return None;
    }

    let mut lines: Vec<&str> = Vec::with_capacity(critical.len() + low.len() + 3);
    if !critical.is_empty() {
        lines.push(CRITICAL_HEADING);
        lines.extend(critical.iter().map(|f| f.description.as_str()));
        lines.push("");
    }
    if !low.is_empty() {
        lines.push(LOW_HEADING);
        lines.extend(low.iter().map(|f| f.description.as_str()));
    }

    Some(NotificationMessage {
        title: NOTIFICATION_TITLE.to_owned(),
        body: lines.join("\n"),
        critical_count: critical.len(),
        low_count: low.len(),
    })
}
