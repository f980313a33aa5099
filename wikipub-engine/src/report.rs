//! Outcome summary of a publish run.

/// Counters for every kind of remote change a run performed (or skipped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub pages_added: u32,
    pub pages_updated: u32,
    /// Pages whose content hash and title both matched; no remote write issued.
    pub pages_unchanged: u32,
    pub pages_deleted: u32,
    pub attachments_added: u32,
    pub attachments_updated: u32,
    pub attachments_deleted: u32,
    pub labels_added: u32,
    pub labels_deleted: u32,
}

impl PublishReport {
    /// True when the run issued at least one remote write.
    pub fn has_changes(&self) -> bool {
        self.pages_added
            + self.pages_updated
            + self.pages_deleted
            + self.attachments_added
            + self.attachments_updated
            + self.attachments_deleted
            + self.labels_added
            + self.labels_deleted
            > 0
    }
}
