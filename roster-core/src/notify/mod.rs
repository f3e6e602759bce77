/// Downstream result notification is an external collaborator (§1, §5) — an
/// HTTP POST `{action: "importShiftResult", token, fileId, year, month}` to
/// a configured URL, suppressed whenever any group used the relaxed profile
/// or failed. This crate ships only the seam: no HTTP client is wired in,
/// and `pipeline::run` never calls an implementation of this trait.
pub trait ResultNotifier {
    fn notify_import_ready(&self, year: i32, month: u32, file_id: &str) -> Result<(), String>;
}

/// Whether the run's outcome permits a downstream notification at all.
pub fn notification_permitted(any_relaxed: bool, any_failed: bool) -> bool {
    !any_relaxed && !any_failed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppressed_when_any_group_relaxed_or_failed() {
        assert!(!notification_permitted(true, false));
        assert!(!notification_permitted(false, true));
        assert!(notification_permitted(false, false));
    }
}
