use chrono::{DateTime, Duration, Utc};

/// A transient "done" marker that stays up for a window after the last
/// trigger. Triggering again restarts the window.
#[derive(Debug, Clone, Default)]
pub struct Acknowledgment {
    until: Option<DateTime<Utc>>,
}

impl Acknowledgment {
    pub fn show(&mut self, now: DateTime<Utc>, window: Duration) {
        self.until = Some(now + window);
    }

    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        matches!(self.until, Some(until) if now < until)
    }

    pub fn clear(&mut self) {
        self.until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_hidden_until_shown() {
        let ack = Acknowledgment::default();
        assert!(!ack.is_visible(t0()));
    }

    #[test]
    fn test_expires_after_window() {
        let mut ack = Acknowledgment::default();
        ack.show(t0(), Duration::seconds(2));

        assert!(ack.is_visible(t0()));
        assert!(ack.is_visible(t0() + Duration::milliseconds(1999)));
        assert!(!ack.is_visible(t0() + Duration::seconds(2)));
    }

    #[test]
    fn test_second_show_restarts_window() {
        let mut ack = Acknowledgment::default();
        ack.show(t0(), Duration::seconds(2));
        ack.show(t0() + Duration::seconds(1), Duration::seconds(2));

        assert!(ack.is_visible(t0() + Duration::milliseconds(2500)));
        assert!(!ack.is_visible(t0() + Duration::seconds(3)));
    }

    #[test]
    fn test_clear() {
        let mut ack = Acknowledgment::default();
        ack.show(t0(), Duration::seconds(2));
        ack.clear();
        assert!(!ack.is_visible(t0()));
    }
}
