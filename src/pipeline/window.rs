use crate::domain::Item;

/// Tolerated forward clock skew between us and feed publishers.
pub const FUTURE_GRACE_SECS: i64 = 3_600;

const SECS_PER_DAY: i64 = 86_400;

/// The `[cutoff, now + grace]` interval an item must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    pub cutoff: i64,
    pub latest: i64,
}

impl RecencyWindow {
    pub fn new(now: i64, max_days: u32) -> Self {
        Self {
            cutoff: now - i64::from(max_days) * SECS_PER_DAY,
            latest: now + FUTURE_GRACE_SECS,
        }
    }

    pub fn contains(&self, item: &Item) -> bool {
        (self.cutoff..=self.latest).contains(&item.published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn item_at(published: i64) -> Item {
        Item::new(Some("t"), "https://example.com/a", published)
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let window = RecencyWindow::new(NOW, 30);
        assert_eq!(window.cutoff, NOW - 30 * 86_400);
        assert_eq!(window.latest, NOW + 3_600);

        assert!(window.contains(&item_at(window.cutoff)));
        assert!(window.contains(&item_at(window.latest)));
        assert!(window.contains(&item_at(NOW)));
    }

    #[test]
    fn test_rejects_outside() {
        let window = RecencyWindow::new(NOW, 30);
        assert!(!window.contains(&item_at(window.cutoff - 1)));
        assert!(!window.contains(&item_at(window.latest + 1)));
    }

    #[test]
    fn test_forty_days_old_is_excluded() {
        let window = RecencyWindow::new(NOW, 30);
        assert!(!window.contains(&item_at(NOW - 40 * 86_400)));
    }
}
