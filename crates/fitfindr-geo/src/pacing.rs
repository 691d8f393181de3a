use std::time::Duration;

/// Delays inserted between outbound geocoding requests.
///
/// The public Nominatim usage policy allows about one request per second.
/// `between_attempts` separates address formats for one entity;
/// `between_entities` separates consecutive entities in a bulk run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub between_attempts: Duration,
    pub between_entities: Duration,
}

impl Pacing {
    /// No delays at all. For tests and for providers without a rate policy.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            between_attempts: Duration::ZERO,
            between_entities: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn from_millis(between_attempts: u64, between_entities: u64) -> Self {
        Self {
            between_attempts: Duration::from_millis(between_attempts),
            between_entities: Duration::from_millis(between_entities),
        }
    }

    pub(crate) async fn after_attempt(&self) {
        pause(self.between_attempts).await;
    }

    pub(crate) async fn after_entity(&self) {
        pause(self.between_entities).await;
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_millis(500, 1000)
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_public_usage_policy() {
        let pacing = Pacing::default();
        assert_eq!(pacing.between_attempts, Duration::from_millis(500));
        assert_eq!(pacing.between_entities, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn after_attempt_sleeps_for_configured_delay() {
        let start = tokio::time::Instant::now();
        Pacing::from_millis(500, 1000).after_attempt().await;
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn none_does_not_advance_time() {
        let start = tokio::time::Instant::now();
        let pacing = Pacing::none();
        pacing.after_attempt().await;
        pacing.after_entity().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
