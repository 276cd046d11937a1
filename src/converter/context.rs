use chrono::{DateTime, Utc};
use rand::Rng;

/// Identifier source for generated item ids. Injected so production keeps
/// the random ids the EMR accepts while tests get deterministic output.
pub trait IdSource: Send {
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Production ids: `"{prefix}-{n}"` with n drawn from 0..10^10. Not
/// collision-checked; the consumer only requires local uniqueness per
/// submission and treats ids as opaque.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let n = rand::rng().random_range(0..10_000_000_000u64);
        format!("{prefix}-{n}")
    }
}

/// Deterministic ids for tests: `"{prefix}-{counter}"`, counter shared
/// across prefixes so every generated id in one conversion is distinct.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: u64,
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}-{}", self.counter)
    }
}

/// Per-conversion state threaded through every extractor: the pinned
/// conversion timestamp and the id source. Pinning `now` once keeps date
/// fallbacks and elapsed-duration buckets consistent across the whole
/// record and makes conversions reproducible under a fixed clock.
pub struct ConversionContext {
    now: DateTime<Utc>,
    ids: Box<dyn IdSource>,
}

impl ConversionContext {
    pub fn new() -> Self {
        Self {
            now: Utc::now(),
            ids: Box::new(RandomIds),
        }
    }

    pub fn with_parts(now: DateTime<Utc>, ids: Box<dyn IdSource>) -> Self {
        Self { now, ids }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        self.ids.next_id(prefix)
    }
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self::new()
    }
}
