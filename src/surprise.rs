use crate::error::{FinderError, Result};
use crate::types::EventRecord;
use rand::Rng;

/// Pick one event uniformly at random. Each call is independent.
pub fn pick_random<'a, R: Rng + ?Sized>(events: &'a [EventRecord], rng: &mut R) -> Result<&'a EventRecord> {
    if events.is_empty() {
        return Err(FinderError::EmptyCandidateSet);
    }
    let index = rng.gen_range(0..events.len());
    Ok(&events[index])
}
