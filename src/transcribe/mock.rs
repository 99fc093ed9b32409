use rand::Rng;

/// Canned announcement transcripts returned when live credentials are
/// unusable, so the pipeline still reaches a result state without a key.
pub const CANNED_ANNOUNCEMENTS: [&str; 10] = [
    "The next train to downtown will arrive in 3 minutes.",
    "Please stand clear of the closing doors.",
    "This train is now departing. Thank you for riding with us.",
    "Attention passengers, there is a 10 minute delay on the red line.",
    "Please keep your belongings with you at all times.",
    "The station is now closing. Please exit the platform.",
    "Service has been restored on the blue line.",
    "Please use the stairs or elevator to access the platform.",
    "This is a reminder to validate your ticket before boarding.",
    "The train is now approaching the platform.",
];

/// Index source for the canned pick. Injectable so tests can pin it.
pub trait MockPicker: Send + Sync {
    /// Pick an index in `0..len`.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform pick backed by the thread RNG.
#[derive(Debug, Default)]
pub struct UniformPicker;

impl MockPicker for UniformPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// One canned announcement, chosen by the picker. Out-of-range picks are
/// clamped to the last entry.
pub fn canned_transcript(picker: &dyn MockPicker) -> &'static str {
    let index = picker
        .pick(CANNED_ANNOUNCEMENTS.len())
        .min(CANNED_ANNOUNCEMENTS.len() - 1);
    CANNED_ANNOUNCEMENTS[index]
}
