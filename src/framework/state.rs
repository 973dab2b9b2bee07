use tracing::{error, warn};

/// A state that controls the flow of data.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq)]
pub enum State<T> {
    /// The control flow should exit with a value.
    Success(T),
    /// The control flow should retry if possible.
    ///
    /// See: [retry_if_possible]
    Retry,
    /// The control flow should exit immediately.
    Stop,
}

impl<T> State<T> {
    /// Maps the value if [`self`] is [`State::Success`].
    pub fn map<F, R>(self, f: F) -> State<R>
    where
        F: FnOnce(T) -> R,
    {
        match self {
            State::Success(value) => State::Success(f(value)),
            State::Retry => State::Retry,
            State::Stop => State::Stop,
        }
    }
}

/// Counts a failed attempt and decides whether another one is allowed.
///
/// `attempt` is the 1-based number of the attempt that just failed; it is advanced to the next one.
///
/// # Errors
///
/// Returns [`Err<()>`] if `max_attempts` have been used up, otherwise [`Ok<()>`] is returned.
pub fn retry_if_possible(attempt: &mut u8, max_attempts: u8) -> Result<(), ()> {
    *attempt = attempt.saturating_add(1);
    if *attempt > max_attempts {
        error!("attempted too many times ({max_attempts}), stopping!");
        Err(())
    } else {
        warn!("retrying… ({attempt} / {max_attempts})");
        Ok(())
    }
}
