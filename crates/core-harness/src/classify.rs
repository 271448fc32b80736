//! Maps a round-trip outcome to its trial [`Status`].

use crate::error::TrialError;
use crate::trial::Status;

/// `outcome` is the recovered payload (after any transport decoding the
/// sweep applied) or the error that stopped the trial.
pub fn classify(expected: &[u8], outcome: Result<&[u8], &TrialError>) -> Status {
    match outcome {
        Err(e) => e.status(),
        Ok(recovered) if recovered == expected => Status::Ok,
        Ok(_) => Status::CorrectnessFailure,
    }
}
