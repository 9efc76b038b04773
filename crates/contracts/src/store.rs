//! RaceStore trait - persistence collaborator interface
//!
//! The core hands records to a store and never touches durability itself.

use crate::{ContractError, LapId, LapRecord, SessionId, SessionState, TelemetrySample};

/// Persistence collaborator
///
/// Every call is synchronous and one-shot; a failure ends the capture run.
pub trait RaceStore: Send {
    /// Store name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist the session row
    ///
    /// # Errors
    /// Returns a persistence error (should include context)
    fn create_session(&mut self, session: &SessionState) -> Result<SessionId, ContractError>;

    /// Persist a completed lap
    fn insert_lap(
        &mut self,
        session_id: SessionId,
        lap: &LapRecord,
    ) -> Result<LapId, ContractError>;

    /// Persist one telemetry sample
    fn insert_telemetry(&mut self, sample: &TelemetrySample) -> Result<(), ContractError>;

    /// Flush buffered writes (if any)
    fn flush(&mut self) -> Result<(), ContractError>;
}

impl<S: RaceStore + ?Sized> RaceStore for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn create_session(&mut self, session: &SessionState) -> Result<SessionId, ContractError> {
        (**self).create_session(session)
    }

    fn insert_lap(
        &mut self,
        session_id: SessionId,
        lap: &LapRecord,
    ) -> Result<LapId, ContractError> {
        (**self).insert_lap(session_id, lap)
    }

    fn insert_telemetry(&mut self, sample: &TelemetrySample) -> Result<(), ContractError> {
        (**self).insert_telemetry(sample)
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        (**self).flush()
    }
}
