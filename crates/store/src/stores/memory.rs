//! MemoryStore - keeps rows in vectors, for tests and dry runs

use contracts::{
    ContractError, LapId, LapRecord, RaceStore, SessionId, SessionState, TelemetrySample,
};
use tracing::debug;

/// In-memory store
///
/// `fail_after(n)` makes every write after the first `n` fail, to exercise
/// the fatal persistence path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    pub sessions: Vec<(SessionId, SessionState)>,
    pub laps: Vec<(LapId, SessionId, LapRecord)>,
    pub telemetry: Vec<TelemetrySample>,
    flushes: usize,
    writes: usize,
    fail_after: Option<usize>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fail every write after the first `writes` succeeded
    pub fn fail_after(mut self, writes: usize) -> Self {
        self.fail_after = Some(writes);
        self
    }

    /// Lap records in insertion order
    pub fn lap_records(&self) -> Vec<&LapRecord> {
        self.laps.iter().map(|(_, _, lap)| lap).collect()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    fn admit(&mut self) -> Result<(), ContractError> {
        if self.fail_after.is_some_and(|limit| self.writes >= limit) {
            return Err(ContractError::persistence(
                &self.name,
                format!("write limit of {} reached", self.writes),
            ));
        }
        self.writes += 1;
        Ok(())
    }
}

impl RaceStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_session(&mut self, session: &SessionState) -> Result<SessionId, ContractError> {
        self.admit()?;
        let id = SessionId(self.sessions.len() as u64 + 1);
        self.sessions.push((id, session.clone()));
        Ok(id)
    }

    fn insert_lap(
        &mut self,
        session_id: SessionId,
        lap: &LapRecord,
    ) -> Result<LapId, ContractError> {
        self.admit()?;
        let id = LapId(self.laps.len() as u64 + 1);
        self.laps.push((id, session_id, lap.clone()));
        Ok(id)
    }

    fn insert_telemetry(&mut self, sample: &TelemetrySample) -> Result<(), ContractError> {
        self.admit()?;
        self.telemetry.push(sample.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        self.flushes += 1;
        debug!(
            store = %self.name,
            sessions = self.sessions.len(),
            laps = self.laps.len(),
            telemetry = self.telemetry.len(),
            "MemoryStore flushed"
        );
        Ok(())
    }
}
