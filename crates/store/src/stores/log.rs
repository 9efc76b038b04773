//! LogStore - logs records via tracing

use contracts::{
    ContractError, LapId, LapRecord, RaceStore, SessionId, SessionState, TelemetrySample,
};
use tracing::{debug, info, instrument};

/// Store that only logs what it receives; ids are sequential from 1
pub struct LogStore {
    name: String,
    next_session: u64,
    next_lap: u64,
    samples: u64,
}

impl LogStore {
    /// Create a new LogStore with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_session: 1,
            next_lap: 1,
            samples: 0,
        }
    }
}

impl RaceStore for LogStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_store_session", skip(self, session), fields(store = %self.name))]
    fn create_session(&mut self, session: &SessionState) -> Result<SessionId, ContractError> {
        let id = SessionId(self.next_session);
        self.next_session += 1;
        info!(
            store = %self.name,
            session_id = %id,
            track = %session.track,
            session_type = %session.session_type,
            weather = %session.weather,
            date = %session.date,
            "session row"
        );
        Ok(id)
    }

    #[instrument(name = "log_store_lap", skip(self, lap), fields(store = %self.name, lap = lap.lap_number))]
    fn insert_lap(
        &mut self,
        session_id: SessionId,
        lap: &LapRecord,
    ) -> Result<LapId, ContractError> {
        let id = LapId(self.next_lap);
        self.next_lap += 1;
        info!(
            store = %self.name,
            session_id = %session_id,
            lap_id = %id,
            lap = lap.lap_number,
            time = %lap.formatted_time(),
            compound = %lap.tyre_compound,
            tyre_age = lap.tyre_age,
            fuel = lap.fuel_load,
            valid = lap.is_valid,
            "lap row"
        );
        Ok(id)
    }

    fn insert_telemetry(&mut self, sample: &TelemetrySample) -> Result<(), ContractError> {
        self.samples += 1;
        debug!(
            store = %self.name,
            lap_id = %sample.lap_id,
            speed = ?sample.speed,
            gear = ?sample.gear,
            rpm = ?sample.rpm,
            "telemetry row"
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log store
        debug!(store = %self.name, samples = self.samples, "LogStore flushed");
        Ok(())
    }
}
