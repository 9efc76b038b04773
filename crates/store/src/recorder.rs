//! EventRecorder - applies race events to a store

use contracts::{ContractError, LapId, RaceEvent, RaceStore, SessionId, TelemetrySample};
use tracing::{instrument, warn};

/// Applies tracker events to a `RaceStore`, keeping the identifiers it hands back
///
/// Any store failure is returned as-is; the caller ends the run.
pub struct EventRecorder<S: RaceStore> {
    store: S,
    session_id: Option<SessionId>,
    /// Most recent lap number and its store id
    last_lap: Option<(u32, LapId)>,
    laps_written: u64,
    samples_written: u64,
}

impl<S: RaceStore> EventRecorder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            session_id: None,
            last_lap: None,
            laps_written: 0,
            samples_written: 0,
        }
    }

    /// Persist one event
    #[instrument(level = "trace", name = "recorder_record", skip_all, fields(store = %self.store.name()))]
    pub fn record(&mut self, event: &RaceEvent) -> Result<(), ContractError> {
        match event {
            RaceEvent::SessionStarted(session) => {
                self.session_id = Some(self.store.create_session(session)?);
            }
            RaceEvent::LapCompleted(lap) => {
                let session_id = self.session_id.ok_or_else(|| {
                    ContractError::persistence(
                        self.store.name(),
                        format!("lap {} completed before a session was created", lap.lap_number),
                    )
                })?;
                let lap_id = self.store.insert_lap(session_id, lap)?;
                self.last_lap = Some((lap.lap_number, lap_id));
                self.laps_written += 1;
            }
            RaceEvent::TelemetrySampled { lap_number, frame } => match self.last_lap {
                Some((number, lap_id)) => {
                    if number != *lap_number {
                        warn!(expected = *lap_number, stored = number, "telemetry lap mismatch");
                    }
                    self.store
                        .insert_telemetry(&TelemetrySample::from_frame(lap_id, frame))?;
                    self.samples_written += 1;
                }
                None => warn!(lap = *lap_number, "telemetry sample without a stored lap"),
            },
            RaceEvent::TyreChanged { .. } => {}
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ContractError> {
        self.store.flush()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn laps_written(&self) -> u64 {
        self.laps_written
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
