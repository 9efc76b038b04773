//! Race state reducer

use chrono::Local;
use contracts::{
    CarStatusFrame, DecodedFrame, LapFrame, LapRecord, RaceEvent, SessionState, TelemetryFrame,
    TrackerConfig,
};
use tracing::{debug, info, instrument};

use crate::lap_detector::{detector_for, LapBoundary, LapDetector};
use crate::sampler::TelemetrySampler;
use crate::tyre::TyreState;

/// Tracker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No frame classified yet
    NoSession,
    /// Session established
    InSession,
}

/// A detected boundary waiting for the next status snapshot
#[derive(Debug, Clone, Copy)]
struct PendingLap {
    lap_number: u32,
    boundary: LapBoundary,
}

/// Stateful reducer from decoded frames to race events
///
/// One instance per capture run, owned by the receive loop.
pub struct RaceStateTracker {
    config: TrackerConfig,
    state: TrackerState,
    session: Option<SessionState>,
    detector: Box<dyn LapDetector>,
    sampler: TelemetrySampler,
    tyres: TyreState,
    fuel: f32,
    /// Boundaries detected so far (numbers the next lap)
    laps_detected: u32,
    /// Records sealed so far
    laps_completed: u32,
    pending: Option<PendingLap>,
    telemetry_frames: u64,
}

impl RaceStateTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            detector: detector_for(&config),
            sampler: TelemetrySampler::new(config.sample_period),
            tyres: TyreState::new(config.starting_compound),
            fuel: config.starting_fuel,
            state: TrackerState::NoSession,
            session: None,
            laps_detected: 0,
            laps_completed: 0,
            pending: None,
            telemetry_frames: 0,
            config,
        }
    }

    /// Feed one decoded frame, returning the events it caused in order
    #[instrument(
        level = "trace",
        name = "race_state_observe",
        skip(self, frame),
        fields(kind = frame.kind())
    )]
    pub fn observe(&mut self, frame: DecodedFrame) -> Vec<RaceEvent> {
        let mut events = Vec::new();

        if self.state == TrackerState::NoSession {
            events.push(self.start_session());
        }

        match frame {
            DecodedFrame::Lap(lap) => self.on_lap(&lap, &mut events),
            DecodedFrame::CarStatus(status) => self.on_car_status(&status, &mut events),
            DecodedFrame::Telemetry(telemetry) => self.on_telemetry(telemetry, &mut events),
        }

        events
    }

    /// Seal any pending lap at the end of the run
    pub fn finish(&mut self) -> Vec<RaceEvent> {
        self.seal_pending().map(RaceEvent::LapCompleted).into_iter().collect()
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    /// Number of sealed lap records
    pub fn laps_completed(&self) -> u32 {
        self.laps_completed
    }

    pub fn tyres(&self) -> &TyreState {
        &self.tyres
    }

    /// Latest fuel reading
    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    /// Lap currently being driven (1-based)
    pub fn current_lap(&self) -> u32 {
        self.laps_detected + 1
    }

    /// Telemetry frames seen this run
    pub fn telemetry_frames(&self) -> u64 {
        self.telemetry_frames
    }

    fn start_session(&mut self) -> RaceEvent {
        let labels = &self.config.session;
        let session = SessionState {
            track: labels.track.clone(),
            session_type: labels.session_type.clone(),
            weather: labels.weather.clone(),
            date: labels.date.unwrap_or_else(|| Local::now().date_naive()),
        };

        info!(
            track = %session.track,
            session_type = %session.session_type,
            weather = %session.weather,
            date = %session.date,
            format = %self.config.format,
            "session started"
        );

        self.state = TrackerState::InSession;
        self.session = Some(session.clone());
        RaceEvent::SessionStarted(session)
    }

    fn on_lap(&mut self, frame: &LapFrame, events: &mut Vec<RaceEvent>) {
        let Some(boundary) = self.detector.observe(frame) else {
            return;
        };

        if let Some(record) = self.seal_pending() {
            events.push(RaceEvent::LapCompleted(record));
        }

        self.laps_detected += 1;
        debug!(
            lap = self.laps_detected,
            lap_time_ms = boundary.lap_time_ms,
            "lap boundary detected"
        );
        self.pending = Some(PendingLap {
            lap_number: self.laps_detected,
            boundary,
        });
    }

    fn on_car_status(&mut self, frame: &CarStatusFrame, events: &mut Vec<RaceEvent>) {
        self.fuel = frame.fuel_in_tank;

        if let Some((from, to)) = self.tyres.observe(frame.tyre_compound) {
            info!(from = %from, to = %to, lap = self.current_lap(), "tyre change");
            events.push(RaceEvent::TyreChanged { from, to });
        }

        if let Some(record) = self.seal_pending() {
            events.push(RaceEvent::LapCompleted(record));
        }
    }

    fn on_telemetry(&mut self, frame: TelemetryFrame, events: &mut Vec<RaceEvent>) {
        self.telemetry_frames += 1;

        let lap_context = (self.laps_completed > 0).then_some(self.laps_completed);
        if self
            .sampler
            .should_forward(self.telemetry_frames, lap_context.is_some())
        {
            if let Some(lap_number) = lap_context {
                events.push(RaceEvent::TelemetrySampled { lap_number, frame });
            }
        }
    }

    fn seal_pending(&mut self) -> Option<LapRecord> {
        let pending = self.pending.take()?;
        let (tyre_compound, tyre_age) = self.tyres.complete_lap();
        let lap_time_ms = pending.boundary.lap_time_ms;

        let record = LapRecord {
            lap_number: pending.lap_number,
            lap_time_ms,
            tyre_compound,
            tyre_age,
            fuel_load: self.fuel,
            is_valid: !pending.boundary.flagged_invalid
                && self.config.lap_bounds.contains(lap_time_ms),
        };
        self.laps_completed += 1;

        info!(
            lap = record.lap_number,
            time = %record.formatted_time(),
            compound = %record.tyre_compound,
            tyre_age = record.tyre_age,
            fuel = record.fuel_load,
            valid = record.is_valid,
            "lap completed"
        );

        Some(record)
    }
}

impl std::fmt::Debug for RaceStateTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceStateTracker")
            .field("format", &self.config.format)
            .field("state", &self.state)
            .field("laps_completed", &self.laps_completed)
            .field("tyres", &self.tyres)
            .field("fuel", &self.fuel)
            .field("pending", &self.pending)
            .finish()
    }
}
