//! Sound cue dispatch
//!
//! The simulation only emits [`GameEvent`]s. This module maps them to sound
//! cues and hands those to whatever sink the host provides.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Taxi honks at the player
    Honk,
    /// Player hit or taxis piled up
    Crash,
    /// Delivery made
    Checkpoint,
    /// Player hospitalized
    GameOver,
    /// Race start stinger
    RaceStart,
    /// Player crossed the finish line
    Finish,
}

/// Fire-and-forget audio backend
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
    fn start_race_track(&mut self);
    fn stop_race_track(&mut self);
}

/// Cue for an event, if it makes a sound
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::RaceStarted => Some(SoundCue::RaceStart),
        GameEvent::Honk { .. } => Some(SoundCue::Honk),
        GameEvent::PlayerHit { .. } | GameEvent::TaxiPileup { .. } => Some(SoundCue::Crash),
        GameEvent::CheckpointReached { .. } => Some(SoundCue::Checkpoint),
        GameEvent::PlayerHospitalized => Some(SoundCue::GameOver),
        GameEvent::RaceFinished { .. } => Some(SoundCue::Finish),
        _ => None,
    }
}

/// Forward a tick's events to a sink
pub fn dispatch_audio(events: &[GameEvent], sink: &mut impl AudioSink) {
    for event in events {
        match event {
            GameEvent::MusicStart => sink.start_race_track(),
            GameEvent::MusicStop => sink.stop_race_track(),
            other => {
                if let Some(cue) = cue_for(other) {
                    sink.play(cue);
                }
            }
        }
    }
}

/// Sink for headless runs: logs cues instead of playing them
#[derive(Debug)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    track_playing: bool,
    played: usize,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            track_playing: false,
            played: 0,
        }
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn track_playing(&self) -> bool {
        self.track_playing
    }

    /// Cues actually played (muted cues don't count)
    pub fn played(&self) -> usize {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        log::debug!("sfx {cue:?} at {vol:.2}");
    }

    fn start_race_track(&mut self) {
        if !self.track_playing {
            self.track_playing = true;
            log::debug!("Race track started");
        }
    }

    fn stop_race_track(&mut self) {
        if self.track_playing {
            self.track_playing = false;
            log::debug!("Race track stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder {
        cues: Vec<SoundCue>,
        track: Vec<bool>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.cues.push(cue);
        }
        fn start_race_track(&mut self) {
            self.track.push(true);
        }
        fn stop_race_track(&mut self) {
            self.track.push(false);
        }
    }

    #[test]
    fn test_dispatch_maps_events() {
        let events = vec![
            GameEvent::RaceStarted,
            GameEvent::MusicStart,
            GameEvent::Honk { taxi: 3 },
            GameEvent::CameraShake(12.0),
            GameEvent::TaxiPileup { pos: Vec2::ZERO },
            GameEvent::PlayerHospitalized,
            GameEvent::MusicStop,
        ];
        let mut sink = Recorder::default();
        dispatch_audio(&events, &mut sink);
        assert_eq!(
            sink.cues,
            vec![SoundCue::RaceStart, SoundCue::Honk, SoundCue::Crash, SoundCue::GameOver]
        );
        assert_eq!(sink.track, vec![true, false]);
    }

    #[test]
    fn test_muted_log_sink_plays_nothing() {
        let mut sink = LogAudio::new();
        sink.set_muted(true);
        sink.play(SoundCue::Honk);
        assert_eq!(sink.played(), 0);

        sink.set_muted(false);
        sink.set_sfx_volume(2.0);
        sink.play(SoundCue::Honk);
        assert_eq!(sink.played(), 1);

        dispatch_audio(&[GameEvent::MusicStart], &mut sink);
        assert!(sink.track_playing());
    }
}
