//! Audio system using Web Audio API
//!
//! Cube notes are synthesized as short xylophone strikes, so no sample files
//! are shipped. Each note is panned toward its cube.

use glam::Vec3;
use web_sys::{AudioContext, AudioNode, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::{Note, PlayMode, SoundSink, stereo_pan};

/// Ratio of a wooden bar's first overtone to its fundamental
const BAR_OVERTONE: f32 = 3.93;
/// Seconds a note rings out
const NOTE_DECAY: f64 = 0.9;

/// Game feedback sounds that are not cube notes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Whole sequence repeated
    RoundWon,
    /// Wrong cube
    GameOver,
    /// Finished game made the leaderboard
    HighScore,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Context ready to play at `vol`, or None when silent
    fn live_context(&self) -> Option<(&AudioContext, f32)> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return None;
        }
        let ctx = self.ctx.as_ref()?;
        // Browsers start contexts suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some((ctx, vol))
    }

    /// Play a feedback cue
    pub fn play_cue(&self, cue: Cue) {
        let Some((ctx, vol)) = self.live_context() else {
            return;
        };
        let out: &AudioNode = &ctx.destination();
        match cue {
            Cue::RoundWon => self.arpeggio(ctx, out, vol, &[523.25, 659.25, 783.99], 0.08, 0.35),
            Cue::GameOver => self.arpeggio(ctx, out, vol, &[392.0, 329.63, 261.63, 196.0], 0.18, 0.3),
            Cue::HighScore => {
                self.arpeggio(ctx, out, vol, &[523.25, 659.25, 783.99, 1046.5], 0.07, 0.25)
            }
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope, routed into `out`
    fn create_osc(
        &self,
        ctx: &AudioContext,
        out: &AudioNode,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(out).ok()?;

        Some((osc, gain))
    }

    /// Xylophone strike: fundamental plus a short, bright overtone
    fn strike(&self, ctx: &AudioContext, out: &AudioNode, freq: f32, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, out, freq, OscillatorType::Sine) {
            gain.gain().set_value_at_time(0.0001, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(vol * 0.6, t + 0.005)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + NOTE_DECAY)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + NOTE_DECAY + 0.05).ok();
        }

        if let Some((osc, gain)) =
            self.create_osc(ctx, out, freq * BAR_OVERTONE, OscillatorType::Sine)
        {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.12)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        // Mallet knock
        if let Some((osc, gain)) = self.create_osc(ctx, out, freq * 0.5, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.03)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.05).ok();
        }
    }

    /// Evenly spaced tones, one after another
    fn arpeggio(&self, ctx: &AudioContext, out: &AudioNode, vol: f32, freqs: &[f32], step: f64, ring: f64) {
        for (i, freq) in freqs.iter().enumerate() {
            let delay = i as f64 * step;
            if let Some((osc, gain)) = self.create_osc(ctx, out, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + ring)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + ring + 0.05).ok();
            }
        }
    }
}

impl SoundSink for AudioManager {
    fn play(&mut self, note: Note, position: Vec3, gain: f32, mode: PlayMode) {
        let Some((ctx, vol)) = self.live_context() else {
            return;
        };
        let PlayMode::Once = mode;

        let Ok(panner) = ctx.create_stereo_panner() else {
            return;
        };
        panner.pan().set_value(stereo_pan(position));
        if panner.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        log::debug!("Note {} at x={:.1}", note.as_str(), position.x);
        self.strike(ctx, &panner, note.frequency(), vol * gain.clamp(0.0, 1.0));
    }
}
