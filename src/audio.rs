//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed! Each
//! effect is described as a handful of oscillator tones; the browser build
//! plays them through an `AudioContext`, the native build only logs them.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use glam::Vec2;

use crate::renderer::world_to_ndc;
use crate::settings::Settings;
use crate::sim::{SoundCue, SoundEffect};

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// One oscillator voice of an effect
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Start frequency (Hz)
    pub freq: f32,
    /// Peak gain before master/sfx volume
    pub gain: f32,
    /// Start offset (seconds)
    pub delay: f64,
    /// Length until the envelope has decayed (seconds)
    pub duration: f64,
    /// Instant frequency changes as (seconds from start, Hz)
    pub steps: Vec<(f64, f32)>,
}

/// Build the tones for an effect at a given pitch multiplier
pub fn tones(effect: SoundEffect, pitch: f32) -> Vec<Tone> {
    let pitch = pitch.clamp(0.25, 4.0);
    match effect {
        // Short bright blip that jumps up an octave-ish mid-way
        SoundEffect::Bounce => vec![Tone {
            waveform: Waveform::Triangle,
            freq: 500.0 * pitch,
            gain: 0.3,
            delay: 0.0,
            duration: 0.05,
            steps: vec![(0.03, 970.0 * pitch)],
        }],
        // Low noisy crunch
        SoundEffect::Break => vec![
            Tone {
                waveform: Waveform::Sawtooth,
                freq: 90.0 * pitch,
                gain: 0.45,
                delay: 0.0,
                duration: 0.2,
                steps: vec![
                    (0.02, 140.0 * pitch),
                    (0.04, 70.0 * pitch),
                    (0.07, 120.0 * pitch),
                    (0.1, 60.0 * pitch),
                    (0.14, 90.0 * pitch),
                ],
            },
            Tone {
                waveform: Waveform::Square,
                freq: 1500.0 * pitch,
                gain: 0.1,
                delay: 0.0,
                duration: 0.06,
                steps: vec![(0.02, 900.0 * pitch), (0.04, 1800.0 * pitch)],
            },
        ],
        // Rising two-note serve chirp
        SoundEffect::Start => vec![Tone {
            waveform: Waveform::Triangle,
            freq: 500.0 * pitch,
            gain: 0.3,
            delay: 0.0,
            duration: 0.34,
            steps: vec![(0.02, 1070.0 * pitch)],
        }],
    }
}

/// Stereo pan for a cue position: -1 at the left screen edge, 1 at the right
pub fn pan_for(pos: Option<Vec2>) -> f32 {
    pos.map_or(0.0, |p| world_to_ndc(p).x.clamp(-1.0, 1.0))
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    settings: Settings,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            settings: Settings::default(),
        }
    }

    /// Copy volume preferences from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone().clamped();
    }

    /// Final gain multiplier for a cue
    pub fn cue_volume(&self, cue: &SoundCue) -> f32 {
        (self.settings.effective_volume() * cue.volume).clamp(0.0, 1.0)
    }

    /// Play a sound cue
    pub fn play(&self, cue: &SoundCue) {
        let vol = self.cue_volume(cue);
        if vol <= 0.0 {
            return;
        }
        let tones = tones(cue.effect, cue.pitch);
        self.play_tones(&tones, vol, pan_for(cue.pos));
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn play_tones(&self, tones: &[Tone], vol: f32, pan: f32) {
        log::debug!(
            "sound: {} tone(s) at volume {:.2}, pan {:.2}",
            tones.len(),
            vol,
            pan
        );
    }

    #[cfg(target_arch = "wasm32")]
    fn play_tones(&self, tones: &[Tone], vol: f32, pan: f32) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        for tone in tones {
            self.play_tone(ctx, tone, vol, pan);
        }
    }

    /// Resume audio context (required after user gesture)
    #[cfg(target_arch = "wasm32")]
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn resume(&self) {}

    /// Create an oscillator with gain envelope, panned left/right
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        pan: f32,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        let panner = ctx.create_stereo_panner().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        panner.pan().set_value(pan);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&panner).ok()?;
        panner.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    #[cfg(target_arch = "wasm32")]
    fn play_tone(&self, ctx: &AudioContext, tone: &Tone, vol: f32, pan: f32) {
        let osc_type = match tone.waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Triangle => OscillatorType::Triangle,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        };
        let Some((osc, gain)) = self.create_osc(ctx, tone.freq, osc_type, pan) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;

        gain.gain().set_value_at_time(vol * tone.gain, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + tone.duration)
            .ok();
        osc.frequency().set_value_at_time(tone.freq, t).ok();
        for &(offset, freq) in &tone.steps {
            osc.frequency().set_value_at_time(freq, t + offset).ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + tone.duration + 0.02).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounce_pitch_scales_frequency() {
        let low = tones(SoundEffect::Bounce, 1.0);
        let high = tones(SoundEffect::Bounce, 2.0);
        assert!(high[0].freq > low[0].freq);
        assert!((high[0].freq - 2.0 * low[0].freq).abs() < 1e-3);
    }

    #[test]
    fn test_every_effect_has_tones() {
        for effect in [SoundEffect::Bounce, SoundEffect::Break, SoundEffect::Start] {
            let tones = tones(effect, 1.0);
            assert!(!tones.is_empty());
            assert!(tones.iter().all(|t| t.duration > 0.0 && t.freq > 0.0));
        }
    }

    #[test]
    fn test_pan_follows_cue_position() {
        use crate::consts::{CAMERA_POS, LEVEL_SIZE};

        assert_eq!(pan_for(None), 0.0);
        assert!(pan_for(Some(CAMERA_POS)).abs() < 1e-6);
        assert!(pan_for(Some(glam::Vec2::new(1.0, 10.0))) < -0.5);
        assert!(pan_for(Some(glam::Vec2::new(LEVEL_SIZE.x - 1.0, 10.0))) > 0.5);
        // Far off screen is clamped
        assert_eq!(pan_for(Some(glam::Vec2::new(500.0, 0.0))), 1.0);
    }

    #[test]
    fn test_volume_settings_are_clamped() {
        let mut audio = AudioManager::new();
        let cue = SoundCue::new(SoundEffect::Bounce);
        audio.apply_settings(&Settings {
            master_volume: 5.0,
            sfx_volume: 0.5,
            ..Default::default()
        });
        assert!((audio.cue_volume(&cue) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_muted_cue_is_silent() {
        let mut audio = AudioManager::new();
        let cue = SoundCue::new(SoundEffect::Break);
        assert!(audio.cue_volume(&cue) > 0.0);

        audio.apply_settings(&Settings {
            muted: true,
            ..Default::default()
        });
        assert_eq!(audio.cue_volume(&cue), 0.0);
    }
}
