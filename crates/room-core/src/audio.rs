//! Audio mix policy. The browser shell owns the actual WebAudio graph and
//! simply executes the fades and sound requests produced here.

use crate::constants::{
    AMBIENCE_VOLUME, CLICK_GAIN_MIN, CLICK_GAIN_SPAN, CLICK_RATE_MIN, CLICK_RATE_SPAN,
    FADE_FLOOR, FADE_TIME_SEC, FOCUS_LOSS_FADE_SEC, MANUAL_MUTE_FADE_SEC, MANUAL_UNMUTE_FADE_SEC,
    MUSIC_VOLUME,
};
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Click,
    EasterEgg,
}

/// A one-shot sound with its playback rate and gain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundRequest {
    pub sound: Sound,
    pub rate: f32,
    pub gain: f32,
}

impl SoundRequest {
    /// Click with slightly randomized pitch and loudness.
    pub fn click<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            sound: Sound::Click,
            rate: CLICK_RATE_MIN + rng.gen::<f32>() * CLICK_RATE_SPAN,
            gain: CLICK_GAIN_MIN + rng.gen::<f32>() * CLICK_GAIN_SPAN,
        }
    }

    pub fn easter_egg() -> Self {
        Self {
            sound: Sound::EasterEgg,
            rate: 1.0,
            gain: 1.0,
        }
    }
}

/// Ramp of the two looping buses to new volumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeCommand {
    pub music: f32,
    pub ambience: f32,
    pub duration_sec: f64,
}

impl FadeCommand {
    pub fn to_full(duration_sec: f64) -> Self {
        Self {
            music: MUSIC_VOLUME,
            ambience: AMBIENCE_VOLUME,
            duration_sec,
        }
    }

    pub fn to_silence(duration_sec: f64) -> Self {
        Self {
            music: 0.0,
            ambience: 0.0,
            duration_sec,
        }
    }

    /// Exponential ramps cannot reach zero, so targets are floored.
    pub fn ramp_targets(&self) -> (f32, f32) {
        (self.music.max(FADE_FLOOR), self.ambience.max(FADE_FLOOR))
    }

    /// Whether the music bus must be hard-set to zero once the ramp ends.
    pub fn ends_silent(&self) -> bool {
        self.music == 0.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AudioMix {
    initialized: bool,
    manual_mute: bool,
    muted_by_focus: bool,
}

impl AudioMix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_manually_muted(&self) -> bool {
        self.manual_mute
    }

    /// Buffers decoded and buses connected.
    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Volumes to start the loops at.
    pub fn initial_levels(&self) -> (f32, f32) {
        if self.manual_mute || self.muted_by_focus {
            (FADE_FLOOR, FADE_FLOOR)
        } else {
            (MUSIC_VOLUME, AMBIENCE_VOLUME)
        }
    }

    /// The mute button. The flag flips even before audio is ready; a fade is
    /// only produced once it is.
    pub fn toggle_manual(&mut self) -> Option<FadeCommand> {
        self.manual_mute = !self.manual_mute;
        log::info!("[audio] manual mute {}", self.manual_mute);
        if !self.initialized {
            return None;
        }
        Some(if self.manual_mute {
            FadeCommand::to_silence(MANUAL_MUTE_FADE_SEC)
        } else {
            FadeCommand::to_full(MANUAL_UNMUTE_FADE_SEC)
        })
    }

    /// Page hidden.
    pub fn focus_lost(&mut self) -> Option<FadeCommand> {
        if !self.initialized {
            return None;
        }
        self.muted_by_focus = true;
        Some(FadeCommand::to_silence(FOCUS_LOSS_FADE_SEC))
    }

    /// Page visible again. Stays silent if the user muted manually.
    pub fn focus_gained(&mut self) -> Option<FadeCommand> {
        if !self.initialized || !self.muted_by_focus || self.manual_mute {
            return None;
        }
        self.muted_by_focus = false;
        Some(FadeCommand::to_full(FADE_TIME_SEC))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_params_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let s = SoundRequest::click(&mut rng);
            assert!((0.95..1.05).contains(&s.rate));
            assert!((1.0..1.2).contains(&s.gain));
        }
    }

    #[test]
    fn uninitialized_mix_is_silent_policy() {
        let mut mix = AudioMix::new();
        assert_eq!(mix.focus_lost(), None);
        assert_eq!(mix.toggle_manual(), None);
        assert!(mix.is_manually_muted());
    }

    #[test]
    fn focus_gain_respects_manual_mute() {
        let mut mix = AudioMix::new();
        mix.mark_initialized();
        let lost = mix.focus_lost().unwrap();
        assert!(lost.ends_silent());
        assert_eq!(lost.ramp_targets(), (FADE_FLOOR, FADE_FLOOR));
        assert!(mix.toggle_manual().unwrap().ends_silent());
        assert_eq!(mix.focus_gained(), None);
        let back = mix.toggle_manual().unwrap();
        assert_eq!(back.music, MUSIC_VOLUME);
        assert_eq!(mix.focus_gained().map(|f| f.duration_sec), Some(FADE_TIME_SEC));
    }
}
