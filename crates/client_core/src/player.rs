/// Controls state of the playback dialog. The player widget does the actual
/// decoding; this only tracks what the controls show and what to tell it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub playing: bool,
    pub volume: f64,
    pub muted: bool,
    /// Fraction of the media played, in `[0, 1]`.
    pub played: f64,
    pub seeking: bool,
    pub fullscreen: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            playing: false,
            volume: 0.5,
            muted: false,
            played: 0.0,
            seeking: false,
            fullscreen: false,
        }
    }
}

impl PlaybackState {
    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume = clamp_unit(volume);
        self.muted = self.volume == 0.0;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Progress reported by the player; ignored while the user drags the
    /// seek bar.
    pub fn on_progress(&mut self, played: f64) {
        if !self.seeking {
            self.played = clamp_unit(played);
        }
    }

    pub fn begin_seek(&mut self, fraction: f64) {
        self.played = clamp_unit(fraction);
        self.seeking = true;
    }

    /// Releases the seek bar and returns the fraction to seek the player to.
    pub fn end_seek(&mut self) -> f64 {
        self.seeking = false;
        self.played
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub fn effective_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
