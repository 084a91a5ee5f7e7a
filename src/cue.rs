use std::time::Duration;

/// Length of the background transition between cues
pub const CUE_FADE: Duration = Duration::from_millis(300);

/// Background hint for the last outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cue {
    #[default]
    Neutral,
    Incorrect,
    Correct,
}

impl Cue {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Cue::Neutral => (0xff, 0xff, 0xff),
            Cue::Incorrect => (0xf8, 0xd7, 0xda),
            Cue::Correct => (0xd4, 0xed, 0xda),
        }
    }
}

/// Linear colour transition from one cue to the next.
#[derive(Debug, Clone)]
pub struct CueFade {
    from: (u8, u8, u8),
    to: Cue,
    elapsed: Duration,
}

impl Default for CueFade {
    fn default() -> Self {
        Self::new(Cue::Neutral)
    }
}

impl CueFade {
    pub fn new(cue: Cue) -> Self {
        Self {
            from: cue.rgb(),
            to: cue,
            elapsed: CUE_FADE,
        }
    }

    pub fn target(&self) -> Cue {
        self.to
    }

    /// Starts a transition from the colour currently shown. Retargeting to
    /// the cue already in place keeps the running transition.
    pub fn retarget(&mut self, cue: Cue) {
        if cue == self.to {
            return;
        }
        self.from = self.color();
        self.to = cue;
        self.elapsed = Duration::ZERO;
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(CUE_FADE);
    }

    pub fn is_animating(&self) -> bool {
        self.elapsed < CUE_FADE
    }

    pub fn color(&self) -> (u8, u8, u8) {
        let t = self.elapsed.as_millis() as f64 / CUE_FADE.as_millis() as f64;
        let to = self.to.rgb();
        (
            lerp(self.from.0, to.0, t),
            lerp(self.from.1, to.1, t),
            lerp(self.from.2, to.2, t),
        )
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_fade_shows_target() {
        let fade = CueFade::new(Cue::Incorrect);
        assert!(!fade.is_animating());
        assert_eq!(fade.color(), Cue::Incorrect.rgb());
    }

    #[test]
    fn test_fade_midpoint() {
        let mut fade = CueFade::default();
        fade.retarget(Cue::Correct);
        assert_eq!(fade.color(), Cue::Neutral.rgb());

        fade.advance(Duration::from_millis(150));
        assert!(fade.is_animating());
        let (r, g, b) = fade.color();
        assert_eq!((r, g, b), (0xea, 0xf6, 0xed));
    }

    #[test]
    fn test_fade_completes_after_duration() {
        let mut fade = CueFade::default();
        fade.retarget(Cue::Incorrect);
        fade.advance(Duration::from_millis(200));
        fade.advance(Duration::from_millis(200));
        assert!(!fade.is_animating());
        assert_eq!(fade.color(), Cue::Incorrect.rgb());
    }

    #[test]
    fn test_retarget_same_cue_is_noop() {
        let mut fade = CueFade::default();
        fade.retarget(Cue::Incorrect);
        fade.advance(Duration::from_millis(100));
        let before = fade.color();
        fade.retarget(Cue::Incorrect);
        assert_eq!(fade.color(), before);
    }

    #[test]
    fn test_retarget_midway_starts_from_current_colour() {
        let mut fade = CueFade::default();
        fade.retarget(Cue::Correct);
        fade.advance(Duration::from_millis(150));
        let midway = fade.color();

        fade.retarget(Cue::Neutral);
        assert_eq!(fade.color(), midway);
        assert_eq!(fade.target(), Cue::Neutral);
    }
}
