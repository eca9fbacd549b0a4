//! Audio/speech notifier — fire-and-forget feedback for the host page.
//!
//! The worker cannot touch Web Audio or `speechSynthesis`, so every cue,
//! spoken line and confetti burst is collected as an [`Effect`] while a
//! request is handled, then rendered once as a `<script>` snippet appended to
//! the HTML fragment. Every call inside the snippet sits in its own
//! `try/catch`: a page without audio support logs and carries on.

use serde::Serialize;

/// Short non-verbal feedback signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Pop,
    Cheer,
    Correct,
    Wrong,
    DiceRoll,
}

/// Oscillator shape understood by `funlandAudio.tone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Wave {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

/// Parameters for one synthesized blip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    pub wave: Wave,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds over which the frequency ramps from start to end.
    pub ramp_s: f32,
    pub gain: f32,
    pub duration_s: f32,
}

impl Cue {
    pub fn tone(self) -> Tone {
        match self {
            Cue::Correct => Tone {
                wave: Wave::Sine,
                start_hz: 440.0,
                end_hz: 880.0,
                ramp_s: 0.1,
                gain: 0.1,
                duration_s: 0.3,
            },
            Cue::Wrong => Tone {
                wave: Wave::Sawtooth,
                start_hz: 200.0,
                end_hz: 100.0,
                ramp_s: 0.2,
                gain: 0.1,
                duration_s: 0.3,
            },
            Cue::Pop => Tone {
                wave: Wave::Triangle,
                start_hz: 600.0,
                end_hz: 600.0,
                ramp_s: 0.0,
                gain: 0.05,
                duration_s: 0.1,
            },
            Cue::Cheer => Tone {
                wave: Wave::Sine,
                start_hz: 523.0,
                end_hz: 1047.0,
                ramp_s: 0.25,
                gain: 0.1,
                duration_s: 0.4,
            },
            Cue::DiceRoll => Tone {
                wave: Wave::Square,
                start_hz: 300.0,
                end_hz: 150.0,
                ramp_s: 0.15,
                gain: 0.04,
                duration_s: 0.15,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cue::Pop => "pop",
            Cue::Cheer => "cheer",
            Cue::Correct => "correct",
            Cue::Wrong => "wrong",
            Cue::DiceRoll => "diceRoll",
        }
    }
}

/// Speech settings tuned for young listeners.
pub const SPEECH_RATE: f32 = 0.9;
pub const SPEECH_PITCH: f32 = 1.1;

/// Confetti pieces per celebration.
const CONFETTI_PIECES: u32 = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Cue(Cue),
    Speak(String),
    Celebrate,
    Music(bool),
    Store { key: &'static str, blob: String },
}

/// Collects effects for one request.
#[derive(Debug, Clone)]
pub struct Notifier {
    sfx: bool,
    effects: Vec<Effect>,
}

impl Notifier {
    pub fn new(sfx: bool) -> Self {
        Self {
            sfx,
            effects: Vec::new(),
        }
    }

    /// Emit a cue unless sound effects are switched off.
    pub fn cue(&mut self, cue: Cue) {
        if !self.sfx {
            return;
        }
        tracing::debug!(cue = cue.as_str(), "cue");
        self.effects.push(Effect::Cue(cue));
    }

    /// Queue a spoken line. Cancels whatever was being said before it.
    pub fn speak(&mut self, text: impl Into<String>) {
        self.effects.push(Effect::Speak(text.into()));
    }

    pub fn celebrate(&mut self) {
        self.effects.push(Effect::Celebrate);
    }

    pub fn music(&mut self, on: bool) {
        self.effects.push(Effect::Music(on));
    }

    pub fn store(&mut self, key: &'static str, blob: String) {
        self.effects.push(Effect::Store { key, blob });
    }

    #[cfg(test)]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    #[cfg(test)]
    pub fn has_cue(&self, cue: Cue) -> bool {
        self.effects.contains(&Effect::Cue(cue))
    }

    /// Last line queued for speech, if any.
    #[cfg(test)]
    pub fn last_spoken(&self) -> Option<&str> {
        self.effects.iter().rev().find_map(|e| match e {
            Effect::Speak(t) => Some(t.as_str()),
            _ => None,
        })
    }

    /// Render all collected effects as one `<script>` tag, or an empty
    /// string when nothing happened.
    pub fn render_script(&self) -> String {
        if self.effects.is_empty() {
            return String::new();
        }
        let mut js = String::with_capacity(256 * self.effects.len());
        js.push_str("<script>(function(){");
        for effect in &self.effects {
            let call = match effect {
                Effect::Cue(cue) => format!(
                    "funlandAudio.tone({});",
                    js_value(&cue.tone())
                ),
                Effect::Speak(text) => format!(
                    "if ('speechSynthesis' in window) {{ window.speechSynthesis.cancel(); var u = new SpeechSynthesisUtterance({}); u.rate = {}; u.pitch = {}; window.speechSynthesis.speak(u); }}",
                    js_value(text),
                    SPEECH_RATE,
                    SPEECH_PITCH
                ),
                Effect::Celebrate => format!(
                    "funlandAudio.confetti({{pieces: {}, recycle: false}});",
                    CONFETTI_PIECES
                ),
                Effect::Music(on) => format!("funlandAudio.music({});", on),
                Effect::Store { key, blob } => format!(
                    "localStorage.setItem({}, {});",
                    js_value(key),
                    js_value(blob)
                ),
            };
            js.push_str("try { ");
            js.push_str(&call);
            js.push_str(" } catch (e) { console.warn('[funland] effect failed', e); }");
        }
        js.push_str("})();</script>");
        js
    }
}

/// Serialize a value as a JS literal that is safe inside a `<script>` tag.
fn js_value<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_are_dropped_when_sfx_off() {
        let mut n = Notifier::new(false);
        n.cue(Cue::Pop);
        n.speak("hello");
        assert!(!n.has_cue(Cue::Pop));
        assert_eq!(n.last_spoken(), Some("hello"));
    }

    #[test]
    fn empty_notifier_renders_nothing() {
        assert!(Notifier::new(true).render_script().is_empty());
    }

    #[test]
    fn script_wraps_every_call() {
        let mut n = Notifier::new(true);
        n.cue(Cue::Correct);
        n.speak("Let's count.");
        n.celebrate();
        let js = n.render_script();
        assert!(js.starts_with("<script>"));
        assert!(js.contains(r#""wave":"sine""#));
        assert!(js.contains(r#""start_hz":440.0"#));
        assert!(js.contains("speechSynthesis.cancel()"));
        assert!(js.contains(r#""Let's count.""#));
        assert!(js.contains("u.rate = 0.9"));
        assert!(js.contains("confetti({pieces: 200"));
        assert_eq!(js.matches("try {").count(), 3);
    }

    #[test]
    fn script_text_cannot_close_the_tag() {
        let mut n = Notifier::new(true);
        n.speak("</script><b>");
        let js = n.render_script();
        assert_eq!(js.matches("</script>").count(), 1);
    }

    #[test]
    fn store_effect_writes_local_storage() {
        let mut n = Notifier::new(false);
        n.store("funland-storage", "abc".to_string());
        let js = n.render_script();
        assert!(js.contains(r#"localStorage.setItem("funland-storage", "abc")"#));
    }

    #[test]
    fn every_cue_has_a_tone() {
        for cue in [Cue::Pop, Cue::Cheer, Cue::Correct, Cue::Wrong, Cue::DiceRoll] {
            let t = cue.tone();
            assert!(t.duration_s > 0.0);
            assert!(t.gain > 0.0);
        }
    }
}
