//! Feeding Time — subtraction with apples.
//!
//! A round starts with 5–10 apples. The die (1–4) says how many the avatar
//! eats; the child taps apples and they disappear in row order. The round
//! ends on the sentence `initial - eaten = left`.
//!
//! The roll is clamped so at least one apple is always left over.

use crate::game::Progress;
use crate::game::config::Timing;
use crate::game::dice::{APPLE_RANGE, FEED_RANGE, OutcomeSource};
use crate::game::notify::{Cue, Notifier};
use crate::game::prefs::Avatar;
use crate::game::timeline::{Deferred, Ticket, Timeline};

pub const BADGE: &str = "kind-feeder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Start,
    Roll,
    Eat,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedStep {
    Reveal,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedView {
    pub phase: FeedPhase,
    pub initial_count: u8,
    pub roll_value: u8,
    pub eaten: u8,
    pub is_rolling: bool,
    pub pending: Option<Deferred>,
}

impl FeedView {
    pub fn left(&self) -> u8 {
        self.initial_count.saturating_sub(self.roll_value)
    }
}

/// Cap a raw roll so at least one apple survives. Applies only when the raw
/// roll is strictly greater than `remaining - 1`.
pub fn clamp_feed_roll(raw: u8, remaining: u8) -> u8 {
    let cap = remaining.saturating_sub(1);
    if raw > cap { cap } else { raw }
}

/// `"6 - 4 = 2 left"`
pub fn subtraction_sentence(initial: u8, eaten: u8) -> String {
    format!(
        "{} - {} = {} left",
        initial,
        eaten,
        initial.saturating_sub(eaten)
    )
}

#[derive(Debug, Clone)]
pub struct FeedingGame {
    timing: Timing,
    phase: FeedPhase,
    initial_count: u8,
    roll_value: u8,
    eaten: u8,
    timeline: Timeline<FeedStep>,
}

impl FeedingGame {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            phase: FeedPhase::Start,
            initial_count: 6,
            roll_value: 1,
            eaten: 0,
            timeline: Timeline::default(),
        }
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn initial_count(&self) -> u8 {
        self.initial_count
    }

    pub fn roll_value(&self) -> u8 {
        self.roll_value
    }

    pub fn eaten(&self) -> u8 {
        self.eaten
    }

    pub fn pending(&self) -> Option<Deferred> {
        self.timeline.pending()
    }

    fn is_rolling(&self) -> bool {
        self.phase == FeedPhase::Roll && self.timeline.pending().is_some()
    }

    pub fn view(&self) -> FeedView {
        FeedView {
            phase: self.phase,
            initial_count: self.initial_count,
            roll_value: self.roll_value,
            eaten: self.eaten,
            is_rolling: self.is_rolling(),
            pending: self.timeline.pending(),
        }
    }

    /// Lay out a fresh pile of apples. Valid before the first round and
    /// after a round has ended.
    pub fn start_round(&mut self, dice: &mut dyn OutcomeSource, notifier: &mut Notifier) -> Progress {
        if !matches!(self.phase, FeedPhase::Start | FeedPhase::End) {
            return Progress::Ignored;
        }
        self.timeline.cancel();
        self.initial_count = dice.roll(APPLE_RANGE.0, APPLE_RANGE.1);
        self.eaten = 0;
        self.phase = FeedPhase::Roll;
        notifier.speak(format!(
            "Here are {} apples! Roll to see how many to eat.",
            self.initial_count
        ));
        tracing::debug!(apples = self.initial_count, "feeding: round started");
        Progress::Advanced
    }

    pub fn next_round(&mut self, dice: &mut dyn OutcomeSource, notifier: &mut Notifier) -> Progress {
        if self.phase != FeedPhase::End {
            return Progress::Ignored;
        }
        self.start_round(dice, notifier)
    }

    pub fn roll_dice(&mut self, notifier: &mut Notifier) -> Progress {
        if self.phase != FeedPhase::Roll || self.is_rolling() {
            return Progress::Ignored;
        }
        notifier.cue(Cue::DiceRoll);
        self.timeline.schedule(FeedStep::Reveal, self.timing.roll_ms);
        Progress::Advanced
    }

    pub fn resume(
        &mut self,
        ticket: Ticket,
        dice: &mut dyn OutcomeSource,
        avatar: Avatar,
        notifier: &mut Notifier,
    ) -> Progress {
        match self.timeline.resume(ticket) {
            Some(FeedStep::Reveal) => {
                let raw = dice.roll(FEED_RANGE.0, FEED_RANGE.1);
                self.roll_value = clamp_feed_roll(raw, self.initial_count);
                self.phase = FeedPhase::Eat;
                notifier.speak(format!(
                    "Feed {} apples to {}! Tap them.",
                    self.roll_value,
                    avatar.name()
                ));
                tracing::debug!(raw, roll = self.roll_value, "feeding: revealed");
                Progress::Advanced
            }
            Some(FeedStep::Finish) => {
                self.phase = FeedPhase::End;
                notifier.cue(Cue::Correct);
                notifier.speak(format!(
                    "Yum! {}!",
                    subtraction_sentence(self.initial_count, self.roll_value)
                ));
                Progress::Completed
            }
            None => Progress::Ignored,
        }
    }

    /// Tap apple `index`. Any apple not yet eaten works; the next one in
    /// row order is the one that goes.
    pub fn feed(&mut self, index: u8, notifier: &mut Notifier) -> Progress {
        if self.phase != FeedPhase::Eat
            || index < self.eaten
            || index >= self.initial_count
            || self.eaten >= self.roll_value
        {
            return Progress::Ignored;
        }
        self.eaten += 1;
        notifier.cue(Cue::Pop);
        if self.eaten == self.roll_value {
            self.timeline.schedule(FeedStep::Finish, self.timing.settle_ms);
        }
        Progress::Advanced
    }

    pub fn teardown(&mut self) {
        self.timeline.cancel();
    }
}
