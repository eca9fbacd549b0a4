//! Roll & Count — roll a die, then tap the apples one by one.
//!
//! ```text
//! Idle --roll--> Rolling --(roll delay)--> Counting --last tap--> Complete
//!   ^                                        |  ^                   |
//!   |                                        +--+ tap(next index)   |
//!   +---------------------------- roll -----------------------------+
//! ```
//!
//! Taps must follow the order of the row: only `tap(counted)` is accepted.

use crate::game::Progress;
use crate::game::config::Timing;
use crate::game::dice::{COUNT_RANGE, OutcomeSource};
use crate::game::notify::{Cue, Notifier};
use crate::game::timeline::{Deferred, Ticket, Timeline};

/// Badge recorded the first time a counting round is celebrated.
pub const BADGE: &str = "counting-star";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountPhase {
    Idle,
    Rolling,
    Counting,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountStep {
    Reveal,
    Celebrate,
}

/// Read-only snapshot for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountView {
    pub phase: CountPhase,
    pub roll_value: u8,
    pub counted: u8,
    pub is_rolling: bool,
    pub celebrating: bool,
    pub pending: Option<Deferred>,
}

#[derive(Debug, Clone)]
pub struct CountingGame {
    timing: Timing,
    phase: CountPhase,
    roll_value: u8,
    counted: u8,
    celebrating: bool,
    timeline: Timeline<CountStep>,
}

impl CountingGame {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            phase: CountPhase::Idle,
            roll_value: 1,
            counted: 0,
            celebrating: false,
            timeline: Timeline::default(),
        }
    }

    pub fn phase(&self) -> CountPhase {
        self.phase
    }

    pub fn roll_value(&self) -> u8 {
        self.roll_value
    }

    pub fn counted(&self) -> u8 {
        self.counted
    }

    pub fn pending(&self) -> Option<Deferred> {
        self.timeline.pending()
    }

    pub fn view(&self) -> CountView {
        CountView {
            phase: self.phase,
            roll_value: self.roll_value,
            counted: self.counted,
            is_rolling: self.phase == CountPhase::Rolling,
            celebrating: self.celebrating,
            pending: self.timeline.pending(),
        }
    }

    /// Start a new round. Ignored while the die is already tumbling.
    pub fn roll(&mut self, notifier: &mut Notifier) -> Progress {
        if self.phase == CountPhase::Rolling {
            return Progress::Ignored;
        }
        self.timeline.cancel();
        self.counted = 0;
        self.celebrating = false;
        self.phase = CountPhase::Rolling;
        notifier.cue(Cue::DiceRoll);
        self.timeline.schedule(CountStep::Reveal, self.timing.roll_ms);
        tracing::debug!("counting: rolling");
        Progress::Advanced
    }

    /// Run the pending step if `ticket` is still current.
    pub fn resume(
        &mut self,
        ticket: Ticket,
        dice: &mut dyn OutcomeSource,
        notifier: &mut Notifier,
    ) -> Progress {
        match self.timeline.resume(ticket) {
            Some(CountStep::Reveal) => {
                self.roll_value = dice.roll(COUNT_RANGE.0, COUNT_RANGE.1);
                self.counted = 0;
                self.phase = CountPhase::Counting;
                notifier.speak(format!("You rolled a {}! Let's count.", self.roll_value));
                tracing::debug!(roll = self.roll_value, "counting: revealed");
                Progress::Advanced
            }
            Some(CountStep::Celebrate) => {
                self.celebrating = true;
                notifier.cue(Cue::Correct);
                notifier.speak("Great job!");
                notifier.celebrate();
                Progress::Completed
            }
            None => Progress::Ignored,
        }
    }

    /// Tap apple `index`. Only the next uncounted apple responds.
    pub fn tap(&mut self, index: u8, notifier: &mut Notifier) -> Progress {
        if self.phase != CountPhase::Counting || index != self.counted {
            return Progress::Ignored;
        }
        self.counted += 1;
        notifier.cue(Cue::Pop);
        notifier.speak(self.counted.to_string());
        if self.counted == self.roll_value {
            self.phase = CountPhase::Complete;
            self.timeline
                .schedule(CountStep::Celebrate, self.timing.settle_ms);
        }
        Progress::Advanced
    }

    /// Screen is going away: drop anything still scheduled.
    pub fn teardown(&mut self) {
        self.timeline.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dice::{ScriptedDice, SeededDice};

    fn rolled(outcome: u8) -> (CountingGame, Notifier) {
        let mut game = CountingGame::new(Timing::default());
        let mut n = Notifier::new(true);
        let mut dice = ScriptedDice::new([outcome]);
        game.roll(&mut n);
        let ticket = game.pending().unwrap().ticket;
        game.resume(ticket, &mut dice, &mut n);
        (game, n)
    }

    #[test]
    fn roll_schedules_reveal_after_roll_delay() {
        let mut game = CountingGame::new(Timing::default());
        let mut n = Notifier::new(true);
        assert_eq!(game.roll(&mut n), Progress::Advanced);
        assert_eq!(game.phase(), CountPhase::Rolling);
        assert!(game.view().is_rolling);
        assert_eq!(game.pending().unwrap().delay_ms, 1000);
        assert!(n.has_cue(Cue::DiceRoll));
    }

    #[test]
    fn second_roll_while_rolling_is_ignored() {
        let mut game = CountingGame::new(Timing::default());
        let mut n = Notifier::new(true);
        game.roll(&mut n);
        let first = game.pending().unwrap();
        assert_eq!(game.roll(&mut n), Progress::Ignored);
        assert_eq!(game.pending(), Some(first));
    }

    #[test]
    fn reveal_speaks_the_roll() {
        let (game, n) = rolled(4);
        assert_eq!(game.phase(), CountPhase::Counting);
        assert_eq!(game.roll_value(), 4);
        assert_eq!(game.counted(), 0);
        assert_eq!(n.last_spoken(), Some("You rolled a 4! Let's count."));
    }

    #[test]
    fn roll_four_then_tap_in_order_completes() {
        let (mut game, mut n) = rolled(4);
        for i in 0..4 {
            assert_eq!(game.tap(i, &mut n), Progress::Advanced);
        }
        assert_eq!(game.counted(), 4);
        assert_eq!(game.phase(), CountPhase::Complete);
        assert_eq!(n.last_spoken(), Some("4"));

        // Already complete: tapping again does nothing.
        assert_eq!(game.tap(0, &mut n), Progress::Ignored);
        assert_eq!(game.counted(), 4);

        let celebrate = game.pending().unwrap();
        assert_eq!(celebrate.delay_ms, 500);
        let mut n = Notifier::new(true);
        let mut dice = ScriptedDice::default();
        assert_eq!(
            game.resume(celebrate.ticket, &mut dice, &mut n),
            Progress::Completed
        );
        assert!(game.view().celebrating);
        assert!(n.has_cue(Cue::Correct));
        assert_eq!(n.last_spoken(), Some("Great job!"));
    }

    #[test]
    fn out_of_order_taps_are_ignored() {
        let (mut game, mut n) = rolled(5);
        assert_eq!(game.tap(2, &mut n), Progress::Ignored);
        assert_eq!(game.tap(0, &mut n), Progress::Advanced);
        assert_eq!(game.tap(0, &mut n), Progress::Ignored);
        assert_eq!(game.counted(), 1);
    }

    #[test]
    fn taps_while_rolling_are_ignored() {
        let mut game = CountingGame::new(Timing::default());
        let mut n = Notifier::new(true);
        game.roll(&mut n);
        assert_eq!(game.tap(0, &mut n), Progress::Ignored);
        assert_eq!(game.counted(), 0);
    }

    #[test]
    fn reroll_resets_before_next_reveal() {
        let (mut game, mut n) = rolled(3);
        game.tap(0, &mut n);
        game.tap(1, &mut n);
        game.tap(2, &mut n);
        let stale = game.pending().unwrap().ticket;

        game.roll(&mut n);
        assert_eq!(game.counted(), 0);
        assert!(!game.view().celebrating);

        // The celebration scheduled for the old round never fires.
        let mut dice = ScriptedDice::new([2]);
        assert_eq!(game.resume(stale, &mut dice, &mut n), Progress::Ignored);
        assert_eq!(game.phase(), CountPhase::Rolling);
    }

    #[test]
    fn teardown_cancels_pending_reveal() {
        let mut game = CountingGame::new(Timing::default());
        let mut n = Notifier::new(true);
        game.roll(&mut n);
        let ticket = game.pending().unwrap().ticket;
        game.teardown();
        let mut dice = ScriptedDice::new([6]);
        assert_eq!(game.resume(ticket, &mut dice, &mut n), Progress::Ignored);
        assert_eq!(game.phase(), CountPhase::Rolling);
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn counter_never_exceeds_roll() {
        let mut dice = SeededDice::new(2024);
        let mut game = CountingGame::new(Timing::default());
        let mut n = Notifier::new(false);
        for _ in 0..200 {
            game.roll(&mut n);
            let t = game.pending().unwrap().ticket;
            game.resume(t, &mut dice, &mut n);
            let v = game.roll_value();
            assert!((1..=6).contains(&v));
            for i in 0..10 {
                game.tap(i, &mut n);
                assert!(game.counted() <= v);
            }
            assert_eq!(game.counted(), v);
        }
    }
}
