//! Jump Path — hop the avatar along a number line from 0 to the target.
//!
//! A roll of 1–3 becomes that many hops, each one delayed so the page can
//! animate it. Hops stop early at the target. Once finished, the roll action
//! doubles as "play again".

use crate::game::Progress;
use crate::game::config::Timing;
use crate::game::dice::{JUMP_RANGE, OutcomeSource};
use crate::game::notify::{Cue, Notifier};
use crate::game::timeline::{Deferred, Ticket, Timeline};

pub const BADGE: &str = "path-finder";
pub const DEFAULT_TARGET: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Idle,
    Rolling,
    Jumping,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JumpStep {
    Reveal,
    Hop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpView {
    pub phase: JumpPhase,
    pub target: u8,
    pub position: u8,
    pub roll_value: u8,
    pub steps_left: u8,
    pub is_rolling: bool,
    pub pending: Option<Deferred>,
}

#[derive(Debug, Clone)]
pub struct JumpGame {
    timing: Timing,
    target: u8,
    position: u8,
    roll_value: u8,
    steps_left: u8,
    phase: JumpPhase,
    timeline: Timeline<JumpStep>,
}

impl JumpGame {
    pub fn new(target: u8, timing: Timing) -> Self {
        Self {
            timing,
            target: target.max(1),
            position: 0,
            roll_value: 1,
            steps_left: 0,
            phase: JumpPhase::Idle,
            timeline: Timeline::default(),
        }
    }

    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.target
    }

    pub fn pending(&self) -> Option<Deferred> {
        self.timeline.pending()
    }

    pub fn view(&self) -> JumpView {
        JumpView {
            phase: self.phase,
            target: self.target,
            position: self.position,
            roll_value: self.roll_value,
            steps_left: self.steps_left,
            is_rolling: self.phase == JumpPhase::Rolling,
            pending: self.timeline.pending(),
        }
    }

    /// Roll for the next jump, or start over once the target is reached.
    pub fn roll(&mut self, notifier: &mut Notifier) -> Progress {
        if self.is_finished() {
            return self.reset(notifier);
        }
        if matches!(self.phase, JumpPhase::Rolling | JumpPhase::Jumping) {
            return Progress::Ignored;
        }
        self.phase = JumpPhase::Rolling;
        notifier.cue(Cue::DiceRoll);
        self.timeline.schedule(JumpStep::Reveal, self.timing.roll_ms);
        Progress::Advanced
    }

    pub fn resume(
        &mut self,
        ticket: Ticket,
        dice: &mut dyn OutcomeSource,
        notifier: &mut Notifier,
    ) -> Progress {
        match self.timeline.resume(ticket) {
            Some(JumpStep::Reveal) => {
                let steps = dice.roll(JUMP_RANGE.0, JUMP_RANGE.1);
                self.roll_value = steps;
                self.steps_left = steps;
                self.phase = JumpPhase::Jumping;
                notifier.speak(format!("Jump {} times!", steps));
                tracing::debug!(steps, position = self.position, "jump: revealed");
                self.timeline.schedule(JumpStep::Hop, self.timing.hop_ms);
                Progress::Advanced
            }
            Some(JumpStep::Hop) => self.hop(notifier),
            None => Progress::Ignored,
        }
    }

    fn hop(&mut self, notifier: &mut Notifier) -> Progress {
        if self.position < self.target {
            self.position += 1;
            self.steps_left = self.steps_left.saturating_sub(1);
            notifier.cue(Cue::Pop);
        }
        if self.is_finished() {
            self.steps_left = 0;
            self.phase = JumpPhase::Finished;
            notifier.cue(Cue::Correct);
            notifier.speak("You made it!");
            notifier.celebrate();
            tracing::debug!(goal = self.target, "jump: finished");
            return Progress::Completed;
        }
        if self.steps_left > 0 {
            self.timeline.schedule(JumpStep::Hop, self.timing.hop_ms);
        } else {
            self.phase = JumpPhase::Idle;
        }
        Progress::Advanced
    }

    /// Back to the start line. Only meaningful once finished.
    pub fn reset(&mut self, notifier: &mut Notifier) -> Progress {
        if !self.is_finished() {
            return Progress::Ignored;
        }
        self.timeline.cancel();
        self.position = 0;
        self.steps_left = 0;
        self.phase = JumpPhase::Idle;
        notifier.cue(Cue::Pop);
        Progress::Advanced
    }

    pub fn teardown(&mut self) {
        self.timeline.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dice::{ScriptedDice, SeededDice};

    /// Drive every pending step to completion.
    fn run(game: &mut JumpGame, dice: &mut dyn OutcomeSource, n: &mut Notifier) {
        while let Some(d) = game.pending() {
            game.resume(d.ticket, dice, n);
        }
    }

    #[test]
    fn roll_then_hops_with_delay() {
        let mut game = JumpGame::new(DEFAULT_TARGET, Timing::default());
        let mut n = Notifier::new(true);
        let mut dice = ScriptedDice::new([2]);
        game.roll(&mut n);
        assert_eq!(game.phase(), JumpPhase::Rolling);

        let reveal = game.pending().unwrap();
        game.resume(reveal.ticket, &mut dice, &mut n);
        assert_eq!(game.phase(), JumpPhase::Jumping);
        assert_eq!(n.last_spoken(), Some("Jump 2 times!"));
        assert_eq!(game.position(), 0);
        assert_eq!(game.pending().unwrap().delay_ms, 600);

        run(&mut game, &mut dice, &mut n);
        assert_eq!(game.position(), 2);
        assert_eq!(game.phase(), JumpPhase::Idle);
    }

    #[test]
    fn roll_ignored_while_jumping() {
        let mut game = JumpGame::new(DEFAULT_TARGET, Timing::default());
        let mut n = Notifier::new(true);
        let mut dice = ScriptedDice::new([3]);
        game.roll(&mut n);
        assert_eq!(game.roll(&mut n), Progress::Ignored);
        let t = game.pending().unwrap().ticket;
        game.resume(t, &mut dice, &mut n);
        assert_eq!(game.roll(&mut n), Progress::Ignored);
    }

    #[test]
    fn stops_at_target_without_extra_hop() {
        let mut game = JumpGame::new(12, Timing::default());
        let mut n = Notifier::new(true);
        let mut dice = ScriptedDice::new([3, 3, 3, 1]);
        // 3 + 3 + 3 + 1 = 10
        for _ in 0..4 {
            game.roll(&mut n);
            run(&mut game, &mut dice, &mut n);
        }
        assert_eq!(game.position(), 10);
        assert!(!game.is_finished());

        let mut n = Notifier::new(true);
        dice.push(3);
        game.roll(&mut n);
        let t = game.pending().unwrap().ticket;
        game.resume(t, &mut dice, &mut n);

        let hop = game.pending().unwrap().ticket;
        assert_eq!(game.resume(hop, &mut dice, &mut n), Progress::Advanced);
        assert_eq!(game.position(), 11);

        let hop = game.pending().unwrap().ticket;
        assert_eq!(game.resume(hop, &mut dice, &mut n), Progress::Completed);
        assert_eq!(game.position(), 12);
        assert!(game.is_finished());
        assert_eq!(game.phase(), JumpPhase::Finished);
        assert!(game.pending().is_none());
        assert!(n.has_cue(Cue::Correct));
        assert_eq!(n.last_spoken(), Some("You made it!"));
    }

    #[test]
    fn roll_when_finished_resets() {
        let mut game = JumpGame::new(2, Timing::default());
        let mut n = Notifier::new(true);
        let mut dice = ScriptedDice::new([3]);
        game.roll(&mut n);
        run(&mut game, &mut dice, &mut n);
        assert!(game.is_finished());

        let mut n = Notifier::new(true);
        assert_eq!(game.roll(&mut n), Progress::Advanced);
        assert_eq!(game.position(), 0);
        assert_eq!(game.phase(), JumpPhase::Idle);
        assert!(n.has_cue(Cue::Pop));
        assert!(game.pending().is_none());
    }

    #[test]
    fn reset_before_finish_is_ignored() {
        let mut game = JumpGame::new(12, Timing::default());
        let mut n = Notifier::new(true);
        let mut dice = ScriptedDice::new([2]);
        game.roll(&mut n);
        run(&mut game, &mut dice, &mut n);
        assert_eq!(game.reset(&mut n), Progress::Ignored);
        assert_eq!(game.position(), 2);
    }

    #[test]
    fn teardown_mid_jump_freezes_position() {
        let mut game = JumpGame::new(12, Timing::default());
        let mut n = Notifier::new(true);
        let mut dice = ScriptedDice::new([3]);
        game.roll(&mut n);
        let t = game.pending().unwrap().ticket;
        game.resume(t, &mut dice, &mut n);
        let hop = game.pending().unwrap().ticket;
        game.resume(hop, &mut dice, &mut n);
        let next = game.pending().unwrap().ticket;

        game.teardown();
        assert_eq!(game.resume(next, &mut dice, &mut n), Progress::Ignored);
        assert_eq!(game.position(), 1);
    }

    #[test]
    fn position_is_monotonic_and_bounded() {
        let mut dice = SeededDice::new(31337);
        let mut game = JumpGame::new(12, Timing::default());
        let mut n = Notifier::new(false);
        let mut last = 0;
        let mut finished_at = None;
        for round in 0..40 {
            game.roll(&mut n);
            while let Some(d) = game.pending() {
                game.resume(d.ticket, &mut dice, &mut n);
                assert!(game.position() >= last);
                assert!(game.position() <= 12);
                if game.is_finished() {
                    assert_eq!(game.position(), 12);
                }
                last = game.position();
            }
            if game.is_finished() {
                finished_at = Some(round);
                break;
            }
        }
        assert!(finished_at.is_some());
    }
}
