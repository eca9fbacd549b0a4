//! `/feed` and `/api/feed/*` — the subtraction screen.

use crate::game::Progress;
use crate::game::dice::OutcomeSource;
use crate::game::feeding::{self, FeedPhase, FeedView, FeedingGame};
use crate::game::notify::{Cue, Notifier};
use crate::game::prefs::Avatar;
use crate::game::session::{Screen, with_session_mut};
use crate::game::timeline::Ticket;
use crate::routes::layout::{self, Size};
use crate::routes::util::Params;

const ROLL_URL: &str = "/api/feed/roll";
const NEXT_URL: &str = "/api/feed/next";
const RESUME_URL: &str = "/api/feed/resume";

// ── GET /feed ──────────────────────────────────────────────────────

/// Mount the screen and lay out the first pile of apples.
pub fn handle_page(query: &str) -> String {
    let params = Params::from_query(query);
    with_session_mut(|s| {
        let mut n = s.notifier();
        if params.get("from").is_some() {
            n.cue(Cue::Pop);
        }
        let mut game = s.fresh_feeding();
        game.start_round(s.dice.as_mut(), &mut n);
        let board = render_board(&game.view(), s.prefs.avatar());
        s.mount(Screen::Feeding(game));
        let mut html = layout::page(
            Some("Feeding Time"),
            s.prefs.settings(),
            "items-center",
            &format!(r#"<div id="game" class="w-full">{}</div>"#, board),
        );
        html.push_str(&n.render_script());
        html
    })
}

// ── POST /api/feed/* ───────────────────────────────────────────────

pub fn handle_roll_post(_body: &str) -> String {
    act(|game, _, _, n| game.roll_dice(n))
}

pub fn handle_next_post(_body: &str) -> String {
    act(|game, dice, _, n| game.next_round(dice, n))
}

/// Body: `index={n}`
pub fn handle_eat_post(body: &str) -> String {
    let params = Params::from_body(body);
    let Some(index) = params.get_u8("index") else {
        return layout::error_fragment("Missing or invalid index parameter");
    };
    act(|game, _, _, n| game.feed(index, n))
}

/// Body: `ticket={n}`
pub fn handle_resume_post(body: &str) -> String {
    let params = Params::from_body(body);
    let Some(ticket) = params.get_u64("ticket") else {
        return layout::error_fragment("Missing or invalid ticket parameter");
    };
    act(|game, dice, avatar, n| game.resume(Ticket::from_raw(ticket), dice, avatar, n))
}

fn act<F>(f: F) -> String
where
    F: FnOnce(&mut FeedingGame, &mut dyn OutcomeSource, Avatar, &mut Notifier) -> Progress,
{
    with_session_mut(|s| {
        let mut n = s.notifier();
        let avatar = s.prefs.avatar();
        let outcome = match &mut s.screen {
            Screen::Feeding(game) => {
                let progress = f(game, s.dice.as_mut(), avatar, &mut n);
                Some((game.view(), progress == Progress::Completed))
            }
            _ => None,
        };
        let Some((view, completed)) = outcome else {
            return layout::screen_closed();
        };
        if completed {
            s.award_badge(feeding::BADGE, &mut n);
        }
        s.flush_storage(&mut n);
        let mut html = render_board(&view, avatar);
        html.push_str(&n.render_script());
        html
    })
}

// ── Rendering ──────────────────────────────────────────────────────

fn story(view: &FeedView, avatar: Avatar) -> String {
    match view.phase {
        FeedPhase::Start | FeedPhase::Roll => format!("How many will {} eat?", avatar.name()),
        FeedPhase::Eat => format!("Tap {} more apples!", view.roll_value - view.eaten),
        FeedPhase::End => format!(
            "{}!",
            feeding::subtraction_sentence(view.initial_count, view.roll_value)
        ),
    }
}

/// Story line, the avatar with its apples, and the round controls.
pub fn render_board(view: &FeedView, avatar: Avatar) -> String {
    let mut h = String::with_capacity(8192);
    h.push_str(r#"<div class="flex flex-col items-center gap-8 w-full max-w-4xl">"#);

    h.push_str(&format!(
        r#"<div class="bg-white/80 rounded-3xl px-8 py-4 shadow-sm text-center"><p class="story text-3xl font-black text-slate-700">{}</p></div>"#,
        story(view, avatar)
    ));

    // Scene
    h.push_str(r#"<div class="bg-green-100 rounded-[3rem] p-8 w-full border-8 border-white shadow-xl flex flex-col md:flex-row items-center gap-8">"#);
    let bounce = if view.phase == FeedPhase::Eat { "animate-bounce" } else { "" };
    h.push_str(&layout::avatar_bubble(avatar, Size::Xl, bounce));
    h.push_str(r#"<div class="flex flex-wrap justify-center gap-4 flex-1">"#);
    let clickable = view.phase == FeedPhase::Eat && view.eaten < view.roll_value;
    for i in view.eaten..view.initial_count {
        if clickable {
            h.push_str(&format!(
                r##"<button hx-post="/api/feed/eat" hx-vals='{{"index":"{}"}}' hx-target="#game" hx-swap="innerHTML" aria-label="Apple {}" class="apple w-16 h-16 text-5xl hover:scale-110 transition-transform cursor-pointer">&#x1F34E;</button>"##,
                i,
                i + 1
            ));
        } else {
            h.push_str(r#"<div class="apple w-16 h-16 text-5xl opacity-90">&#x1F34E;</div>"#);
        }
    }
    h.push_str(r#"</div></div>"#);

    // Controls
    h.push_str(r#"<div class="flex items-center gap-6 min-h-[7rem]">"#);
    match view.phase {
        FeedPhase::Start | FeedPhase::Roll => {
            h.push_str(&layout::dice(view.roll_value.max(1), view.is_rolling, Size::Md, Some(ROLL_URL)));
            if view.is_rolling {
                h.push_str(r#"<button disabled class="rounded-full px-8 py-4 text-xl font-bold bg-green-300 text-white border-b-4 border-green-500">Rolling...</button>"#);
            } else {
                h.push_str(&format!(
                    r##"<button hx-post="{}" hx-target="#game" hx-swap="innerHTML" class="rounded-full px-8 py-4 text-xl font-bold bg-green-500 hover:bg-green-600 shadow-button active:translate-y-1 active:shadow-none text-white border-b-4 border-green-700">Roll Dice</button>"##,
                    ROLL_URL
                ));
            }
        }
        FeedPhase::Eat => {
            h.push_str(&layout::dice(view.roll_value, false, Size::Md, None));
        }
        FeedPhase::End => {
            h.push_str(&format!(
                r##"<button hx-post="{}" hx-target="#game" hx-swap="innerHTML" class="rounded-full px-8 py-4 text-xl font-bold bg-blue-500 hover:bg-blue-600 shadow-button active:translate-y-1 active:shadow-none text-white border-b-4 border-blue-700">Next Round</button>"##,
                NEXT_URL
            ));
        }
    }
    h.push_str(r#"</div>"#);
    h.push_str(r#"</div>"#);

    if let Some(pending) = view.pending {
        h.push_str(&layout::deferred_trigger(RESUME_URL, pending));
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dice::ScriptedDice;
    use crate::game::session::{reset_session, with_session};

    fn pending_ticket() -> u64 {
        with_session(|s| match &s.screen {
            Screen::Feeding(g) => g.pending().map(|d| d.ticket.raw()).unwrap_or(0),
            _ => 0,
        })
    }

    fn resume() -> String {
        handle_resume_post(&format!("ticket={}", pending_ticket()))
    }

    #[test]
    fn page_starts_first_round() {
        reset_session();
        with_session_mut(|s| s.dice = Box::new(ScriptedDice::new([6])));
        let html = handle_page("from=menu");
        assert!(html.contains("Feeding Time"));
        assert_eq!(html.matches(r#"class="apple "#).count(), 6);
        assert!(html.contains("How many will Dino eat?"));
        assert!(html.contains("Here are 6 apples!"));
        assert!(html.contains("Roll Dice"));
        reset_session();
    }

    #[test]
    fn full_round_tells_subtraction() {
        reset_session();
        with_session_mut(|s| s.dice = Box::new(ScriptedDice::new([6, 4])));
        handle_page("");
        assert!(handle_roll_post("").contains("Rolling..."));
        let html = resume();
        assert!(html.contains("Feed 4 apples to Dino! Tap them."));
        assert!(html.contains("Tap 4 more apples!"));
        assert!(html.contains("/api/feed/eat"));

        for _ in 0..3 {
            handle_eat_post("index=5");
        }
        let html = handle_eat_post("index=5");
        assert!(html.contains("load delay:500ms"));
        // Appetite is satisfied; further taps do nothing.
        let html = handle_eat_post("index=5");
        assert!(!html.contains("<script>"));

        let html = resume();
        assert!(html.contains("6 - 4 = 2 left!"));
        assert!(html.contains("Yum! 6 - 4 = 2 left!"));
        assert!(html.contains("Next Round"));
        assert_eq!(html.matches(r#"class="apple "#).count(), 2);
        with_session(|s| assert!(s.prefs.state().badges.contains(feeding::BADGE)));
        reset_session();
    }

    #[test]
    fn next_round_lays_out_new_pile() {
        reset_session();
        with_session_mut(|s| s.dice = Box::new(ScriptedDice::new([5, 1, 8])));
        handle_page("");
        handle_roll_post("");
        resume();
        handle_eat_post("index=0");
        resume();
        let html = handle_next_post("");
        assert!(html.contains("Here are 8 apples!"));
        assert_eq!(html.matches(r#"class="apple "#).count(), 8);
        reset_session();
    }

    #[test]
    fn next_round_mid_round_is_ignored() {
        reset_session();
        handle_page("");
        let html = handle_next_post("");
        assert!(!html.contains("<script>"));
        reset_session();
    }

    #[test]
    fn avatar_choice_appears_in_story() {
        reset_session();
        with_session_mut(|s| {
            s.prefs.set_avatar(Avatar::Mimi);
            s.dice = Box::new(ScriptedDice::new([7, 2]));
        });
        let html = handle_page("");
        assert!(html.contains("How many will Mimi eat?"));
        assert!(html.contains(r#"data-testid="avatar-mimi""#));
        handle_roll_post("");
        assert!(resume().contains("Feed 2 apples to Mimi!"));
        reset_session();
    }
}
