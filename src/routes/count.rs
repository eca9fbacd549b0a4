//! `/count` and `/api/count/*` — the Roll & Count screen.

use crate::game::Progress;
use crate::game::counting::{self, CountPhase, CountView, CountingGame};
use crate::game::dice::OutcomeSource;
use crate::game::notify::{Cue, Notifier};
use crate::game::session::{Screen, with_session_mut};
use crate::game::timeline::Ticket;
use crate::routes::layout::{self, Size};
use crate::routes::util::Params;

const ROLL_URL: &str = "/api/count/roll";
const RESUME_URL: &str = "/api/count/resume";

// ── GET /count ─────────────────────────────────────────────────────

/// Mount a fresh counting game and render the whole screen.
pub fn handle_page(query: &str) -> String {
    let params = Params::from_query(query);
    with_session_mut(|s| {
        let mut n = s.notifier();
        if params.get("from").is_some() {
            n.cue(Cue::Pop);
        }
        let game = s.fresh_counting();
        let board = render_board(&game.view());
        s.mount(Screen::Counting(game));
        let mut html = layout::page(
            Some("Roll & Count"),
            s.prefs.settings(),
            "items-center",
            &format!(r#"<div id="game" class="w-full">{}</div>"#, board),
        );
        html.push_str(&n.render_script());
        html
    })
}

// ── POST /api/count/* ──────────────────────────────────────────────

pub fn handle_roll_post(_body: &str) -> String {
    act(|game, _, n| game.roll(n))
}

/// Body: `index={n}`
pub fn handle_tap_post(body: &str) -> String {
    let params = Params::from_body(body);
    let Some(index) = params.get_u8("index") else {
        return layout::error_fragment("Missing or invalid index parameter");
    };
    act(|game, _, n| game.tap(index, n))
}

/// Body: `ticket={n}`
pub fn handle_resume_post(body: &str) -> String {
    let params = Params::from_body(body);
    let Some(ticket) = params.get_u64("ticket") else {
        return layout::error_fragment("Missing or invalid ticket parameter");
    };
    act(|game, dice, n| game.resume(Ticket::from_raw(ticket), dice, n))
}

/// Run `f` against the mounted counting game and re-render its board.
fn act<F>(f: F) -> String
where
    F: FnOnce(&mut CountingGame, &mut dyn OutcomeSource, &mut Notifier) -> Progress,
{
    with_session_mut(|s| {
        let mut n = s.notifier();
        let view = match &mut s.screen {
            Screen::Counting(game) => {
                let progress = f(game, s.dice.as_mut(), &mut n);
                Some((game.view(), progress == Progress::Completed))
            }
            _ => None,
        };
        let Some((view, completed)) = view else {
            return layout::screen_closed();
        };
        if completed {
            s.award_badge(counting::BADGE, &mut n);
        }
        s.flush_storage(&mut n);
        let mut html = render_board(&view);
        html.push_str(&n.render_script());
        html
    })
}

// ── Rendering ──────────────────────────────────────────────────────

/// Render the dice and the row of apples. Swapped into `#game`.
pub fn render_board(view: &CountView) -> String {
    let mut h = String::with_capacity(4096);
    h.push_str(r#"<div class="flex flex-col items-center gap-10 w-full max-w-4xl flex-1 justify-center">"#);

    // Dice + roll button
    h.push_str(r#"<div class="relative flex flex-col items-center gap-6">"#);
    h.push_str(&layout::dice(view.roll_value, view.is_rolling, Size::Lg, Some(ROLL_URL)));
    if view.is_rolling {
        h.push_str(r#"<button disabled class="rounded-full px-8 py-4 text-xl font-bold bg-blue-300 text-white border-b-4 border-blue-500">Rolling...</button>"#);
    } else {
        h.push_str(&format!(
            r##"<button hx-post="{}" hx-target="#game" hx-swap="innerHTML" class="rounded-full px-8 py-4 text-xl font-bold bg-blue-500 hover:bg-blue-600 shadow-button active:translate-y-1 active:shadow-none text-white border-b-4 border-blue-700">Roll Dice!</button>"##,
            ROLL_URL
        ));
    }
    h.push_str(r#"</div>"#);

    // Counting area
    h.push_str(r#"<div class="bg-white/60 rounded-[3rem] p-8 w-full min-h-[300px] border-4 border-white shadow-inner flex flex-col items-center justify-center">"#);
    match view.phase {
        CountPhase::Idle => {
            h.push_str(r#"<p class="text-3xl font-black text-slate-500">Roll the dice to start!</p>"#);
        }
        CountPhase::Rolling => {
            h.push_str(r#"<p class="text-3xl font-black text-slate-400">...</p>"#);
        }
        CountPhase::Counting | CountPhase::Complete => {
            h.push_str(r#"<div class="flex flex-wrap justify-center gap-6">"#);
            for i in 0..view.roll_value {
                h.push_str(&render_item(i, view));
            }
            h.push_str(r#"</div>"#);
            let caption = if view.celebrating {
                format!("{} apples. Great job!", view.counted)
            } else if view.counted > 0 {
                view.counted.to_string()
            } else {
                "Tap to count!".to_string()
            };
            h.push_str(&format!(
                r#"<div class="mt-8 text-4xl font-black text-slate-700 h-12">{}</div>"#,
                caption
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

fn render_item(i: u8, view: &CountView) -> String {
    let counted = i < view.counted;
    let mut h = String::with_capacity(512);
    h.push_str(r#"<div class="relative">"#);
    if counted {
        h.push_str(&format!(
            r#"<div class="count-item w-20 h-20 rounded-full flex items-center justify-center text-4xl shadow-md border-4 bg-green-400 border-green-500 text-white font-black">{}</div>"#,
            i + 1
        ));
    } else {
        h.push_str(&format!(
            r##"<button hx-post="/api/count/tap" hx-vals='{{"index":"{}"}}' hx-target="#game" hx-swap="innerHTML" aria-label="Apple {}" class="count-item w-20 h-20 rounded-full flex items-center justify-center text-4xl shadow-md border-4 bg-white border-slate-200 hover:border-blue-300 cursor-pointer">&#x1F34E;</button>"##,
            i,
            i + 1
        ));
    }
    if i == view.counted && view.phase == CountPhase::Counting {
        h.push_str(r#"<div class="absolute -top-8 left-1/2 -translate-x-1/2 text-2xl animate-bounce">&#x1F447;</div>"#);
    }
    h.push_str(r#"</div>"#);
    h
}
