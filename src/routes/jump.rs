//! `/jump` and `/api/jump/*` — the number-line screen.

use crate::game::Progress;
use crate::game::dice::OutcomeSource;
use crate::game::jumping::{self, JumpGame, JumpPhase, JumpView};
use crate::game::notify::{Cue, Notifier};
use crate::game::prefs::Avatar;
use crate::game::session::{Screen, with_session_mut};
use crate::game::timeline::Ticket;
use crate::routes::layout::{self, Size};
use crate::routes::util::Params;

const ROLL_URL: &str = "/api/jump/roll";
const RESET_URL: &str = "/api/jump/reset";
const RESUME_URL: &str = "/api/jump/resume";

// ── GET /jump ──────────────────────────────────────────────────────

pub fn handle_page(query: &str) -> String {
    let params = Params::from_query(query);
    with_session_mut(|s| {
        let mut n = s.notifier();
        if params.get("from").is_some() {
            n.cue(Cue::Pop);
        }
        let game = s.fresh_jumping();
        let board = render_board(&game.view(), s.prefs.avatar());
        s.mount(Screen::Jumping(game));
        let mut html = layout::page(
            Some("Jump Path"),
            s.prefs.settings(),
            "items-center",
            &format!(r#"<div id="game" class="w-full">{}</div>"#, board),
        );
        html.push_str(&n.render_script());
        html
    })
}

// ── POST /api/jump/* ───────────────────────────────────────────────

pub fn handle_roll_post(_body: &str) -> String {
    act(|game, _, n| game.roll(n))
}

pub fn handle_reset_post(_body: &str) -> String {
    act(|game, _, n| game.reset(n))
}

/// Body: `ticket={n}`
pub fn handle_resume_post(body: &str) -> String {
    let params = Params::from_body(body);
    let Some(ticket) = params.get_u64("ticket") else {
        return layout::error_fragment("Missing or invalid ticket parameter");
    };
    act(|game, dice, n| game.resume(Ticket::from_raw(ticket), dice, n))
}

fn act<F>(f: F) -> String
where
    F: FnOnce(&mut JumpGame, &mut dyn OutcomeSource, &mut Notifier) -> Progress,
{
    with_session_mut(|s| {
        let mut n = s.notifier();
        let outcome = match &mut s.screen {
            Screen::Jumping(game) => {
                let progress = f(game, s.dice.as_mut(), &mut n);
                Some((game.view(), progress == Progress::Completed))
            }
            _ => None,
        };
        let Some((view, completed)) = outcome else {
            return layout::screen_closed();
        };
        if completed {
            s.award_badge(jumping::BADGE, &mut n);
        }
        s.flush_storage(&mut n);
        let mut html = render_board(&view, s.prefs.avatar());
        html.push_str(&n.render_script());
        html
    })
}

// ── Rendering ──────────────────────────────────────────────────────

/// Number line, roll panel and status line. Swapped into `#game`.
pub fn render_board(view: &JumpView, avatar: Avatar) -> String {
    let mut h = String::with_capacity(8192);
    h.push_str(r#"<div class="flex flex-col items-center gap-8 w-full">"#);

    // Number line
    h.push_str(r#"<div class="w-full overflow-x-auto pb-8 pt-24 px-4"><div class="flex gap-2 min-w-max mx-auto px-8">"#);
    for i in 0..=view.target {
        let reached = i <= view.position;
        let cell_class = if reached {
            "bg-green-400 border-green-500 text-white"
        } else {
            "bg-white border-slate-200 text-slate-400"
        };
        h.push_str(r#"<div class="relative flex flex-col items-center">"#);
        if i == view.position {
            h.push_str(r#"<div class="absolute -top-24 z-10 transition-all duration-500">"#);
            h.push_str(&layout::avatar_bubble(avatar, Size::Md, "shadow-xl"));
            h.push_str(r#"</div>"#);
        }
        h.push_str(&format!(
            r#"<div class="number-cell w-16 h-16 rounded-2xl flex items-center justify-center text-2xl font-black border-b-4 {}" data-number="{}">{}</div>"#,
            cell_class, i, i
        ));
        h.push_str(r#"</div>"#);
    }
    h.push_str(r#"</div></div>"#);

    // Roll panel
    h.push_str(r#"<div class="bg-white rounded-3xl p-6 shadow-xl flex items-center gap-8 border-4 border-orange-100">"#);
    // Rolling a finished game starts it over.
    h.push_str(&layout::dice(view.roll_value, view.is_rolling, Size::Md, Some(ROLL_URL)));
    let busy = matches!(view.phase, JumpPhase::Rolling | JumpPhase::Jumping);
    let label = match view.phase {
        JumpPhase::Finished => "Play Again",
        JumpPhase::Rolling => "Rolling...",
        JumpPhase::Jumping => "Jumping...",
        JumpPhase::Idle => "Jump!",
    };
    if busy {
        h.push_str(&format!(
            r#"<button disabled class="rounded-full px-10 py-4 text-2xl font-bold bg-orange-300 text-white border-b-4 border-orange-500">{}</button>"#,
            label
        ));
    } else {
        let url = if view.phase == JumpPhase::Finished {
            RESET_URL
        } else {
            ROLL_URL
        };
        h.push_str(&format!(
            r##"<button hx-post="{}" hx-target="#game" hx-swap="innerHTML" class="rounded-full px-10 py-4 text-2xl font-bold bg-orange-500 hover:bg-orange-600 shadow-button active:translate-y-1 active:shadow-none text-white border-b-4 border-orange-700">{}</button>"##,
            url, label
        ));
    }
    h.push_str(r#"</div>"#);

    let message = match view.phase {
        JumpPhase::Finished => "Yay! You reached the end!".to_string(),
        JumpPhase::Jumping if view.steps_left == 1 => "1 hop to go!".to_string(),
        JumpPhase::Jumping => format!("{} hops to go!", view.steps_left),
        JumpPhase::Idle | JumpPhase::Rolling => "Roll the dice to move forward!".to_string(),
    };
    h.push_str(&format!(
        r#"<div class="text-2xl font-bold text-slate-600 text-center">{}</div>"#,
        message
    ));
    h.push_str(r#"</div>"#);

    if let Some(pending) = view.pending {
        h.push_str(&layout::deferred_trigger(RESUME_URL, pending));
    }
    h
}
