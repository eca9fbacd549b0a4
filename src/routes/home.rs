//! `/` menu, the not-found screen, and `/api/screen/leave`.

use crate::game::notify::Cue;
use crate::game::session::{Screen, with_session_mut};
use crate::routes::layout;
use crate::routes::prefs::{render_avatar_picker, render_badge_shelf, render_difficulty};
use crate::routes::util::Params;

// ── Menu ───────────────────────────────────────────────────────────

/// One card on the main menu.
struct MenuCard {
    path: &'static str,
    title: &'static str,
    subtitle: &'static str,
    icon: &'static str,
    color: &'static str,
}

const MENU: [MenuCard; 3] = [
    MenuCard {
        path: "/count",
        title: "Count",
        subtitle: "Roll &amp; Count",
        icon: "&#x1F3B2;",
        color: "bg-blue-400 border-blue-600",
    },
    MenuCard {
        path: "/jump",
        title: "Jump",
        subtitle: "Number Line",
        icon: "&#x1F438;",
        color: "bg-orange-400 border-orange-600",
    },
    MenuCard {
        path: "/feed",
        title: "Feed",
        subtitle: "Subtraction",
        icon: "&#x1F34E;",
        color: "bg-green-400 border-green-600",
    },
];

// ── GET / ──────────────────────────────────────────────────────────

/// Mount the menu. `from` in the query marks a navigation click (pop cue).
pub fn handle_page(query: &str) -> String {
    let params = Params::from_query(query);
    with_session_mut(|s| {
        s.mount(Screen::Home);
        let mut n = s.notifier();
        if params.get("from").is_some() {
            n.cue(Cue::Pop);
        }

        let mut body = String::with_capacity(8192);
        body.push_str(r#"<div class="text-center mb-8"><h1 class="text-6xl md:text-7xl font-black text-white drop-shadow-lg tracking-wide">Funland</h1><p class="text-2xl font-bold text-white/90 mt-2">Math Adventures</p></div>"#);

        body.push_str(r#"<section id="avatar-picker" class="bg-white/70 rounded-3xl p-6 mb-8 shadow-sm">"#);
        body.push_str(&render_avatar_picker(s.prefs.avatar()));
        body.push_str(r#"</section>"#);

        body.push_str(r#"<nav class="grid grid-cols-1 md:grid-cols-3 gap-6 mb-8">"#);
        for card in &MENU {
            body.push_str(&render_card(card));
        }
        body.push_str(r#"</nav>"#);

        body.push_str(r#"<section class="bg-white/70 rounded-3xl p-6 shadow-sm flex flex-col gap-4">"#);
        body.push_str(r#"<h2 class="text-xl font-bold text-slate-600 text-center">My Badges</h2>"#);
        body.push_str(r#"<div id="badge-shelf">"#);
        body.push_str(&render_badge_shelf(s.prefs.state()));
        body.push_str(r#"</div>"#);
        body.push_str(r#"<div id="difficulty">"#);
        body.push_str(&render_difficulty(s.prefs.settings()));
        body.push_str(r#"</div>"#);
        body.push_str(r#"</section>"#);

        let mut html = layout::page(None, s.prefs.settings(), "", &body);
        html.push_str(&n.render_script());
        html
    })
}

fn render_card(card: &MenuCard) -> String {
    format!(
        r##"<a href="{0}" hx-get="{0}?from=menu" hx-target="#app" hx-swap="innerHTML" hx-push-url="{0}" class="menu-card rounded-[2rem] p-6 border-b-8 shadow-xl text-white flex flex-col items-center gap-2 hover:scale-105 active:translate-y-1 transition-transform {1}"><span class="text-7xl">{2}</span><span class="text-3xl font-black">{3}</span><span class="text-lg font-bold text-white/90">{4}</span></a>"##,
        card.path, card.color, card.icon, card.title, card.subtitle
    )
}

// ── Fallbacks ──────────────────────────────────────────────────────

/// Friendly screen for any path nobody handles.
pub fn handle_not_found(_query: &str) -> String {
    with_session_mut(|s| {
        s.mount(Screen::NotFound);
        let body = r##"<div class="flex flex-col items-center justify-center gap-6 flex-1 text-center"><div class="text-8xl">&#x1F648;</div><h2 class="text-4xl font-black text-white drop-shadow">Oops! This page is hiding.</h2><a href="/" hx-get="/?from=back" hx-target="#app" hx-swap="innerHTML" hx-push-url="/" class="rounded-full px-8 py-4 text-xl font-bold bg-orange-400 hover:bg-orange-500 text-white border-b-4 border-orange-600 shadow-button">Go Home</a></div>"##;
        layout::page(Some("Lost?"), s.prefs.settings(), "items-center", body)
    })
}

/// The page is navigating away without loading a new screen.
pub fn handle_leave_post(_body: &str) -> String {
    with_session_mut(|s| s.mount(Screen::Home));
    String::new()
}
