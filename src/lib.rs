//! Funland in-browser WASM server.
//!
//! Exports `handle_request(method, path, query, body)` for the Web Worker
//! bridge to call, and `init_session(config_json)` to (re)start the session
//! with a seed and pacing from the page. Uses `matchit` for URL routing.
//!
//! Screens are the home menu plus three mini-games (counting, number-line
//! jumping, feeding/subtraction). Timed animation steps come back as
//! `/api/<game>/resume` posts carrying the ticket they were scheduled under.

use wasm_bindgen::prelude::*;

pub mod game;
pub mod routes;

/// Process an HTTP-like request and return an HTML fragment.
///
/// Called from JavaScript (Web Worker) via wasm-bindgen.
///
/// # Arguments
/// * `method` — HTTP method ("GET" or "POST")
/// * `path`   — URL path (e.g., "/api/count/tap")
/// * `query`  — Query string (e.g., "?from=menu")
/// * `body`   — Form-encoded POST body. Empty string for GET requests.
///
/// # Returns
/// An HTML string fragment suitable for HTMX to swap into the DOM.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    let mut router = matchit::Router::new();

    // Screens
    router.insert("/", "home").ok();
    router.insert("/count", "count").ok();
    router.insert("/jump", "jump").ok();
    router.insert("/feed", "feed").ok();

    // Counting
    router.insert("/api/count/roll", "count_roll").ok();
    router.insert("/api/count/tap", "count_tap").ok();
    router.insert("/api/count/resume", "count_resume").ok();

    // Jumping
    router.insert("/api/jump/roll", "jump_roll").ok();
    router.insert("/api/jump/reset", "jump_reset").ok();
    router.insert("/api/jump/resume", "jump_resume").ok();

    // Feeding
    router.insert("/api/feed/roll", "feed_roll").ok();
    router.insert("/api/feed/eat", "feed_eat").ok();
    router.insert("/api/feed/next", "feed_next").ok();
    router.insert("/api/feed/resume", "feed_resume").ok();

    // Preferences
    router.insert("/api/prefs/avatar", "prefs_avatar").ok();
    router.insert("/api/prefs/music", "prefs_music").ok();
    router.insert("/api/prefs/sfx", "prefs_sfx").ok();
    router.insert("/api/prefs/difficulty", "prefs_difficulty").ok();
    router.insert("/api/prefs/badge", "prefs_badge").ok();
    router.insert("/api/prefs/badges", "prefs_badges").ok();
    router.insert("/api/prefs/state", "prefs_state").ok();
    router.insert("/api/prefs/restore", "prefs_restore").ok();

    router.insert("/api/screen/leave", "screen_leave").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            // Screens
            ("home", "GET") => routes::home::handle_page(query),
            ("count", "GET") => routes::count::handle_page(query),
            ("jump", "GET") => routes::jump::handle_page(query),
            ("feed", "GET") => routes::feed::handle_page(query),

            ("count_roll", "POST") => routes::count::handle_roll_post(body),
            ("count_tap", "POST") => routes::count::handle_tap_post(body),
            ("count_resume", "POST") => routes::count::handle_resume_post(body),

            ("jump_roll", "POST") => routes::jump::handle_roll_post(body),
            ("jump_reset", "POST") => routes::jump::handle_reset_post(body),
            ("jump_resume", "POST") => routes::jump::handle_resume_post(body),

            ("feed_roll", "POST") => routes::feed::handle_roll_post(body),
            ("feed_eat", "POST") => routes::feed::handle_eat_post(body),
            ("feed_next", "POST") => routes::feed::handle_next_post(body),
            ("feed_resume", "POST") => routes::feed::handle_resume_post(body),

            ("prefs_avatar", "POST") => routes::prefs::handle_avatar_post(body),
            ("prefs_music", "POST") => routes::prefs::handle_music_post(body),
            ("prefs_sfx", "POST") => routes::prefs::handle_sfx_post(body),
            ("prefs_difficulty", "POST") => routes::prefs::handle_difficulty_post(body),
            ("prefs_badge", "POST") => routes::prefs::handle_badge_post(body),
            ("prefs_badges", "GET") => routes::prefs::handle_badges_get(query),
            ("prefs_state", "GET") => routes::prefs::handle_state_get(query),
            ("prefs_restore", "POST") => routes::prefs::handle_restore_post(body),

            ("screen_leave", "POST") => routes::home::handle_leave_post(body),

            _ => method_not_allowed(),
        },
        // Unknown pages get a screen of their own; unknown API calls don't
        // disturb whatever is mounted.
        Err(_) if method == "GET" && !path.starts_with("/api/") => {
            routes::home::handle_not_found(query)
        }
        Err(_) => not_found(),
    }
}

/// Reconfigure the session from a JSON config (`seed`, `jump_target`,
/// delays). Restored preferences survive; the mounted game does not.
///
/// Returns `"ok"`, or `"error: ..."` when the config was rejected and the
/// defaults were applied instead.
#[wasm_bindgen]
pub fn init_session(config_json: &str) -> String {
    match game::session::init_session(config_json) {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("error: {}", e),
    }
}

fn not_found() -> String {
    r#"<span class="text-red-600 font-bold">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-600 font-bold">405 — method not allowed</span>"#.to_string()
}
