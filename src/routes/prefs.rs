//! `/api/prefs/*` — avatar, audio switches, difficulty, badges, and the
//! localStorage round trip.

use crate::game::counting;
use crate::game::feeding;
use crate::game::jumping;
use crate::game::notify::Cue;
use crate::game::prefs::{Avatar, Difficulty, PreferenceState, Settings};
use crate::game::session::{with_session, with_session_mut};
use crate::routes::layout::{self, Size};
use crate::routes::util::{Params, escape_html};

/// Badges the games hand out, with their shelf label and icon.
const KNOWN_BADGES: [(&str, &str, &str); 3] = [
    (counting::BADGE, "Counting Star", "&#x2B50;"),
    (jumping::BADGE, "Path Finder", "&#x1F438;"),
    (feeding::BADGE, "Kind Feeder", "&#x1F34E;"),
];

// ── Handlers ───────────────────────────────────────────────────────

/// Body: `id={avatar}`
pub fn handle_avatar_post(body: &str) -> String {
    let params = Params::from_body(body);
    let Some(avatar) = params.get("id").and_then(Avatar::parse) else {
        return layout::error_fragment("Unknown avatar");
    };
    with_session_mut(|s| {
        s.prefs.set_avatar(avatar);
        let mut n = s.notifier();
        n.cue(Cue::Pop);
        n.speak(format!("Hi {}!", avatar.name()));
        s.flush_storage(&mut n);
        let mut html = render_avatar_picker(avatar);
        html.push_str(&n.render_script());
        html
    })
}

pub fn handle_music_post(_body: &str) -> String {
    with_session_mut(|s| {
        let on = s.prefs.toggle_music();
        let mut n = s.notifier();
        n.music(on);
        s.flush_storage(&mut n);
        let mut html = layout::audio_toggles(s.prefs.settings());
        html.push_str(&n.render_script());
        html
    })
}

pub fn handle_sfx_post(_body: &str) -> String {
    with_session_mut(|s| {
        s.prefs.toggle_sfx();
        // Silent when the switch was just turned off.
        let mut n = s.notifier();
        n.cue(Cue::Pop);
        s.flush_storage(&mut n);
        let mut html = layout::audio_toggles(s.prefs.settings());
        html.push_str(&n.render_script());
        html
    })
}

/// Body: `level=easy|hard`
pub fn handle_difficulty_post(body: &str) -> String {
    let params = Params::from_body(body);
    let Some(level) = params.get("level").and_then(Difficulty::parse) else {
        return layout::error_fragment("Unknown difficulty");
    };
    with_session_mut(|s| {
        s.prefs.set_difficulty(level);
        let mut n = s.notifier();
        n.cue(Cue::Pop);
        s.flush_storage(&mut n);
        let mut html = render_difficulty(s.prefs.settings());
        html.push_str(&n.render_script());
        html
    })
}

/// Body: `badge={id}`. Earning one twice is the same as once.
pub fn handle_badge_post(body: &str) -> String {
    let params = Params::from_body(body);
    let badge = params.get("badge").map(str::trim).unwrap_or_default();
    if badge.is_empty() {
        return layout::error_fragment("Missing badge parameter");
    }
    with_session_mut(|s| {
        let mut n = s.notifier();
        s.award_badge(badge, &mut n);
        s.flush_storage(&mut n);
        let mut html = render_badge_shelf(s.prefs.state());
        html.push_str(&n.render_script());
        html
    })
}

pub fn handle_badges_get(_query: &str) -> String {
    with_session(|s| render_badge_shelf(s.prefs.state()))
}

/// The encoded preference blob, for the page to keep.
pub fn handle_state_get(_query: &str) -> String {
    with_session(|s| match s.prefs.state().encode() {
        Ok(blob) => blob,
        Err(e) => layout::error_fragment(&format!("Could not encode preferences: {}", e)),
    })
}

/// Seed preferences from the page's stored blob, sent either as
/// `state={blob}` or as the raw body. A blob that does not decode still
/// resets to defaults; the answer says why.
pub fn handle_restore_post(body: &str) -> String {
    let params = Params::from_body(body);
    let blob = match params.get("state") {
        Some(v) => v.trim().to_string(),
        None => body.trim().to_string(),
    };
    with_session_mut(|s| {
        if blob.is_empty() {
            s.restore_prefs("");
            return "ok".to_string();
        }
        match PreferenceState::decode(&blob) {
            Ok(_) => {
                s.restore_prefs(&blob);
                tracing::debug!(avatar = s.prefs.avatar().id(), "preferences restored");
                "ok".to_string()
            }
            Err(e) => {
                tracing::warn!("discarding stored preferences: {}", e);
                s.restore_prefs("");
                format!("error: {}", e)
            }
        }
    })
}

// ── Rendering ──────────────────────────────────────────────────────

/// Four avatar buttons; the chosen one is ringed. Swapped into `#avatar-picker`.
pub fn render_avatar_picker(selected: Avatar) -> String {
    let mut h = String::with_capacity(2048);
    h.push_str(r#"<p class="text-xl font-bold text-slate-600 mb-3 text-center">Choose your friend</p>"#);
    h.push_str(r#"<div class="flex gap-4 justify-center">"#);
    for avatar in Avatar::ALL {
        let ring = if avatar == selected {
            "ring-4 ring-yellow-400 scale-110"
        } else {
            "opacity-80 hover:opacity-100"
        };
        h.push_str(&format!(
            r##"<button hx-post="/api/prefs/avatar" hx-vals='{{"id":"{}"}}' hx-target="#avatar-picker" hx-swap="innerHTML" aria-label="Choose {}" aria-pressed="{}" class="rounded-full transition-transform {}">"##,
            avatar.id(),
            avatar.name(),
            avatar == selected,
            ring
        ));
        h.push_str(&layout::avatar_bubble(avatar, Size::Lg, ""));
        h.push_str(r#"</button>"#);
    }
    h.push_str(r#"</div>"#);
    h
}

/// Earned badges light up; the rest stay grey. Swapped into `#badge-shelf`.
pub fn render_badge_shelf(state: &PreferenceState) -> String {
    let mut h = String::with_capacity(1024);
    h.push_str(r#"<div class="flex flex-wrap gap-3 justify-center">"#);
    for (id, label, icon) in KNOWN_BADGES {
        let earned = state.badges.contains(id);
        let class = if earned {
            "bg-yellow-100 border-yellow-400 text-slate-700"
        } else {
            "bg-white/50 border-white text-slate-400 grayscale"
        };
        h.push_str(&format!(
            r#"<div class="badge rounded-full px-4 py-2 border-4 font-bold flex items-center gap-2 {}" data-badge="{}" data-earned="{}"><span>{}</span>{}</div>"#,
            class, id, earned, icon, label
        ));
    }
    for id in state
        .badges
        .iter()
        .filter(|b| !KNOWN_BADGES.iter().any(|(known, _, _)| known == b))
    {
        h.push_str(&format!(
            r#"<div class="badge rounded-full px-4 py-2 border-4 font-bold flex items-center gap-2 bg-yellow-100 border-yellow-400 text-slate-700" data-badge="{0}" data-earned="true"><span>&#x1F3C5;</span>{0}</div>"#,
            escape_html(id)
        ));
    }
    h.push_str(r#"</div>"#);
    h
}

/// Easy/hard switch. Swapped into `#difficulty`.
pub fn render_difficulty(settings: &Settings) -> String {
    let mut h = String::with_capacity(512);
    h.push_str(r#"<div class="flex gap-2 justify-center">"#);
    for level in [Difficulty::Easy, Difficulty::Hard] {
        let active = settings.difficulty == level;
        let class = if active {
            "bg-purple-500 text-white border-purple-700"
        } else {
            "bg-white text-slate-500 border-slate-200"
        };
        h.push_str(&format!(
            r##"<button hx-post="/api/prefs/difficulty" hx-vals='{{"level":"{0}"}}' hx-target="#difficulty" hx-swap="innerHTML" aria-pressed="{1}" class="rounded-full px-5 py-2 font-bold border-b-4 capitalize {2}">{0}</button>"##,
            level.as_str(),
            active,
            class
        ));
    }
    h.push_str(r#"</div>"#);
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::session::reset_session;

    #[test]
    fn avatar_choice_greets_and_persists() {
        reset_session();
        let html = handle_avatar_post("id=hugo");
        assert!(html.contains("Hi Hugo!"));
        assert!(html.contains(r#"aria-label="Choose Hugo" aria-pressed="true""#));
        assert!(html.contains("localStorage.setItem"));
        assert!(html.contains("funland-storage"));
        with_session(|s| assert_eq!(s.prefs.avatar(), Avatar::Hugo));
        reset_session();
    }

    #[test]
    fn unknown_avatar_is_rejected() {
        reset_session();
        assert!(handle_avatar_post("id=godzilla").contains("Unknown avatar"));
        assert!(handle_avatar_post("").contains("Unknown avatar"));
        with_session(|s| assert_eq!(s.prefs.avatar(), Avatar::Dino));
        reset_session();
    }

    #[test]
    fn music_toggle_drives_player() {
        reset_session();
        let html = handle_music_post("");
        assert!(html.contains("funlandAudio.music(false)"));
        assert!(html.contains("opacity-50"));
        let html = handle_music_post("");
        assert!(html.contains("funlandAudio.music(true)"));
        reset_session();
    }

    #[test]
    fn sfx_off_silences_cues() {
        reset_session();
        let html = handle_sfx_post("");
        assert!(!html.contains("funlandAudio.tone"));
        assert!(html.contains("&#x1F507;"));
        let html = handle_sfx_post("");
        assert!(html.contains("funlandAudio.tone"));
        reset_session();
    }

    #[test]
    fn difficulty_is_validated() {
        reset_session();
        assert!(handle_difficulty_post("level=insane").contains("Unknown difficulty"));
        let html = handle_difficulty_post("level=hard");
        assert!(html.contains(r#"aria-pressed="true" class="rounded-full px-5 py-2 font-bold border-b-4 capitalize bg-purple-500"#));
        with_session(|s| assert_eq!(s.prefs.settings().difficulty, Difficulty::Hard));
        reset_session();
    }

    #[test]
    fn badge_twice_is_badge_once() {
        reset_session();
        let first = handle_badge_post("badge=counting-star");
        assert!(first.contains(r#"data-badge="counting-star" data-earned="true""#));
        assert!(first.contains("localStorage.setItem"));
        let second = handle_badge_post("badge=counting-star");
        assert!(!second.contains("<script>"));
        with_session(|s| assert_eq!(s.prefs.state().badges.len(), 1));
        reset_session();
    }

    #[test]
    fn custom_badges_are_escaped_on_shelf() {
        reset_session();
        handle_badge_post("badge=%3Cb%3E");
        let html = handle_badges_get("");
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
        assert!(handle_badge_post("badge=").contains("Missing badge"));
        reset_session();
    }

    #[test]
    fn state_round_trips_through_restore() {
        reset_session();
        handle_avatar_post("id=pip");
        handle_badge_post("badge=kind-feeder");
        let blob = handle_state_get("");
        reset_session();
        with_session(|s| assert_eq!(s.prefs.avatar(), Avatar::Dino));

        assert_eq!(handle_restore_post(&format!("state={}", blob)), "ok");
        with_session(|s| {
            assert_eq!(s.prefs.avatar(), Avatar::Pip);
            assert!(s.prefs.state().badges.contains("kind-feeder"));
        });

        reset_session();
        assert_eq!(handle_restore_post(&blob), "ok");
        with_session(|s| assert_eq!(s.prefs.avatar(), Avatar::Pip));
        reset_session();
    }

    #[test]
    fn corrupt_restore_falls_back_to_defaults() {
        reset_session();
        handle_avatar_post("id=mimi");
        let answer = handle_restore_post("state=%%%not-base64");
        assert!(answer.starts_with("error:"));
        with_session(|s| {
            assert_eq!(s.prefs.avatar(), Avatar::Dino);
            assert_eq!(s.prefs.settings(), &Settings::default());
        });
        reset_session();
    }
}
