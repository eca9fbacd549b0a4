//! Shared markup: the screen shell, dice faces, avatar bubbles and the
//! delayed trigger that carries a deferred step back to the worker.

use crate::game::prefs::{Avatar, Settings};
use crate::game::timeline::Deferred;
use crate::routes::util::escape_html;

/// Wrap a screen body in the header/back/toggles shell.
///
/// `title` is omitted on the home screen, which also hides the back button.
pub fn page(title: Option<&str>, settings: &Settings, main_class: &str, body: &str) -> String {
    let mut h = String::with_capacity(body.len() + 2048);
    h.push_str(r#"<div class="min-h-screen flex flex-col relative overflow-hidden">"#);
    h.push_str(r#"<header class="p-4 flex items-center justify-between z-50">"#);
    h.push_str(r#"<div class="flex items-center gap-4">"#);
    if let Some(title) = title {
        h.push_str(
            r##"<button hx-get="/?from=back" hx-target="#app" hx-swap="innerHTML" hx-push-url="/" aria-label="Back to menu" class="rounded-full w-12 h-12 border-4 border-white bg-orange-400 hover:bg-orange-500 text-white text-2xl font-bold shadow-button active:translate-y-1 active:shadow-none">&#x2190;</button>"##,
        );
        h.push_str(&format!(
            r#"<h1 class="text-3xl md:text-4xl font-black text-white drop-shadow tracking-wide uppercase">{}</h1>"#,
            escape_html(title)
        ));
    }
    h.push_str(r#"</div>"#);
    h.push_str(r#"<div id="audio-toggles" class="flex items-center gap-2">"#);
    h.push_str(&audio_toggles(settings));
    h.push_str(r#"</div>"#);
    h.push_str(r#"</header>"#);

    h.push_str(&format!(
        r#"<main class="flex-1 p-4 md:p-6 flex flex-col max-w-5xl mx-auto w-full {}">"#,
        main_class
    ));
    h.push_str(body);
    h.push_str(r#"</main>"#);
    h.push_str(r#"</div>"#);
    h
}

/// Music and sound-effect switches (swapped on their own when toggled).
pub fn audio_toggles(settings: &Settings) -> String {
    let (music_icon, music_class) = if settings.music {
        ("&#x1F3B5;", "")
    } else {
        ("&#x1F3B5;", " opacity-50 line-through")
    };
    let sfx_icon = if settings.sfx { "&#x1F50A;" } else { "&#x1F507;" };
    format!(
        r##"<button hx-post="/api/prefs/music" hx-target="#audio-toggles" hx-swap="innerHTML" aria-label="Toggle music" aria-pressed="{}" class="rounded-full w-12 h-12 text-2xl hover:bg-white/20{}">{}</button><button hx-post="/api/prefs/sfx" hx-target="#audio-toggles" hx-swap="innerHTML" aria-label="Toggle sound effects" aria-pressed="{}" class="rounded-full w-12 h-12 text-2xl hover:bg-white/20">{}</button>"##,
        settings.music, music_class, music_icon, settings.sfx, sfx_icon
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Sm,
    Md,
    Lg,
    Xl,
}

impl Size {
    fn avatar_classes(self) -> &'static str {
        match self {
            Size::Sm => "w-10 h-10 text-2xl border-2",
            Size::Md => "w-16 h-16 text-4xl border-4",
            Size::Lg => "w-24 h-24 text-6xl border-4",
            Size::Xl => "w-32 h-32 text-7xl border-8",
        }
    }

    fn dice_classes(self) -> (&'static str, &'static str) {
        match self {
            Size::Sm => ("w-16 h-16 p-2 rounded-xl", "w-3 h-3"),
            Size::Md => ("w-24 h-24 p-3 rounded-2xl", "w-4 h-4"),
            Size::Lg | Size::Xl => ("w-32 h-32 p-4 rounded-3xl", "w-6 h-6"),
        }
    }
}

/// Round character bubble.
pub fn avatar_bubble(avatar: Avatar, size: Size, extra_class: &str) -> String {
    format!(
        r#"<div class="rounded-full flex items-center justify-center shadow-sm select-none bg-white {} {} {}" data-testid="avatar-{}"><span role="img" aria-label="{}">{}</span></div>"#,
        avatar.color_classes(),
        size.avatar_classes(),
        extra_class,
        avatar.id(),
        avatar.name(),
        avatar.emoji()
    )
}

/// Which cells of a 3×3 grid carry a pip for each face.
fn pip_cells(value: u8) -> &'static [usize] {
    match value {
        1 => &[4],
        2 => &[0, 8],
        3 => &[0, 4, 8],
        4 => &[0, 2, 6, 8],
        5 => &[0, 2, 4, 6, 8],
        _ => &[0, 2, 3, 5, 6, 8],
    }
}

/// A clickable die. `roll_url` is posted on click unless the die is busy.
pub fn dice(value: u8, rolling: bool, size: Size, roll_url: Option<&str>) -> String {
    let (box_class, dot_class) = size.dice_classes();
    let value = value.clamp(1, 6);
    let motion = if rolling { " animate-bounce" } else { "" };
    let action = match roll_url {
        Some(url) if !rolling => format!(
            r##" hx-post="{}" hx-target="#game" hx-swap="innerHTML""##,
            url
        ),
        _ => " disabled".to_string(),
    };
    let cells = pip_cells(value);

    let mut h = String::with_capacity(1024);
    h.push_str(&format!(
        r#"<button class="bg-white border-4 border-slate-200 shadow-[0_8px_0_rgba(0,0,0,0.1)] cursor-pointer select-none {}{}" data-testid="dice" aria-label="Dice showing {}"{}>"#,
        box_class, motion, value, action
    ));
    h.push_str(r#"<div class="grid grid-cols-3 grid-rows-3 gap-1 w-full h-full place-items-center">"#);
    for cell in 0..9 {
        if cells.contains(&cell) {
            h.push_str(&format!(
                r#"<span class="pip rounded-full bg-slate-800 shadow-inner {}"></span>"#,
                dot_class
            ));
        } else {
            h.push_str(r#"<span></span>"#);
        }
    }
    h.push_str(r#"</div></button>"#);
    h
}

/// Invisible element that posts `ticket` back once `delay_ms` has elapsed.
/// Removing it from the DOM (navigation) means it never fires.
pub fn deferred_trigger(resume_url: &str, deferred: Deferred) -> String {
    format!(
        r##"<div class="hidden" hx-post="{}" hx-vals='{{"ticket":"{}"}}' hx-trigger="load delay:{}ms" hx-target="#game" hx-swap="innerHTML"></div>"##,
        resume_url,
        deferred.ticket.raw(),
        deferred.delay_ms
    )
}

/// Inline error for malformed requests.
pub fn error_fragment(message: &str) -> String {
    format!(
        r#"<span class="text-red-600 font-bold">{}</span>"#,
        escape_html(message)
    )
}

/// Returned when an action arrives for a screen that is no longer mounted.
pub fn screen_closed() -> String {
    r##"<div class="text-center text-slate-500 font-bold">This game is closed. <a href="/" hx-get="/" hx-target="#app" hx-push-url="true" class="underline">Back to the menu</a></div>"##.to_string()
}
