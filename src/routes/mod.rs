//! Route handlers. Each takes the query string or the form body and returns
//! an HTML fragment for HTMX to swap, with any audio/speech/storage effects
//! appended as a single `<script>`.

pub mod count;
pub mod feed;
pub mod home;
pub mod jump;
pub mod layout;
pub mod prefs;
pub mod util;
