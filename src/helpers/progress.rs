use console::{style, Emoji};
use indicatif::ProgressState;

pub static FISH: Emoji<'_, '_> = Emoji("🎣  ", "");
pub static WATER: Emoji<'_, '_> = Emoji("🌊  ", "");
pub static CLOUD: Emoji<'_, '_> = Emoji("⛅  ", "");
pub static CLAPPER: Emoji<'_, '_> = Emoji("🎬  ", "");
pub static TELEVISION: Emoji<'_, '_> = Emoji("📺  ", "");
pub static REPEAT: Emoji<'_, '_> = Emoji("🔁  ", "");

pub fn elapsed_subsec(state: &ProgressState, writer: &mut dyn std::fmt::Write) {
    let seconds = state.elapsed().as_secs();
    let sub_seconds = (state.elapsed().as_millis() % 1000) / 100;
    let _ = writer.write_str(&format!("{}.{}s", seconds, sub_seconds));
}

/// Numbered progress line on stderr, e.g. `[1/3] 🎣  Retrieving fishing reports...`
pub fn step(current: usize, total: usize, emoji: Emoji<'_, '_>, message: &str) {
    eprintln!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        message
    );
}
