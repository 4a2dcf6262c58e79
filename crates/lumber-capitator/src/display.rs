//! Status-line text shown to the player while a countdown runs.
//!
//! Lines use the host's `§` formatting codes. Everything here is derived from
//! the remaining time and the phase read from the block at render time.

use lumber_blocks::Phase;

use crate::keys::TimerSlot;

pub const UNSNEAK_WARNING: &str = "§6⚠ Not sneaking! The timer keeps running, sneak to keep chopping!";
pub const CONVERSION_TIMED_OUT: &str = "§c❌ Too slow! Reverted to the original tree";
pub const PROGRESS_TIMED_OUT: &str = "§c⚠ Too slow! Reverted to the original tree";
pub const CASCADE_FINISHED: &str = "§c❌ Reverted to the original tree!";
pub const PREVIOUS_TREE_REVERTED: &str = "§c⚠ Previous tree reverted!";

pub fn phase_dropped(to: Phase) -> String {
    format!("§6⚠ Dropped back to phase {}!", to)
}

pub fn cascade_dropped(to: Phase) -> String {
    format!("§c❌ Dropped again to phase {}!", to)
}

const CELLS: u8 = Phase::TERMINAL.get();

fn bar(color: &str, phase: Phase) -> String {
    let filled = phase.get().min(CELLS) as usize;
    format!(
        "{}{}§7{}",
        color,
        "█".repeat(filled),
        "░".repeat(CELLS as usize - filled)
    )
}

/// `[bar] [mode] [⏱ Ns]`, the mode label only for conversion and regression.
pub fn compose_display(mode: TimerSlot, remaining: u32, phase: Phase) -> String {
    let urgent = remaining <= 3;
    let (bar, label, count_color) = match mode {
        TimerSlot::Conversion => (
            "§a█§7░░░░".to_string(),
            Some("§eCONVERTING§r"),
            if urgent { "§c" } else { "§e" },
        ),
        TimerSlot::Progress => (bar("§a", phase), None, if urgent { "§c" } else { "§e" }),
        TimerSlot::Regression => (
            bar("§c", phase),
            Some("§6ROLLBACK§r"),
            if urgent { "§4" } else { "§6" },
        ),
    };
    let count = format!("{}⏱ {}s§r", count_color, remaining);
    match label {
        Some(label) => format!("{} {} {}", bar, label, count),
        None => format!("{} {}", bar, count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_tracks_phase() {
        assert_eq!(
            compose_display(TimerSlot::Progress, 10, Phase::new(2)),
            "§a██§7░░ §e⏱ 10s§r"
        );
        assert_eq!(
            compose_display(TimerSlot::Progress, 3, Phase::new(4)),
            "§a████§7 §c⏱ 3s§r"
        );
    }

    #[test]
    fn conversion_bar_is_fixed() {
        let a = compose_display(TimerSlot::Conversion, 9, Phase::ZERO);
        let b = compose_display(TimerSlot::Conversion, 9, Phase::new(3));
        assert_eq!(a, b);
        assert_eq!(a, "§a█§7░░░░ §eCONVERTING§r §e⏱ 9s§r");
    }

    #[test]
    fn regression_uses_red_bar_and_label() {
        assert_eq!(
            compose_display(TimerSlot::Regression, 2, Phase::new(1)),
            "§c█§7░░░ §6ROLLBACK§r §4⏱ 2s§r"
        );
    }
}
