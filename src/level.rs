use ratatui::style::Color;
use serde::Serialize;

/// Intensity bucket for a day's contribution count
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(into = "u8")]
pub(crate) enum Level {
    #[default]
    Idle,
    Low,
    Medium,
    High,
    Peak,
}

impl Level {
    pub(crate) const ALL: [Level; 5] = [
        Level::Idle,
        Level::Low,
        Level::Medium,
        Level::High,
        Level::Peak,
    ];

    pub(crate) fn for_count(count: u32) -> Level {
        match count {
            0 => Level::Idle,
            1..=3 => Level::Low,
            4..=6 => Level::Medium,
            7..=9 => Level::High,
            _ => Level::Peak,
        }
    }

    pub(crate) fn index(self) -> u8 {
        match self {
            Level::Idle => 0,
            Level::Low => 1,
            Level::Medium => 2,
            Level::High => 3,
            Level::Peak => 4,
        }
    }

    pub(crate) fn color(self) -> Color {
        match self {
            Level::Idle => Color::Rgb(0xff, 0xff, 0xff),
            Level::Low => Color::Rgb(0xc8, 0xd5, 0xb9),
            Level::Medium => Color::Rgb(0xa3, 0xb8, 0x8c),
            Level::High => Color::Rgb(0x8d, 0x6e, 0x63),
            Level::Peak => Color::Rgb(0x5d, 0x40, 0x37),
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_thresholds() {
        let expected = [
            (0, Level::Idle),
            (1, Level::Low),
            (3, Level::Low),
            (4, Level::Medium),
            (6, Level::Medium),
            (7, Level::High),
            (9, Level::High),
            (10, Level::Peak),
            (u32::MAX, Level::Peak),
        ];
        for (count, level) in expected {
            assert_eq!(Level::for_count(count), level, "count = {count}");
        }
    }

    #[test]
    fn test_colors() {
        assert_eq!(Level::Idle.color(), Color::Rgb(0xff, 0xff, 0xff));
        assert_eq!(Level::Low.color(), Color::Rgb(0xc8, 0xd5, 0xb9));
        assert_eq!(Level::Medium.color(), Color::Rgb(0xa3, 0xb8, 0x8c));
        assert_eq!(Level::High.color(), Color::Rgb(0x8d, 0x6e, 0x63));
        assert_eq!(Level::Peak.color(), Color::Rgb(0x5d, 0x40, 0x37));
    }

    #[test]
    fn test_index_matches_order() {
        for (i, level) in std::iter::zip(0u8.., Level::ALL) {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn test_serialize_as_integer() {
        assert_eq!(serde_json::to_string(&Level::High).ok().as_deref(), Some("3"));
    }

    proptest! {
        #[test]
        fn level_is_monotonic(a in any::<u32>(), b in any::<u32>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Level::for_count(lo) <= Level::for_count(hi));
            prop_assert!(Level::for_count(a).index() <= 4);
        }
    }
}
