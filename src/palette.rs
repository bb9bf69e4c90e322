// Instrument color palette
// Fixed ordered palette, cycled by instrument index

/// The fixed display palette.
///
/// Assignment is `PALETTE[index % PALETTE.len()]`: each instrument's color
/// depends only on its own index, so adding or reordering other instruments
/// never changes it, and two runs over the same input always agree.
pub const PALETTE: [&str; 10] = [
    "#FF6B6B", "#6BCB77", "#4D96FF", "#FFD93D", "#C34A36",
    "#9D4EDD", "#38B6FF", "#FF924C", "#00A878", "#FF4D6D",
];

/// Color for an instrument index
pub fn color_for(instrument: usize) -> &'static str {
    PALETTE[instrument % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        for (i, a) in PALETTE.iter().enumerate() {
            for b in &PALETTE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_color_wraps_around() {
        assert_eq!(color_for(0), PALETTE[0]);
        assert_eq!(color_for(9), PALETTE[9]);
        assert_eq!(color_for(10), PALETTE[0]);
        assert_eq!(color_for(23), PALETTE[3]);
    }

    #[test]
    fn test_color_depends_only_on_own_index() {
        let first = color_for(4);
        // Same index, any run, same color
        assert_eq!(first, color_for(4));
    }
}
