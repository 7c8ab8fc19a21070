mod tests {
    use embassy_time::Duration;
    use myrtio_strip_composer::{
        Blend,
        color::{BLACK, Rgb, WHITE},
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    #[test]
    fn test_zero_duration_fade_in_is_immediate() {
        let blend = Blend::fade_in(Duration::from_millis(0), Duration::from_millis(0));
        assert_eq!(blend, Blend::Replace);
        assert_eq!(blend.apply(BLACK, RED), RED);
    }

    #[test]
    fn test_fade_in_lerps_from_existing() {
        let blend = Blend::fade_in(Duration::from_millis(50), Duration::from_millis(100));
        assert_eq!(blend, Blend::FadeIn(127));
        assert_eq!(blend.apply(BLACK, WHITE), Rgb::new(127, 127, 127));

        let start = Blend::fade_in(Duration::from_millis(0), Duration::from_millis(100));
        assert_eq!(start.apply(RED, WHITE), RED);
    }

    #[test]
    fn test_fade_out_dims_computed_color() {
        let halfway = Blend::fade_out(Duration::from_millis(50), Duration::from_millis(100));
        assert_eq!(halfway, Blend::FadeOut(127));
        // Existing buffer content does not matter when fading out
        assert_eq!(halfway.apply(WHITE, RED), Rgb::new(128, 0, 0));

        let done = Blend::fade_out(Duration::from_millis(100), Duration::from_millis(100));
        assert_eq!(done.apply(WHITE, RED), BLACK);
    }
}
