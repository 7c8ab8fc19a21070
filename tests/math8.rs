mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_strip_composer::math8::{beatsin8, blend8, elapsed_since, fract, progress8, scale8};

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(255, 128, 128), 191);
        assert_eq!(blend8(0, 128, 255), 128);
        assert_eq!(blend8(255, 0, 128), 127);
        assert_eq!(blend8(255, 128, 0), 255);
    }

    #[test]
    fn test_progress8() {
        assert_eq!(
            progress8(Duration::from_millis(0), Duration::from_millis(100)),
            0
        );
        assert_eq!(
            progress8(Duration::from_millis(50), Duration::from_millis(100)),
            127
        );
        assert_eq!(
            progress8(Duration::from_millis(100), Duration::from_millis(100)),
            255
        );
        assert_eq!(
            progress8(Duration::from_millis(500), Duration::from_millis(100)),
            255
        );
    }

    #[test]
    fn test_progress8_zero_duration_is_complete() {
        assert_eq!(
            progress8(Duration::from_millis(0), Duration::from_millis(0)),
            255
        );
    }

    #[test]
    fn test_elapsed_since_never_negative() {
        let earlier = Instant::from_millis(100);
        let later = Instant::from_millis(250);
        assert_eq!(elapsed_since(later, earlier), Duration::from_millis(150));
        assert_eq!(elapsed_since(earlier, later), Duration::from_millis(0));
    }

    #[test]
    fn test_beatsin8_follows_the_wave() {
        // 60 bpm: one beat per second
        assert_eq!(beatsin8(60.0, 0, 255, Instant::from_millis(0)), 128);
        assert_eq!(beatsin8(60.0, 0, 255, Instant::from_millis(250)), 255);
        assert_eq!(beatsin8(60.0, 0, 255, Instant::from_millis(750)), 0);
        assert_eq!(beatsin8(60.0, 0, 255, Instant::from_millis(1250)), 255);
    }

    #[test]
    fn test_beatsin8_stays_in_range() {
        for ms in (0..5000).step_by(37) {
            let value = beatsin8(12.5, 142, 255, Instant::from_millis(ms));
            assert!((142..=255).contains(&value));
        }
    }

    #[test]
    fn test_fract() {
        assert_eq!(fract(1.25), 0.25);
        assert_eq!(fract(-0.25), 0.75);
        assert_eq!(fract(3.0), 0.0);
    }
}
