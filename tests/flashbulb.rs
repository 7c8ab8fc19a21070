mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_strip_composer::{
        Composer, ComposerConfig, ConfigError, FlashBulbId, FlashBulbState, FlashBulbTimings,
        FlashTrigger, PatternSpec, StripConfig, StripList, StripSet, TopologyConfig,
        TriggerQueue,
        color::{BLACK, Palette, Rgb, WHITE, blend_colors},
        pattern::{PatternKind, RainbowPattern, SolidPattern},
        speed::Speed,
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    const STRIPS: [StripConfig; 2] = [
        StripConfig {
            output: 0,
            offset: 0,
            len: 4,
            reversed: false,
        },
        StripConfig {
            output: 0,
            offset: 4,
            len: 4,
            reversed: false,
        },
    ];

    const TOPOLOGY: TopologyConfig<'static> = TopologyConfig {
        outputs: &[8],
        strips: &STRIPS,
    };

    // Trigger at 10 ms: flash until 110, fade until 5110, back until 7110
    const TRIGGER: u64 = 10;
    const FADE_START: u64 = TRIGGER + 100;
    const BACK_START: u64 = FADE_START + 5000;
    const DONE: u64 = BACK_START + 2000;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn targets(strips: &[u8]) -> StripList {
        StripList::from_slice(strips).unwrap()
    }

    fn solid(color: Rgb, strips: &[u8]) -> PatternSpec {
        PatternSpec::new(PatternKind::Solid(SolidPattern), targets(strips))
            .with_palette(Palette::from_colors(&[color]).unwrap())
    }

    fn composer() -> Composer<'static, 8, 4> {
        let mut composer = Composer::new(&ComposerConfig::new(TOPOLOGY));
        composer.add_pattern(solid(RED, &[0])).unwrap();
        composer.add_pattern(solid(BLUE, &[1])).unwrap();
        composer.tick(at(0));
        composer
    }

    fn strip(composer: &Composer<'_, 8, 4>, id: u8) -> [Rgb; 4] {
        core::array::from_fn(|index| composer.led(id, index).unwrap())
    }

    #[test]
    fn test_timings_state_machine() {
        let timings = FlashBulbTimings::default();
        let state = |ms| timings.state_at(Duration::from_millis(ms));

        assert_eq!(state(0), FlashBulbState::Flash);
        assert_eq!(state(99), FlashBulbState::Flash);
        assert_eq!(state(100), FlashBulbState::FadeToBlack(0));
        assert_eq!(state(2600), FlashBulbState::FadeToBlack(127));
        assert_eq!(state(5100), FlashBulbState::TransitionBack(0));
        assert_eq!(state(7100), FlashBulbState::Inactive);
        assert!(state(50).claims());
        assert!(state(3000).claims());
        assert!(!state(6000).claims());
    }

    #[test]
    fn test_flash_forces_white() {
        let mut composer = composer();
        let id = composer.trigger_strips(&targets(&[0]), at(TRIGGER)).unwrap();
        composer.tick(at(TRIGGER));

        assert_eq!(strip(&composer, 0), [WHITE; 4]);
        assert_eq!(strip(&composer, 1), [BLUE; 4]);
        assert_eq!(composer.overlay().state(id), Some(FlashBulbState::Flash));
    }

    #[test]
    fn test_fade_to_black_midpoint_is_gray() {
        let mut composer = composer();
        composer.trigger_strips(&targets(&[0]), at(TRIGGER));
        composer.tick(at(TRIGGER));
        composer.tick(at(FADE_START + 2500));

        for led in strip(&composer, 0) {
            assert!((126..=130).contains(&led.r), "{led:?}");
            assert_eq!(led.r, led.g);
            assert_eq!(led.g, led.b);
        }
    }

    #[test]
    fn test_fade_to_black_strictly_decreases() {
        let mut composer = composer();
        composer.trigger_strips(&targets(&[0, 1]), at(TRIGGER));
        composer.tick(at(TRIGGER));

        let mut previous = 256;
        for ms in (FADE_START..BACK_START).step_by(100) {
            composer.tick(at(ms));
            let level = u16::from(composer.led(1, 2).unwrap().r);
            assert!(level < previous, "{level} at {ms} ms");
            previous = level;
        }
        composer.tick(at(BACK_START));
        assert_eq!(strip(&composer, 1), [BLACK; 4]);
    }

    #[test]
    fn test_claimed_strip_ignores_patterns() {
        let mut composer = composer();
        composer.trigger_strips(&targets(&[0]), at(TRIGGER));
        composer.tick(at(TRIGGER));

        assert_eq!(
            composer.overlay().claimed(at(TRIGGER + 1000)),
            StripSet::EMPTY.with(0)
        );
        assert_eq!(composer.overlay().claimed(at(BACK_START)), StripSet::EMPTY);

        composer.tick(at(FADE_START + 4999));
        let led = composer.led(0, 0).unwrap();
        assert_eq!(led.r, led.b);
    }

    #[test]
    fn test_transition_back_blends_toward_live_pattern() {
        let mut composer = composer();
        composer.trigger_strips(&targets(&[0]), at(TRIGGER));
        composer.tick(at(TRIGGER));

        composer.tick(at(BACK_START + 1000));
        assert_eq!(strip(&composer, 0), [Rgb { r: 127, g: 0, b: 0 }; 4]);

        composer.tick(at(DONE));
        assert_eq!(strip(&composer, 0), [RED; 4]);
        assert!(!composer.overlay().is_active());
    }

    #[test]
    fn test_transition_back_uses_snapshot_between_pattern_updates() {
        let mut composer: Composer<'_, 8, 4> = Composer::new(&ComposerConfig::new(TOPOLOGY));
        // Speed 1 recomputes every 20 ms
        composer
            .add_pattern(solid(RED, &[0]).with_speed(Speed::SLOWEST))
            .unwrap();
        composer.tick(at(0));
        composer.trigger_strips(&targets(&[0]), at(TRIGGER));
        composer.tick(at(TRIGGER));

        composer.tick(at(BACK_START + 1000));
        composer.tick(at(BACK_START + 1005));

        // Blends from the saved pattern colors, not from last frame's output
        assert_eq!(strip(&composer, 0), [Rgb { r: 128, g: 0, b: 0 }; 4]);
    }

    #[test]
    fn test_retrigger_restarts_event() {
        let mut composer = composer();
        let first = composer.trigger_strips(&targets(&[0]), at(TRIGGER)).unwrap();
        composer.tick(at(TRIGGER));
        composer.tick(at(3000));
        assert!(matches!(
            composer.overlay().state(first),
            Some(FlashBulbState::FadeToBlack(_))
        ));

        let second = composer.trigger_strips(&targets(&[0]), at(3000)).unwrap();
        composer.tick(at(3000));
        assert_eq!(first, second);
        assert_eq!(composer.overlay().state(first), Some(FlashBulbState::Flash));
        assert_eq!(strip(&composer, 0), [WHITE; 4]);
        assert_eq!(composer.overlay().len(), 1);
    }

    #[test]
    fn test_retrigger_restores_pattern_colors_not_flash_output() {
        let mut composer: Composer<'_, 8, 4> = Composer::new(&ComposerConfig::new(TOPOLOGY));
        composer.add_pattern(solid(RED, &[0])).unwrap();
        composer.tick(at(0));

        composer.trigger_strips(&targets(&[1]), at(TRIGGER));
        for ms in (TRIGGER..1000).step_by(10) {
            composer.tick(at(ms));
        }
        let gray = composer.led(1, 0).unwrap();
        assert!(gray.r > 0 && gray.r < 255, "{gray:?}");

        composer.trigger_strips(&targets(&[1]), at(1000));
        let done = 1000 + (DONE - TRIGGER);
        for ms in (1000..=done).step_by(10) {
            composer.tick(at(ms));
        }

        // Nothing renders on strip 1, so it ends dark
        assert!(!composer.overlay().is_active());
        assert_eq!(strip(&composer, 1), [BLACK; 4]);
        assert_eq!(strip(&composer, 0), [RED; 4]);
    }

    #[test]
    fn test_overlapping_events_later_registration_wins() {
        let mut composer = composer();
        let first = composer.trigger_strips(&targets(&[0]), at(TRIGGER)).unwrap();
        composer.tick(at(TRIGGER));
        composer.tick(at(900));

        let second = composer.trigger_strips(&targets(&[0, 1]), at(1000)).unwrap();
        assert_ne!(first, second);
        composer.tick(at(1000));
        assert_eq!(strip(&composer, 0), [WHITE; 4]);
        assert_eq!(strip(&composer, 1), [WHITE; 4]);

        // Both fading: the newer, brighter event is what shows
        composer.tick(at(3000));
        assert!(matches!(
            composer.overlay().state(first),
            Some(FlashBulbState::FadeToBlack(_))
        ));
        assert_eq!(strip(&composer, 0), strip(&composer, 1));

        // The first event hands back while the second still holds the strip
        composer.tick(at(BACK_START + 500));
        assert!(matches!(
            composer.overlay().state(first),
            Some(FlashBulbState::TransitionBack(_))
        ));
        assert_eq!(strip(&composer, 0), strip(&composer, 1));

        // Both blend back toward the pattern colors, never toward the gray
        composer.tick(at(DONE + 500));
        let Some(FlashBulbState::TransitionBack(progress)) = composer.overlay().state(second)
        else {
            panic!("second event should be transitioning back");
        };
        assert_eq!(
            strip(&composer, 0),
            [blend_colors(BLACK, RED, progress); 4]
        );
        assert_eq!(
            strip(&composer, 1),
            [blend_colors(BLACK, BLUE, progress); 4]
        );

        composer.tick(at(1000 + DONE));
        assert!(!composer.overlay().is_active());
        assert_eq!(strip(&composer, 0), [RED; 4]);
        assert_eq!(strip(&composer, 1), [BLUE; 4]);
    }

    #[test]
    fn test_transition_back_follows_moving_pattern() {
        let mut composer: Composer<'_, 8, 4> = Composer::new(&ComposerConfig::new(TOPOLOGY));
        composer
            .add_pattern(PatternSpec::new(
                PatternKind::Rainbow(RainbowPattern),
                targets(&[0, 1]),
            ))
            .unwrap();
        composer.tick(at(0));
        let id = composer.trigger_strips(&targets(&[0]), at(TRIGGER)).unwrap();
        composer.tick(at(TRIGGER));

        let mut previous = strip(&composer, 1);
        for ms in [BACK_START + 500, BACK_START + 1000, BACK_START + 1500] {
            composer.tick(at(ms));
            let Some(FlashBulbState::TransitionBack(progress)) = composer.overlay().state(id)
            else {
                panic!("event should be transitioning back at {ms} ms");
            };
            // Strip 1 shows this frame's rainbow, strip 0 blends toward it
            let live = strip(&composer, 1);
            assert_ne!(live, previous);
            assert_ne!(live[0], live[3]);
            let expected = live.map(|color| blend_colors(BLACK, color, progress));
            assert_eq!(strip(&composer, 0), expected, "at {ms} ms");
            previous = live;
        }
    }

    #[test]
    fn test_invalid_triggers_are_ignored() {
        let mut composer = composer();
        assert_eq!(composer.trigger_strips(&StripList::new(), at(TRIGGER)), None);
        assert_eq!(composer.trigger_strips(&targets(&[5]), at(TRIGGER)), None);
        composer.tick(at(TRIGGER));

        assert_eq!(strip(&composer, 0), [RED; 4]);
        assert!(composer.overlay().is_empty());
    }

    #[test]
    fn test_registered_flashbulb() {
        let mut composer = composer();
        let id = composer.add_flashbulb(targets(&[1])).unwrap();
        composer.trigger_flashbulb(id, at(TRIGGER)).unwrap();
        composer.tick(at(TRIGGER));
        assert_eq!(strip(&composer, 1), [WHITE; 4]);

        assert_eq!(
            composer.trigger_flashbulb(FlashBulbId::from_index(4), at(TRIGGER)),
            Err(ConfigError::UnknownFlashBulb { id: 4 })
        );
        assert_eq!(
            composer.add_flashbulb(StripList::new()),
            Err(ConfigError::NoTargets)
        );
    }

    #[test]
    fn test_slots_are_recycled_oldest_first() {
        const SIX: [StripConfig; 6] = {
            let mut strips = [StripConfig {
                output: 0,
                offset: 0,
                len: 2,
                reversed: false,
            }; 6];
            let mut id = 0;
            while id < 6 {
                strips[id].offset = id as u16 * 2;
                id += 1;
            }
            strips
        };
        let config = ComposerConfig::new(TopologyConfig {
            outputs: &[12],
            strips: &SIX,
        });
        let mut composer: Composer<'_, 12, 4> = Composer::new(&config);

        for strip in 0..5u8 {
            let id = composer
                .trigger_strips(&targets(&[strip]), at(u64::from(strip)))
                .unwrap();
            assert_eq!(id.index(), usize::from(strip));
        }
        composer.tick(at(5));
        assert_eq!(composer.led(0, 0), Some(WHITE));

        let recycled = composer.trigger_strips(&targets(&[5]), at(10)).unwrap();
        assert_eq!(recycled.index(), 0);

        composer.tick(at(10));
        assert_eq!(composer.led(5, 0), Some(WHITE));
        // The strip the recycled event let go of gets its pattern colors back
        assert_eq!(composer.led(0, 0), Some(BLACK));
        assert!(
            composer
                .overlay()
                .event(recycled)
                .unwrap()
                .targets()
                .contains(5)
        );
    }

    #[test]
    fn test_queued_triggers_are_drained_each_frame() {
        let queue: TriggerQueue<4> = TriggerQueue::new();
        let config = ComposerConfig::new(TOPOLOGY);
        let mut composer: Composer<'_, 8, 4> = Composer::with_triggers(&config, queue.receiver());
        composer.add_pattern(solid(RED, &[0])).unwrap();
        composer.tick(at(0));

        queue
            .sender()
            .try_send(FlashTrigger::Strips(targets(&[0])))
            .unwrap();
        composer.tick(at(TRIGGER));

        assert!(queue.is_empty());
        assert_eq!(composer.led(0, 0), Some(WHITE));
    }
}
