mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_strip_composer::{
        FlashTrigger, SensorMapping, SensorOutcome, SensorRouter, StripList, TriggerQueue,
    };

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    const MAPPINGS: [SensorMapping<'static>; 4] = [
        SensorMapping {
            sensor: 1,
            strips: &[0, 1],
            enabled: true,
        },
        SensorMapping {
            sensor: 2,
            strips: &[4],
            enabled: false,
        },
        SensorMapping {
            sensor: 3,
            strips: &[5, 6],
            enabled: true,
        },
        // Too many strips for one sensor
        SensorMapping {
            sensor: 4,
            strips: &[7, 8, 9, 10, 11],
            enabled: true,
        },
    ];

    #[test]
    fn test_sensor_posts_trigger() {
        let queue: TriggerQueue<4> = TriggerQueue::new();
        let mut router = SensorRouter::new(queue.sender(), &MAPPINGS);

        assert_eq!(router.handle(1, at(0)), SensorOutcome::Triggered);
        assert_eq!(
            queue.receiver().try_receive(),
            Some(FlashTrigger::Strips(StripList::from_slice(&[0, 1]).unwrap()))
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_debounce_per_sensor() {
        let queue: TriggerQueue<4> = TriggerQueue::new();
        let mut router = SensorRouter::new(queue.sender(), &MAPPINGS);

        assert_eq!(router.handle(1, at(0)), SensorOutcome::Triggered);
        assert_eq!(
            router.handle(1, at(1000)),
            SensorOutcome::Debounced {
                remaining: Duration::from_millis(14_000)
            }
        );
        // Other sensors are not affected
        assert_eq!(router.handle(3, at(1000)), SensorOutcome::Triggered);
        assert_eq!(router.handle(1, at(15_000)), SensorOutcome::Triggered);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_custom_debounce() {
        let queue: TriggerQueue<4> = TriggerQueue::new();
        let mut router =
            SensorRouter::new(queue.sender(), &MAPPINGS).with_debounce(Duration::from_millis(100));

        assert_eq!(router.handle(1, at(0)), SensorOutcome::Triggered);
        assert_eq!(router.handle(1, at(100)), SensorOutcome::Triggered);
    }

    #[test]
    fn test_unknown_and_disabled_sensors() {
        let queue: TriggerQueue<4> = TriggerQueue::new();
        let mut router = SensorRouter::new(queue.sender(), &MAPPINGS);

        assert_eq!(router.handle(2, at(0)), SensorOutcome::Unknown);
        assert_eq!(router.handle(4, at(0)), SensorOutcome::Unknown);
        assert_eq!(router.handle(99, at(0)), SensorOutcome::Unknown);
        assert!(router.targets(4).is_none());

        assert!(router.set_enabled(2, true));
        assert_eq!(router.handle(2, at(0)), SensorOutcome::Triggered);
        assert!(!router.set_enabled(99, true));
    }

    #[test]
    fn test_full_queue_does_not_start_debounce() {
        let queue: TriggerQueue<1> = TriggerQueue::new();
        let mut router = SensorRouter::new(queue.sender(), &MAPPINGS);

        assert_eq!(router.handle(1, at(0)), SensorOutcome::Triggered);
        assert_eq!(router.handle(3, at(0)), SensorOutcome::QueueFull);

        queue.receiver().drain().for_each(drop);
        assert_eq!(router.handle(3, at(10)), SensorOutcome::Triggered);
    }
}
