use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Source of the real-world current date and time
pub(crate) trait Clock {
    fn now(&self) -> PrimitiveDateTime;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    // The local offset can only be determined reliably while the process is
    // single-threaded, so this should be called early in `main()`.
    pub(crate) fn new() -> SystemClock {
        let offset = UtcOffset::current_local_offset().unwrap_or_else(|e| {
            log::warn!("failed to determine local UTC offset ({e}); falling back to UTC");
            UtcOffset::UTC
        });
        SystemClock::with_offset(offset)
    }

    pub(crate) fn with_offset(offset: UtcOffset) -> SystemClock {
        SystemClock { offset }
    }

    pub(crate) fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_utc().to_offset(self.offset);
        PrimitiveDateTime::new(now.date(), now.time())
    }
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FixedClock(pub(crate) PrimitiveDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> PrimitiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    fn utc_now() -> PrimitiveDateTime {
        let now = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(now.date(), now.time())
    }

    #[test]
    fn test_system_clock_utc() {
        let clock = SystemClock::with_offset(UtcOffset::UTC);
        let before = utc_now();
        let now = clock.now();
        let after = utc_now();
        assert!(before <= now, "{before:?} > {now:?}");
        assert!(now <= after, "{now:?} > {after:?}");
    }

    #[test]
    fn test_system_clock_offset() {
        let clock = SystemClock::with_offset(offset!(+5));
        assert_eq!(clock.offset(), offset!(+5));
        let before = utc_now() + time::Duration::hours(5);
        let now = clock.now();
        let after = utc_now() + time::Duration::hours(5);
        assert!(before <= now, "{before:?} > {now:?}");
        assert!(now <= after, "{now:?} > {after:?}");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(datetime!(2024-05-15 13:45));
        assert_eq!(clock.now(), datetime!(2024-05-15 13:45));
    }
}
