use serde::Serialize;

/// One bookable slot on a turf's daily grid, expressed in minutes past
/// midnight (half-open range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start_minute: i32,
    pub end_minute: i32,
}

/// Two half-open minute ranges overlap iff each starts before the other ends.
pub fn ranges_overlap(a_start: i32, a_end: i32, b_start: i32, b_end: i32) -> bool {
    a_start < b_end && b_start < a_end
}

/// Build the one-hour slot grid for a turf open `[open_hour, close_hour)`,
/// dropping every slot that overlaps one of `taken` (non-cancelled bookings
/// for the day, as `(start_minute, end_minute)` pairs).
///
/// Invalid open windows (reversed or out of the 0..=24 range) yield an
/// empty grid rather than an error; the DB check constraint makes them
/// unreachable for persisted turfs.
pub fn available_slots(open_hour: i32, close_hour: i32, taken: &[(i32, i32)]) -> Vec<Slot> {
    if !(0..=24).contains(&open_hour) || !(0..=24).contains(&close_hour) || open_hour >= close_hour
    {
        return Vec::new();
    }

    (open_hour..close_hour)
        .map(|h| Slot {
            start_minute: h * 60,
            end_minute: (h + 1) * 60,
        })
        .filter(|slot| {
            !taken
                .iter()
                .any(|&(s, e)| ranges_overlap(slot.start_minute, slot.end_minute, s, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        assert!(!ranges_overlap(60, 120, 120, 180));
        assert!(!ranges_overlap(120, 180, 60, 120));
    }

    #[test]
    fn containment_and_partial_overlap_detected() {
        assert!(ranges_overlap(60, 180, 90, 120));
        assert!(ranges_overlap(90, 150, 120, 240));
        assert!(ranges_overlap(60, 120, 60, 120));
    }

    #[test]
    fn full_day_grid_when_nothing_taken() {
        let slots = available_slots(6, 23, &[]);
        assert_eq!(slots.len(), 17);
        assert_eq!(slots[0].start_minute, 360);
        assert_eq!(slots.last().unwrap().end_minute, 23 * 60);
    }

    #[test]
    fn booking_spanning_two_hours_removes_both_slots() {
        // 07:30-09:30 booking knocks out the 07, 08 and 09 o'clock slots.
        let slots = available_slots(6, 12, &[(450, 570)]);
        let starts: Vec<i32> = slots.iter().map(|s| s.start_minute / 60).collect();
        assert_eq!(starts, vec![6, 10, 11]);
    }

    #[test]
    fn reversed_window_yields_empty_grid() {
        assert!(available_slots(22, 6, &[]).is_empty());
        assert!(available_slots(-1, 5, &[]).is_empty());
    }
}
