//! SMPTE timecode fields and their string form

use crate::models::timecode::FrameRate;
use std::fmt;

/// Broken-down SMPTE timecode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimecodeFields {
    pub negative: bool,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub frames: i64,
    pub drop_frame: bool,
}

impl TimecodeFields {
    /// Split a frame number into timecode fields at `rate`.
    ///
    /// Drop-frame skips frame numbers 0 and 1 (0-3 at 59.94) at the start of
    /// every minute except each tenth minute. Callers only request drop-frame
    /// for rates that support it.
    pub fn from_frame(frame: i64, rate: FrameRate, drop_frame: bool) -> Self {
        // Widened so the drop-frame adjustment cannot overflow near i64::MAX
        let timebase = i128::from(rate.timebase().max(1));
        let negative = frame < 0;
        let mut frame = i128::from(frame).abs();

        if drop_frame {
            let dropped = (timebase + 14) / 15; // 2 at 30, 4 at 60
            let per_ten_minutes = timebase * 600 - dropped * 9;
            let per_minute = timebase * 60 - dropped;
            let tens = frame / per_ten_minutes;
            let rest = frame % per_ten_minutes;
            frame += dropped * 9 * tens;
            if rest > dropped {
                frame += dropped * ((rest - dropped) / per_minute);
            }
        }

        TimecodeFields {
            negative,
            hours: (frame / (timebase * 3600)) as i64,
            minutes: ((frame / (timebase * 60)) % 60) as i64,
            seconds: ((frame / timebase) % 60) as i64,
            frames: (frame % timebase) as i64,
            drop_frame,
        }
    }
}

impl fmt::Display for TimecodeFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.drop_frame { ';' } else { ':' };
        write!(
            f,
            "{}{:02}:{:02}:{:02}{}{:02}",
            if self.negative { "-" } else { "" },
            self.hours,
            self.minutes,
            self.seconds,
            separator,
            self.frames
        )
    }
}
