//! Exact rational time model
//!
//! All frame computation goes through `num_rational` fractions. Floating point
//! is never used: rounding a 29.97 rate silently shifts a marker by a frame.

use crate::errors::{FcpxError, Result};
use crate::models::smpte::TimecodeFields;
use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exact fraction used for every time computation
pub type Rational = Ratio<i64>;

// ============================================================================
// FRAME RATES
// ============================================================================

/// Frames per second as an exact (numerator, denominator) pair.
///
/// The pair is kept unreduced (`2400/100` stays `2400/100`) so it reads back
/// the way FCPX wrote it; equality compares values, not raw pairs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameRate {
    numerator: i64,
    denominator: i64,
}

impl FrameRate {
    /// 60 fps, the rate FCPX assumes for rate-undefined formats
    pub const DEFAULT: FrameRate = FrameRate::new(6000, 100);

    /// Create a frame rate. Both parts must be positive.
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        assert!(numerator > 0 && denominator > 0, "frame rate parts must be positive");
        FrameRate { numerator, denominator }
    }

    /// Checked constructor for values read from a document
    pub fn try_new(numerator: i64, denominator: i64) -> Option<Self> {
        if numerator > 0 && denominator > 0 {
            Some(FrameRate { numerator, denominator })
        } else {
            None
        }
    }

    /// Build from seconds-per-frame (FCPX `frameDuration`), taking the reciprocal
    /// of the raw pair: `1001/30000` seconds per frame is `30000/1001` fps.
    pub fn from_frame_duration(seconds_per_frame: (i64, i64)) -> Option<Self> {
        let (num, den) = seconds_per_frame;
        FrameRate::try_new(den, num)
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Frames per second as an exact fraction
    pub fn as_ratio(&self) -> Rational {
        Ratio::new(self.numerator, self.denominator)
    }

    /// Integer frame count per timecode second (29.97 counts 30 frames)
    pub fn timebase(&self) -> i64 {
        let numerator = i128::from(self.numerator);
        let denominator = i128::from(self.denominator);
        // Never exceeds the numerator
        ((numerator + denominator / 2) / denominator) as i64
    }

    /// Matching SMPTE nominal rate, if this is one of the standard rates
    pub fn nominal(&self) -> Option<NominalRate> {
        NominalRate::ALL
            .iter()
            .copied()
            .find(|nominal| nominal.frame_rate() == *self)
    }

    /// SMPTE label such as "29.97" or "25"; non-standard rates render as "n/d"
    pub fn smpte_label(&self) -> String {
        match self.nominal() {
            Some(nominal) => nominal.label().to_string(),
            None => format!("{}/{}", self.numerator, self.denominator),
        }
    }

    /// Drop-frame counting only exists for the NTSC 29.97 and 59.94 rates
    pub fn supports_drop_frame(&self) -> bool {
        matches!(self.nominal(), Some(NominalRate::Fps29_97) | Some(NominalRate::Fps59_94))
    }
}

impl PartialEq for FrameRate {
    fn eq(&self, other: &Self) -> bool {
        i128::from(self.numerator) * i128::from(other.denominator)
            == i128::from(other.numerator) * i128::from(self.denominator)
    }
}

impl Eq for FrameRate {}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// The standard rates FCPX projects and conform-rate metadata use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NominalRate {
    Fps23_98,
    Fps24,
    Fps25,
    Fps29_97,
    Fps30,
    Fps50,
    Fps59_94,
    Fps60,
}

impl NominalRate {
    pub const ALL: [NominalRate; 8] = [
        NominalRate::Fps23_98,
        NominalRate::Fps24,
        NominalRate::Fps25,
        NominalRate::Fps29_97,
        NominalRate::Fps30,
        NominalRate::Fps50,
        NominalRate::Fps59_94,
        NominalRate::Fps60,
    ];

    pub fn frame_rate(self) -> FrameRate {
        match self {
            NominalRate::Fps23_98 => FrameRate::new(24000, 1001),
            NominalRate::Fps24 => FrameRate::new(24, 1),
            NominalRate::Fps25 => FrameRate::new(25, 1),
            NominalRate::Fps29_97 => FrameRate::new(30000, 1001),
            NominalRate::Fps30 => FrameRate::new(30, 1),
            NominalRate::Fps50 => FrameRate::new(50, 1),
            NominalRate::Fps59_94 => FrameRate::new(60000, 1001),
            NominalRate::Fps60 => FrameRate::new(60, 1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NominalRate::Fps23_98 => "23.98",
            NominalRate::Fps24 => "24",
            NominalRate::Fps25 => "25",
            NominalRate::Fps29_97 => "29.97",
            NominalRate::Fps30 => "30",
            NominalRate::Fps50 => "50",
            NominalRate::Fps59_94 => "59.94",
            NominalRate::Fps60 => "60",
        }
    }

    /// Parse a label as written in `srcFrameRate` ("23.98", "29.97", "30", ...)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "23.98" | "23.976" => Some(NominalRate::Fps23_98),
            "24" => Some(NominalRate::Fps24),
            "25" => Some(NominalRate::Fps25),
            "29.97" => Some(NominalRate::Fps29_97),
            "30" => Some(NominalRate::Fps30),
            "50" => Some(NominalRate::Fps50),
            "59.94" => Some(NominalRate::Fps59_94),
            "60" => Some(NominalRate::Fps60),
            _ => None,
        }
    }
}

/// Progressive or interlaced scan, taken from a format's field order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanMode {
    Progressive,
    Interlaced,
}

impl ScanMode {
    /// Absent or "progressive" is progressive; any other field order is interlaced
    pub fn from_field_order(field_order: Option<&str>) -> Self {
        match field_order {
            None | Some("progressive") => ScanMode::Progressive,
            Some(_) => ScanMode::Interlaced,
        }
    }

    pub fn is_interlaced(self) -> bool {
        self == ScanMode::Interlaced
    }

    pub fn suffix(self) -> char {
        match self {
            ScanMode::Progressive => 'p',
            ScanMode::Interlaced => 'i',
        }
    }
}

// ============================================================================
// RATIONAL TIME
// ============================================================================

/// How a start/duration/offset is handed to [`TimecodeInfo::new`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpec {
    /// Integer frame count at the governing rate
    Frames(i64),
    /// Seconds as a raw (numerator, denominator) pair
    Pair(i64, i64),
    /// Seconds as an already-built fraction
    Fraction(Rational),
}

impl TimeSpec {
    fn resolve(self, rate: FrameRate) -> Result<RationalTime> {
        match self {
            TimeSpec::Frames(frames) => RationalTime::from_frames(frames, rate),
            TimeSpec::Pair(_, 0) => Err(FcpxError::invalid_time(
                format!("{:?}", self),
                "denominator must be non-zero",
            )),
            TimeSpec::Pair(num, den) => Ok(RationalTime::new(num, den)),
            TimeSpec::Fraction(value) => Ok(RationalTime::from(value)),
        }
    }
}

impl From<RationalTime> for TimeSpec {
    fn from(time: RationalTime) -> Self {
        TimeSpec::Fraction(time.as_ratio())
    }
}

/// A time in seconds, held as an exact fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RationalTime(Rational);

impl RationalTime {
    pub const ZERO: RationalTime = RationalTime(Ratio::new_raw(0, 1));

    /// Panics on a zero denominator; document values go through `TimeSpec`.
    pub fn new(numerator: i64, denominator: i64) -> Self {
        RationalTime(Ratio::new(numerator, denominator))
    }

    /// Frame count at `rate` expressed as seconds: `(frames * den, num)`
    pub fn from_frames(frames: i64, rate: FrameRate) -> Result<Self> {
        frames
            .checked_mul(rate.denominator())
            .map(|numerator| RationalTime::new(numerator, rate.numerator()))
            .ok_or_else(|| {
                FcpxError::invalid_time(
                    format!("{} frames", frames),
                    format!("overflows at {} fps", rate),
                )
            })
    }

    pub fn as_ratio(&self) -> Rational {
        self.0
    }

    pub fn numerator(&self) -> i64 {
        *self.0.numer()
    }

    pub fn denominator(&self) -> i64 {
        *self.0.denom()
    }

    /// Sum, failing instead of wrapping on overflow
    pub fn try_add(self, rhs: RationalTime) -> Result<RationalTime> {
        self.0
            .checked_add(&rhs.0)
            .map(RationalTime)
            .ok_or_else(|| FcpxError::invalid_time(format!("{} + {}", self, rhs), "sum overflows"))
    }

    /// Difference, failing instead of wrapping on overflow
    pub fn try_sub(self, rhs: RationalTime) -> Result<RationalTime> {
        self.0
            .checked_sub(&rhs.0)
            .map(RationalTime)
            .ok_or_else(|| {
                FcpxError::invalid_time(format!("{} - {}", self, rhs), "difference overflows")
            })
    }

    /// Time in frames at `rate`, still exact
    fn scaled(&self, rate: FrameRate) -> Result<Rational> {
        self.0.checked_mul(&rate.as_ratio()).ok_or_else(|| {
            FcpxError::invalid_time(self.to_string(), format!("frame count overflows at {} fps", rate))
        })
    }

    /// Frame count at `rate`, floored. FCPX truncates partial frames, never rounds.
    pub fn as_frame(&self, rate: FrameRate) -> Result<i64> {
        let scaled = self.scaled(rate)?;
        // Denominator is always positive
        Ok(scaled.numer().div_euclid(*scaled.denom()))
    }

    fn fields(&self, rate: FrameRate, non_drop_frame: bool) -> Result<TimecodeFields> {
        let drop_frame = !non_drop_frame && rate.supports_drop_frame();
        Ok(TimecodeFields::from_frame(self.as_frame(rate)?, rate, drop_frame))
    }

    /// SMPTE "HH:MM:SS:FF", or "HH:MM:SS;FF" for drop-frame
    pub fn as_timecode(&self, rate: FrameRate, non_drop_frame: bool) -> Result<String> {
        Ok(self.fields(rate, non_drop_frame)?.to_string())
    }

    /// SMPTE timecode with the sub-frame remainder appended as `+n/d` of a frame
    /// when the time does not land on a frame boundary
    pub fn as_fractional_timecode(&self, rate: FrameRate, non_drop_frame: bool) -> Result<String> {
        let scaled = self.scaled(rate)?;
        let remainder = scaled.numer().rem_euclid(*scaled.denom());
        let timecode = self.as_timecode(rate, non_drop_frame)?;
        if remainder == 0 {
            Ok(timecode)
        } else {
            Ok(format!("{}+{}/{}", timecode, remainder, scaled.denom()))
        }
    }

    /// "MM:SS", or "HH:MM:SS" when the hour field is non-zero
    pub fn as_hr_min_sec(&self, rate: FrameRate, non_drop_frame: bool) -> Result<String> {
        let fields = self.fields(rate, non_drop_frame)?;
        let sign = if fields.negative { "-" } else { "" };
        if fields.hours == 0 {
            Ok(format!("{}{:02}:{:02}", sign, fields.minutes, fields.seconds))
        } else {
            Ok(format!("{}{:02}:{:02}:{:02}", sign, fields.hours, fields.minutes, fields.seconds))
        }
    }
}

impl From<Rational> for RationalTime {
    fn from(value: Rational) -> Self {
        RationalTime(value)
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}s", self.numerator(), self.denominator())
    }
}

/// A rational time paired with its frame count at the governing rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTime {
    pub time: RationalTime,
    pub frame: i64,
}

impl FrameTime {
    fn at_rate(time: RationalTime, rate: FrameRate) -> Result<Self> {
        Ok(FrameTime {
            time,
            frame: time.as_frame(rate)?,
        })
    }
}

// ============================================================================
// TIMECODE INFO
// ============================================================================

/// Timing shared by resources, timelines, clips and markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimecodeInfo {
    pub frame_rate: FrameRate,
    /// Retimed rate used for `start` when a conform-rate is active
    pub conformed_frame_rate: Option<FrameRate>,
    pub start: FrameTime,
    pub duration: FrameTime,
    pub offset: FrameTime,
    pub non_drop_frame: bool,
}

impl TimecodeInfo {
    /// Build timing at `frame_rate`. `start` is counted at the conformed rate
    /// when one is given; duration and offset always use `frame_rate`.
    pub fn new(
        frame_rate: FrameRate,
        start: TimeSpec,
        duration: TimeSpec,
        offset: TimeSpec,
        non_drop_frame: bool,
        conformed_frame_rate: Option<FrameRate>,
    ) -> Result<Self> {
        let start_rate = conformed_frame_rate.unwrap_or(frame_rate);
        Ok(TimecodeInfo {
            frame_rate,
            conformed_frame_rate,
            start: FrameTime::at_rate(start.resolve(start_rate)?, start_rate)?,
            duration: FrameTime::at_rate(duration.resolve(frame_rate)?, frame_rate)?,
            offset: FrameTime::at_rate(offset.resolve(frame_rate)?, frame_rate)?,
            non_drop_frame,
        })
    }

    /// Copy of this timing with `start` rewritten and everything re-counted at
    /// `frame_rate`. The conformed rate does not carry over.
    pub fn rebased(
        &self,
        start: RationalTime,
        frame_rate: FrameRate,
        non_drop_frame: bool,
    ) -> Result<Self> {
        Ok(TimecodeInfo {
            frame_rate,
            conformed_frame_rate: None,
            start: FrameTime::at_rate(start, frame_rate)?,
            duration: FrameTime::at_rate(self.duration.time, frame_rate)?,
            offset: FrameTime::at_rate(self.offset.time, frame_rate)?,
            non_drop_frame,
        })
    }

    /// Conformed rate when present, else the native rate
    pub fn effective_frame_rate(&self) -> FrameRate {
        self.conformed_frame_rate.unwrap_or(self.frame_rate)
    }

    /// Exclusive end of the active interval on the parent timeline
    pub fn end(&self) -> Result<RationalTime> {
        self.offset.time.try_add(self.duration.time)
    }

    pub fn format_label(&self) -> &'static str {
        if self.non_drop_frame {
            "NDF"
        } else {
            "DF"
        }
    }

    /// SMPTE timecode of the stored start frame
    pub fn start_timecode(&self) -> String {
        let rate = self.effective_frame_rate();
        let drop_frame = !self.non_drop_frame && rate.supports_drop_frame();
        TimecodeFields::from_frame(self.start.frame, rate, drop_frame).to_string()
    }
}

/// Anything carrying a [`TimecodeInfo`]
pub trait HasTimecode {
    fn timecode_info(&self) -> &TimecodeInfo;

    fn frame_rate(&self) -> FrameRate {
        self.timecode_info().frame_rate
    }

    fn start(&self) -> RationalTime {
        self.timecode_info().start.time
    }

    fn duration(&self) -> RationalTime {
        self.timecode_info().duration.time
    }

    fn offset(&self) -> RationalTime {
        self.timecode_info().offset.time
    }
}
