use std::io::{Read, Seek, SeekFrom};

use tracing::{debug, warn};

use crate::prelude::*;

/// Header fields needed to infer the frame rate.
pub trait FrameHeader {
    /// Frame number within the current second, starting at 0.
    fn frame_number(&self) -> u64;
    /// Seconds counter of the frame.
    fn seconds(&self) -> i64;
    /// Number of payload bytes following the header.
    fn payload_size(&self) -> usize;
}

/// Result of scanning headers for one second of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    pub frames_per_second: u64,
    /// Seconds of the first frame.
    pub start_seconds: i64,
    /// Seconds of the first frame after the frame number rolled over.
    pub rollover_seconds: i64,
}

impl FrameRate {
    /// Whether the frame number rolled over at something other than the next
    /// second.
    #[must_use]
    pub fn is_anomalous(&self) -> bool {
        self.start_seconds.checked_add(1) != Some(self.rollover_seconds)
    }
}

/// Scan the headers at the start of `source` to infer the number of frames in
/// one second of data.
///
/// `read_header` reads one header from the current position, leaving the source
/// at the start of the payload.
///
/// # Errors
/// [Error::UnexpectedStart] if the first frame number is not 0, or any error
/// returned by `read_header` or the seek, e.g., when the data ends before the
/// frame number rolls over.
pub fn scan_frame_rate<R, H, F>(source: &mut R, mut read_header: F) -> Result<FrameRate>
where
    R: Read + Seek,
    H: FrameHeader,
    F: FnMut(&mut R) -> Result<H>,
{
    source.seek(SeekFrom::Start(0))?;
    let mut header = read_header(source)?;
    if header.frame_number() != 0 {
        return Err(Error::UnexpectedStart {
            frame_number: header.frame_number(),
        });
    }
    let start_seconds = header.seconds();

    let mut skipped = 0usize;
    while header.frame_number() == 0 {
        source.seek(SeekFrom::Current(header.payload_size() as i64))?;
        header = read_header(source)?;
        skipped += 1;
    }
    debug!(skipped, start_seconds, "frames before first frame number change");

    let mut max_frame = 0;
    while header.frame_number() > 0 {
        max_frame = max_frame.max(header.frame_number());
        source.seek(SeekFrom::Current(header.payload_size() as i64))?;
        header = read_header(source)?;
    }

    Ok(FrameRate {
        frames_per_second: max_frame + 1,
        start_seconds,
        rollover_seconds: header.seconds(),
    })
}

/// Number of frames in one second of data, see [scan_frame_rate].
///
/// A rollover at other than the next second is logged as a warning but does not
/// fail.
///
/// # Errors
/// As [scan_frame_rate].
pub fn frame_rate<R, H, F>(source: &mut R, read_header: F) -> Result<u64>
where
    R: Read + Seek,
    H: FrameHeader,
    F: FnMut(&mut R) -> Result<H>,
{
    let rate = scan_frame_rate(source, read_header)?;
    if rate.is_anomalous() {
        warn!(
            start = rate.start_seconds,
            rollover = rate.rollover_seconds,
            "header time changed by more than 1 second"
        );
    }
    Ok(rate.frames_per_second)
}
