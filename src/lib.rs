//! VLBI baseband payload decoding and encoding.
//!
//! Decodes the packed sample payload of VDIF frames (including Mark 5B payloads
//! carried in VDIF) into `ndarray` sample arrays and encodes them back, and
//! provides the bit-level helpers the header layer relies on: a generic CRC over
//! single or multi-track bit streams, binary-coded-decimal conversion, and frame
//! rate inference by scanning headers.
//!
//! References:
//! * VDIF Specification Release 1.1.1
//!     - https://vlbi.org/wp-content/uploads/2019/03/VDIF_specification_Release_1.1.1.pdf
//! * Mark 5B System User's Manual
//!
mod error;

pub mod bcd;
pub mod crc;
pub mod framerate;
pub mod payload;

pub mod prelude {
    pub use crate::error::{Error, Result};
}

pub use error::{Error, Result};
pub use framerate::{frame_rate, scan_frame_rate, FrameHeader, FrameRate};
pub use payload::{FormatVariant, Payload, PayloadHeader, PayloadLayout, Samples};
