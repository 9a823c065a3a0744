//! Encoded polyline codec.
//!
//! Each point is stored as a (lat, lon) delta from the previous point, scaled
//! by `10^precision`, zig-zag folded and packed five bits per byte (offset by
//! 63, bit 0x20 marks continuation).

use crate::domain::model::Coordinate;
use crate::utils::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision(u32);

impl Precision {
    /// `geometries=polyline`
    pub const FIVE: Precision = Precision(5);
    /// `geometries=polyline6`
    pub const SIX: Precision = Precision(6);
    pub const MAX_DIGITS: u32 = 10;

    pub fn new(digits: u32) -> Result<Self, DecodeError> {
        if digits > Self::MAX_DIGITS {
            return Err(DecodeError::InvalidPrecision(digits));
        }
        Ok(Self(digits))
    }

    pub fn digits(&self) -> u32 {
        self.0
    }

    pub fn factor(&self) -> f64 {
        10f64.powi(self.0 as i32)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::FIVE
    }
}

/// Lazy decoder over an encoded polyline.
///
/// Clone it before consuming, or call [`points`] again, to walk the same
/// string from the start. Yields at most one error, then ends.
#[derive(Debug, Clone)]
pub struct Points<'a> {
    bytes: &'a [u8],
    position: usize,
    index: usize,
    lat: i64,
    lon: i64,
    factor: f64,
    done: bool,
}

pub fn points(encoded: &str, precision: Precision) -> Points<'_> {
    Points {
        bytes: encoded.as_bytes(),
        position: 0,
        index: 0,
        lat: 0,
        lon: 0,
        factor: precision.factor(),
        done: false,
    }
}

/// 一次解出整條折線
pub fn decode(encoded: &str, precision: Precision) -> Result<Vec<Coordinate>, DecodeError> {
    points(encoded, precision).collect()
}

impl Points<'_> {
    fn next_value(&mut self) -> Result<Option<i64>, DecodeError> {
        if self.position >= self.bytes.len() {
            return Ok(None);
        }

        let mut result: u64 = 0;
        let mut shift = 0u32;
        loop {
            let Some(&byte) = self.bytes.get(self.position) else {
                return Err(DecodeError::Truncated);
            };
            if !(63..=126).contains(&byte) {
                return Err(DecodeError::InvalidByte {
                    position: self.position,
                });
            }
            if shift > 55 {
                return Err(DecodeError::Overflow {
                    position: self.position,
                });
            }

            let chunk = u64::from(byte - 63);
            result |= (chunk & 0x1f) << shift;
            shift += 5;
            self.position += 1;

            if chunk & 0x20 == 0 {
                break;
            }
        }

        let value = if result & 1 == 1 {
            !(result >> 1) as i64
        } else {
            (result >> 1) as i64
        };
        Ok(Some(value))
    }

    fn step(&mut self) -> Result<Option<Coordinate>, DecodeError> {
        let Some(dlat) = self.next_value()? else {
            return Ok(None);
        };
        // 緯度之後一定要有經度
        let dlon = self.next_value()?.ok_or(DecodeError::Truncated)?;

        let overflow = DecodeError::Overflow {
            position: self.position,
        };
        self.lat = self.lat.checked_add(dlat).ok_or_else(|| overflow.clone())?;
        self.lon = self.lon.checked_add(dlon).ok_or(overflow)?;

        let point = Coordinate::new(self.lon as f64 / self.factor, self.lat as f64 / self.factor)
            .map_err(|_| DecodeError::OutOfRange { index: self.index })?;
        self.index += 1;
        Ok(Some(point))
    }
}

impl Iterator for Points<'_> {
    type Item = Result<Coordinate, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(point)) => Some(Ok(point)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

pub fn encode(points: &[Coordinate], precision: Precision) -> String {
    let factor = precision.factor();
    let mut out = String::with_capacity(points.len() * 8);
    let (mut prev_lat, mut prev_lon) = (0i64, 0i64);

    for point in points {
        let lat = (point.lat() * factor).round() as i64;
        let lon = (point.lon() * factor).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lon - prev_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = (delta << 1) as u64;
    if delta < 0 {
        value = !value;
    }
    while value >= 0x20 {
        out.push(char::from((0x20 | (value & 0x1f)) as u8 + 63));
        value >>= 5;
    }
    out.push(char::from(value as u8 + 63));
}
