use crate::Error;
use ecliptic_math::{GroupElement, Point};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use num_bigint::BigUint;

/// Candidate x-coordinates tried per chunk.
pub const MAX_MAPPING_ATTEMPTS: u32 = 256;

/// Base64 text split into chunks read as big-endian x-coordinates, each
/// with a trailing spare byte that is bumped until x lands on the curve.
#[derive(Debug, Clone)]
pub struct MessageCodec {
    generator: GroupElement,
    chunk_size: usize,
}

impl MessageCodec {
    pub fn new(generator: &GroupElement) -> Result<Self, Error> {
        // exact bit length, not rounded up to whole bytes
        let order_bits = generator.require_order()?.bits();
        let chunk_size = (order_bits.saturating_sub(8) / 8) as usize;
        if chunk_size == 0 {
            return Err(Error::OrderTooSmall);
        }
        Ok(Self {
            generator: generator.clone(),
            chunk_size,
        })
    }

    /// Payload bytes carried by a single point.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn encode(&self, message: &str) -> Result<Vec<Point>, Error> {
        let encoded = STANDARD.encode(message.as_bytes());
        encoded
            .as_bytes()
            .chunks(self.chunk_size)
            .enumerate()
            .map(|(index, chunk)| {
                let mut padded = chunk.to_vec();
                padded.resize(self.chunk_size + 1, 0);
                self.map_chunk(index as u32, BigUint::from_bytes_be(&padded))
            })
            .collect()
    }

    fn map_chunk(&self, index: u32, x: BigUint) -> Result<Point, Error> {
        let curve = self.generator.curve();
        for attempt in 0..MAX_MAPPING_ATTEMPTS {
            let candidate = &x + attempt;
            if &candidate >= curve.modulus() {
                break;
            }
            if let Some((y1, y2)) = curve.solve_y(&candidate)? {
                let point = Point::new(candidate, std::cmp::min(y1, y2));
                if curve.is_on_curve(&point) {
                    tracing::trace!(chunk = index, attempt, "chunk mapped");
                    return Ok(point);
                }
            }
        }
        Err(Error::UnmappableMessage(index))
    }

    pub fn decode(&self, points: &[Point]) -> Result<String, Error> {
        let mut bytes = Vec::with_capacity(points.len() * self.chunk_size);
        for point in points {
            let x = point
                .x()
                .ok_or_else(|| Error::InvalidEncoding("identity carries no message".to_string()))?;
            let chunk = x.to_bytes_be();
            bytes.extend_from_slice(&chunk[..chunk.len().saturating_sub(1)]);
        }
        while bytes.last() == Some(&0) {
            bytes.pop();
        }
        let decoded = STANDARD
            .decode(&bytes)
            .map_err(|err| Error::InvalidEncoding(err.to_string()))?;
        String::from_utf8(decoded).map_err(|err| Error::InvalidEncoding(err.to_string()))
    }
}
