//! Element types of field buffers and their promotion to f64.

use bytemuck::AnyBitPattern;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{SwathError, SwathResult};

/// Scalar element type of a stored field buffer.
///
/// Every supported type promotes losslessly to `f64`, which is the element
/// type of all adjusted (interpolated) buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl ElementType {
    /// Size of one element in bytes.
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Whether this is a floating-point type.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Get the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Decode a raw native-endian buffer into f64 values.
    ///
    /// The buffer length must be an exact multiple of the element size.
    pub fn decode_to_f64(&self, bytes: &[u8]) -> SwathResult<Vec<f64>> {
        match self {
            Self::Int8 => decode_as::<i8>(bytes),
            Self::UInt8 => decode_as::<u8>(bytes),
            Self::Int16 => decode_as::<i16>(bytes),
            Self::UInt16 => decode_as::<u16>(bytes),
            Self::Int32 => decode_as::<i32>(bytes),
            Self::UInt32 => decode_as::<u32>(bytes),
            Self::Float32 => decode_as::<f32>(bytes),
            Self::Float64 => decode_as::<f64>(bytes),
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn decode_as<T: AnyBitPattern + ToPrimitive>(bytes: &[u8]) -> SwathResult<Vec<f64>> {
    let size = std::mem::size_of::<T>();
    if bytes.len() % size != 0 {
        return Err(SwathError::config(format!(
            "buffer length {} is not a multiple of element size {}",
            bytes.len(),
            size
        )));
    }

    // pod_read_unaligned: the provider's byte buffer carries no alignment
    // guarantee for multi-byte elements.
    Ok(bytes
        .chunks_exact(size)
        .map(|chunk| {
            bytemuck::pod_read_unaligned::<T>(chunk)
                .to_f64()
                .unwrap_or(f64::NAN)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bytes() {
        assert_eq!(ElementType::Int8.size_bytes(), 1);
        assert_eq!(ElementType::UInt16.size_bytes(), 2);
        assert_eq!(ElementType::Float32.size_bytes(), 4);
        assert_eq!(ElementType::Float64.size_bytes(), 8);
    }

    #[test]
    fn test_decode_int16() {
        let values: Vec<i16> = vec![-3, 0, 1200];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        let decoded = ElementType::Int16.decode_to_f64(&bytes).unwrap();
        assert_eq!(decoded, vec![-3.0, 0.0, 1200.0]);
    }

    #[test]
    fn test_decode_float32() {
        let values: Vec<f32> = vec![1.5, -2.25];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        let decoded = ElementType::Float32.decode_to_f64(&bytes).unwrap();
        assert_eq!(decoded, vec![1.5, -2.25]);
    }

    #[test]
    fn test_decode_length_mismatch() {
        let bytes = [0u8; 7];
        assert!(ElementType::Float64.decode_to_f64(&bytes).is_err());
    }
}
