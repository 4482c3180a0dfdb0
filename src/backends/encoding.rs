use crate::codec::{CodecError, CodecResult};
use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    io::{Read, Result as IoResult, Write},
    str::FromStr,
};

/// Sample representations understood by the PCM backends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SampleEncoding {
    /// Signed 8-bit integer.
    S8,
    /// Unsigned 8-bit integer, centred on 128.
    U8,
    /// Signed 16-bit integer.
    S16,
    /// Signed 24-bit integer, packed into three bytes.
    S24,
    /// Signed 32-bit integer.
    S32,
    /// IEEE 754 single precision.
    Float,
    /// IEEE 754 double precision.
    Double,
}

impl SampleEncoding {
    /// Every encoding, in listing order.
    pub const ALL: [SampleEncoding; 7] = [
        SampleEncoding::S8,
        SampleEncoding::U8,
        SampleEncoding::S16,
        SampleEncoding::S24,
        SampleEncoding::S32,
        SampleEncoding::Float,
        SampleEncoding::Double,
    ];

    /// Name used in requests and listings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        use SampleEncoding::*;
        match self {
            S8 => "s8",
            U8 => "u8",
            S16 => "s16",
            S24 => "s24",
            S32 => "s32",
            Float => "float",
            Double => "double",
        }
    }

    /// Bits per stored sample.
    #[must_use]
    pub const fn bits(self) -> u32 {
        use SampleEncoding::*;
        match self {
            S8 | U8 => 8,
            S16 => 16,
            S24 => 24,
            S32 | Float => 32,
            Double => 64,
        }
    }

    /// Bytes per stored sample.
    #[must_use]
    pub const fn bytes(self) -> usize {
        (self.bits() / 8) as usize
    }

    /// Returns whether this is a floating-point encoding.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, SampleEncoding::Float | SampleEncoding::Double)
    }

    pub(crate) fn read_sample<B: ByteOrder, R: Read>(self, r: &mut R) -> IoResult<f64> {
        use SampleEncoding::*;
        Ok(match self {
            S8 => f64::from(r.read_i8()?) / 128.0,
            U8 => (f64::from(r.read_u8()?) - 128.0) / 128.0,
            S16 => f64::from(r.read_i16::<B>()?) / 32_768.0,
            S24 => f64::from(r.read_i24::<B>()?) / 8_388_608.0,
            S32 => f64::from(r.read_i32::<B>()?) / 2_147_483_648.0,
            Float => f64::from(r.read_f32::<B>()?),
            Double => r.read_f64::<B>()?,
        })
    }

    pub(crate) fn write_sample<B: ByteOrder, W: Write>(self, w: &mut W, s: f64) -> IoResult<()> {
        use SampleEncoding::*;
        match self {
            S8 => w.write_i8(quantise(s, 8) as i8),
            U8 => w.write_u8((quantise(s, 8) + 128) as u8),
            S16 => w.write_i16::<B>(quantise(s, 16) as i16),
            S24 => w.write_i24::<B>(quantise(s, 24)),
            S32 => w.write_i32::<B>(quantise(s, 32)),
            Float => w.write_f32::<B>(s as f32),
            Double => w.write_f64::<B>(s),
        }
    }
}

/// Scales `s` to a signed integer of `bits` width, clipping out-of-range input.
pub(crate) fn quantise(s: f64, bits: u32) -> i32 {
    let scale = f64::from(1_u32 << (bits - 1));
    (s * scale).round().clamp(-scale, scale - 1.0) as i32
}

impl Display for SampleEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for SampleEncoding {
    type Err = CodecError;

    fn from_str(s: &str) -> CodecResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|enc| enc.name() == s)
            .ok_or_else(|| CodecError::BadEncoding(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};
    use std::io::Cursor;

    #[test]
    fn names_parse_back() {
        for enc in SampleEncoding::ALL {
            assert_eq!(enc.name().parse::<SampleEncoding>().ok(), Some(enc));
        }
        assert!(matches!(
            "s12".parse::<SampleEncoding>(),
            Err(CodecError::BadEncoding(e)) if e == "s12"
        ));
    }

    #[test]
    fn quantise_clips_at_full_scale() {
        assert_eq!(quantise(1.0, 16), i32::from(i16::MAX));
        assert_eq!(quantise(-1.0, 16), i32::from(i16::MIN));
        assert_eq!(quantise(4.0, 8), 127);
        assert_eq!(quantise(1.0, 32), i32::MAX);
        assert_eq!(quantise(0.0, 24), 0);
    }

    #[test]
    fn byte_order_is_respected() {
        let mut le = vec![];
        let mut be = vec![];
        SampleEncoding::S16
            .write_sample::<LittleEndian, _>(&mut le, 0.5)
            .unwrap();
        SampleEncoding::S16
            .write_sample::<BigEndian, _>(&mut be, 0.5)
            .unwrap();

        assert_eq!(le, vec![0x00, 0x40]);
        assert_eq!(be, vec![0x40, 0x00]);

        let back = SampleEncoding::S16
            .read_sample::<BigEndian, _>(&mut Cursor::new(be))
            .unwrap();
        assert!((back - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unsigned_bytes_are_centred() {
        let mut out = vec![];
        SampleEncoding::U8
            .write_sample::<LittleEndian, _>(&mut out, 0.0)
            .unwrap();
        assert_eq!(out, vec![128]);
    }
}
