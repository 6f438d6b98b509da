//! Fixed-layout payload codec
//!
//! The swap program consumes packed instruction payloads and stores account
//! state the same way: unsigned little-endian fields of fixed width, no
//! delimiters, no length prefixes. A [`Schema`] enumerates the named fields
//! in wire order; the encoded length is always the sum of the field widths.
//!
//! The two layouts the program publishes are exposed as typed wrappers:
//! - [`SwapArgs`]: instruction payload (u64 amount + two u8 decimals, 10 bytes)
//! - [`CounterState`]: state account payload (u32 swap counter, 4 bytes)

use thiserror::Error;

/// Errors produced by schema encode/decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A value does not fit its field width, or the value count does not
    /// match the schema's field count.
    #[error("schema mismatch ({schema}): {reason}")]
    SchemaMismatch {
        /// Name of the schema being encoded
        schema: &'static str,
        /// What did not line up
        reason: String,
    },

    /// The input buffer is shorter than the schema's total width.
    #[error("buffer too short for {schema}: need {need} bytes, got {got}")]
    BufferTooShort {
        /// Name of the schema being decoded
        schema: &'static str,
        /// Total width the schema requires
        need: usize,
        /// Bytes actually supplied
        got: usize,
    },
}

/// Width of one unsigned little-endian field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    U8,
    U32,
    U64,
}

impl FieldWidth {
    /// Encoded size in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }

    /// Largest value representable in this width.
    pub const fn max_value(self) -> u64 {
        match self {
            Self::U8 => u8::MAX as u64,
            Self::U32 => u32::MAX as u64,
            Self::U64 => u64::MAX,
        }
    }
}

/// One named field in a packed layout.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub width: FieldWidth,
}

/// An ordered, fixed-width field layout.
///
/// Field order is the wire order. There is no self-description on the wire;
/// both sides must agree on the schema out of band.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    /// Total encoded size in bytes.
    pub fn size(&self) -> usize {
        self.fields.iter().map(|f| f.width.size()).sum()
    }

    /// Encode `values` (one per field, in schema order) into a packed buffer.
    ///
    /// Fails with [`CodecError::SchemaMismatch`] when the value count differs
    /// from the field count or a value exceeds its field's width.
    pub fn encode(&self, values: &[u64]) -> Result<Vec<u8>, CodecError> {
        if values.len() != self.fields.len() {
            return Err(CodecError::SchemaMismatch {
                schema: self.name,
                reason: format!(
                    "expected {} values, got {}",
                    self.fields.len(),
                    values.len()
                ),
            });
        }

        let mut buf = Vec::with_capacity(self.size());
        for (field, &value) in self.fields.iter().zip(values) {
            if value > field.width.max_value() {
                return Err(CodecError::SchemaMismatch {
                    schema: self.name,
                    reason: format!(
                        "value {} exceeds {}-byte field '{}'",
                        value,
                        field.width.size(),
                        field.name
                    ),
                });
            }
            let bytes = value.to_le_bytes();
            buf.extend_from_slice(&bytes[..field.width.size()]);
        }
        Ok(buf)
    }

    /// Decode a packed buffer into one value per field, in schema order.
    ///
    /// Trailing bytes beyond the schema's width are ignored; a short buffer
    /// fails with [`CodecError::BufferTooShort`].
    pub fn decode(&self, buf: &[u8]) -> Result<Vec<u64>, CodecError> {
        if buf.len() < self.size() {
            return Err(CodecError::BufferTooShort {
                schema: self.name,
                need: self.size(),
                got: buf.len(),
            });
        }

        let mut values = Vec::with_capacity(self.fields.len());
        let mut offset = 0;
        for field in self.fields {
            let width = field.width.size();
            let mut word = [0u8; 8];
            word[..width].copy_from_slice(&buf[offset..offset + width]);
            values.push(u64::from_le_bytes(word));
            offset += width;
        }
        Ok(values)
    }
}

/// Instruction payload for both swap operation kinds.
///
/// Wire layout: `amount` (u64 LE), `from_decimals` (u8), `quote_decimals`
/// (u8) — 10 bytes, matching the program's field splitting exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapArgs {
    /// Amount to deposit into the first leg, in the source token's base units
    pub amount: u64,
    /// Decimals of the source token
    pub from_decimals: u8,
    /// Decimals of the quote token
    pub quote_decimals: u8,
}

impl SwapArgs {
    pub const SCHEMA: Schema = Schema {
        name: "swap_args",
        fields: &[
            Field { name: "amount", width: FieldWidth::U64 },
            Field { name: "from_decimals", width: FieldWidth::U8 },
            Field { name: "quote_decimals", width: FieldWidth::U8 },
        ],
    };

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Self::SCHEMA.encode(&[
            self.amount,
            u64::from(self.from_decimals),
            u64::from(self.quote_decimals),
        ])
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, CodecError> {
        let values = Self::SCHEMA.decode(buf)?;
        Ok(Self {
            amount: values[0],
            from_decimals: values[1] as u8,
            quote_decimals: values[2] as u8,
        })
    }
}

/// State stored in the seed-derived counter account.
///
/// The program increments the counter once per confirmed swap; the account
/// holds the bare u32 in little-endian form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterState {
    pub counter: u32,
}

impl CounterState {
    pub const SCHEMA: Schema = Schema {
        name: "counter_state",
        fields: &[Field { name: "counter", width: FieldWidth::U32 }],
    };

    /// Account size needed to hold this state.
    pub fn space() -> usize {
        Self::SCHEMA.size()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Self::SCHEMA.encode(&[u64::from(self.counter)])
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, CodecError> {
        let values = Self::SCHEMA.decode(buf)?;
        Ok(Self { counter: values[0] as u32 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_counter_zero_encodes_to_four_zero_bytes() {
        let bytes = CounterState { counter: 0 }.to_bytes().unwrap();
        assert_eq!(bytes, vec![0u8; 4]);
        assert_eq!(CounterState::from_bytes(&bytes).unwrap().counter, 0);
    }

    #[test]
    fn test_swap_args_wire_layout() {
        let args = SwapArgs {
            amount: 70_000_000,
            from_decimals: 6,
            quote_decimals: 9,
        };
        let bytes = args.to_bytes().unwrap();
        assert_eq!(bytes.len(), 10);
        assert_eq!(&bytes[..8], &70_000_000u64.to_le_bytes());
        assert_eq!(bytes[8], 6);
        assert_eq!(bytes[9], 9);
        assert_eq!(SwapArgs::from_bytes(&bytes).unwrap(), args);
    }

    #[test]
    fn test_encode_rejects_oversized_value() {
        let schema = CounterState::SCHEMA;
        let err = schema.encode(&[u64::from(u32::MAX) + 1]).unwrap_err();
        assert!(matches!(err, CodecError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_encode_rejects_arity_mismatch() {
        let err = SwapArgs::SCHEMA.encode(&[1, 2]).unwrap_err();
        assert!(matches!(err, CodecError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let err = SwapArgs::SCHEMA.decode(&[0u8; 9]).unwrap_err();
        assert_eq!(
            err,
            CodecError::BufferTooShort {
                schema: "swap_args",
                need: 10,
                got: 9
            }
        );
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut buf = CounterState { counter: 7 }.to_bytes().unwrap();
        buf.extend_from_slice(&[0xAA, 0xBB]);
        assert_eq!(CounterState::from_bytes(&buf).unwrap().counter, 7);
    }

    proptest! {
        #[test]
        fn prop_swap_args_round_trip(amount in any::<u64>(), from in any::<u8>(), quote in any::<u8>()) {
            let args = SwapArgs { amount, from_decimals: from, quote_decimals: quote };
            let decoded = SwapArgs::from_bytes(&args.to_bytes().unwrap()).unwrap();
            prop_assert_eq!(decoded, args);
        }

        #[test]
        fn prop_counter_round_trip(counter in any::<u32>()) {
            let state = CounterState { counter };
            let decoded = CounterState::from_bytes(&state.to_bytes().unwrap()).unwrap();
            prop_assert_eq!(decoded, state);
        }
    }
}
