// Conversion engine between IEEE 754 and recoded encodings.
//
// All conversions are pure functions over raw bit patterns carried as
// `u128` (the recoded double format is 65 bits wide, one past `u64`).
// Decoding is total over every value the encoder can produce; inputs no
// encoder produces are rejected rather than silently mapped.

use log::trace;
use rand::Rng;

use crate::errors::{ConvertError, ConvertResult};
use crate::formats::{
    bit_mask, FloatFormat, IeeeFormat, RecodedFormat, TAG_INFINITY, TAG_NAN, TAG_ZERO,
};

fn check_value_width(value: u128, format: &dyn FloatFormat) -> ConvertResult<()> {
    if value > bit_mask(format.total_width()) {
        return Err(ConvertError::InvalidArgument(format!(
            "value {:#x} exceeds the {}-bit encoding",
            value,
            format.total_width()
        )));
    }
    Ok(())
}

// Decode a recoded value into its IEEE 754 encoding.
//
// Special cases come straight off the 3-bit exponent tag. Magnitudes whose
// biased exponent sits below the format's minimum normal exponent decode to
// IEEE subnormals by re-inserting the implicit leading one and shifting it
// back down; any set bit that shift would drop is a LossyConversion error
// rather than silent truncation.
pub fn recoded_to_ieee(value: u128, format: &RecodedFormat) -> ConvertResult<u128> {
    check_value_width(value, format)?;
    let sign = format.sign_of(value);
    let exp = format.exponent_of(value);
    let sig = format.significand_of(value);
    let ieee = format.to_ieee();

    match format.exponent_tag(exp) {
        TAG_ZERO => {
            // The encoder only emits a zero significand under this tag; a
            // non-zero one would have to be discarded, so reject it.
            if sig != 0 {
                trace!("zero-tagged input {:#x} carries significand bits", value);
                return Err(ConvertError::InvalidEncoding(format!(
                    "zero-tagged value has non-zero significand {:#x}",
                    sig
                )));
            }
            ieee.build_value(sign, 0, 0)
        }
        TAG_INFINITY => Ok(ieee.make_infinity(sign)),
        TAG_NAN => {
            if sig == 0 {
                return Err(ConvertError::InvalidEncoding(
                    "NaN payload cannot be zero in recoded form".to_string(),
                ));
            }
            let quiet = (sig >> (format.sig_width() - 2)) & 1 == 1;
            let payload = sig & bit_mask(format.sig_width() - 2);
            ieee.make_nan(sign, quiet, Some(payload))
        }
        _ if exp < format.min_normal_exp() => {
            if exp < format.min_subnormal_exp() {
                trace!("exponent {:#x} below the subnormal band", exp);
                return Err(ConvertError::InvalidEncoding(format!(
                    "exponent {:#x} below the minimum subnormal exponent {:#x}",
                    exp,
                    format.min_subnormal_exp()
                )));
            }
            let shift = (format.min_normal_exp() - exp) as u32;
            let full_sig = sig | (1u128 << (format.sig_width() - 1));
            if full_sig & bit_mask(shift) != 0 {
                return Err(ConvertError::LossyConversion(format!(
                    "denormalizing by {} bits would drop set significand bits",
                    shift
                )));
            }
            ieee.build_value(sign, 0, full_sig >> shift)
        }
        _ => ieee.build_value(sign, format.rebias_to_ieee(exp), sig),
    }
}

// Encode an IEEE 754 value into recoded form.
//
// Total over every bit pattern of the format. Infinity payload bits are
// don't-care in the recoded encoding; this variant leaves them zero, which
// makes the result a pure function of the input.
pub fn ieee_to_recoded(value: u128, format: &IeeeFormat) -> ConvertResult<u128> {
    encode(value, format, || 0)
}

// Encode with the infinity payload bits drawn from `rng`. Decoding drops
// those bits again, so the round-trip result does not depend on the seed;
// pass a seeded generator (e.g. ChaCha8Rng) for reproducible output bits.
pub fn ieee_to_recoded_with<R: Rng>(
    value: u128,
    format: &IeeeFormat,
    rng: &mut R,
) -> ConvertResult<u128> {
    let payload_width = format.sig_width() - 1;
    encode(value, format, || {
        let low = rng.gen::<u64>() as u128;
        let high = rng.gen::<u64>() as u128;
        ((high << 64) | low) & bit_mask(payload_width)
    })
}

fn encode<F>(value: u128, format: &IeeeFormat, infinity_payload: F) -> ConvertResult<u128>
where
    F: FnOnce() -> u128,
{
    check_value_width(value, format)?;
    let sign = format.sign_of(value);
    let exp = format.exponent_of(value);
    let sig = format.significand_of(value);
    let recoded = format.to_recoded();

    if format.is_special_exponent(exp) {
        if sig == 0 {
            Ok(recoded.make_infinity_with_payload(sign, infinity_payload()))
        } else {
            let quiet = (sig >> (format.sig_width() - 2)) & 1 == 1;
            let payload = sig & bit_mask(format.sig_width() - 2);
            recoded.make_nan(sign, quiet, Some(payload))
        }
    } else if format.is_zero_or_subnormal_exponent(exp) {
        if sig == 0 {
            recoded.build_value(sign, 0, 0)
        } else {
            // Normalize: shift out the leading zeros plus the first set bit,
            // which becomes the implicit one of the recoded significand.
            let field = format.sig_width() - 1;
            let leading_zeros = field - (128 - sig.leading_zeros());
            let normalized = (sig << (leading_zeros + 1)) & bit_mask(field);
            let exp_out = recoded.min_normal_exp() - 1 - leading_zeros as u128;
            recoded.build_value(sign, exp_out, normalized)
        }
    } else {
        recoded.build_value(sign, (exp - 1) + recoded.min_normal_exp(), sig)
    }
}

// Reformat a recoded value directly into another recoded format, without
// going through IEEE and without rounding.
//
// Reduced-safety path: no range validation is performed. Narrowing
// truncates low-order significand bits, and an exponent outside the
// destination's range wraps into its field. The caller is responsible for
// ensuring the conversion preserves the magnitude, e.g. when widening a
// single-precision operand onto a double-precision datapath.
pub fn recoded_to_recoded(value: u128, from: &RecodedFormat, to: &RecodedFormat) -> u128 {
    if from == to {
        return value;
    }
    let sign = from.sign_of(value);
    let exp = from.exponent_of(value);
    let sig = from.significand_of(value);

    let sig_out = if to.sig_width() >= from.sig_width() {
        sig << (to.sig_width() - from.sig_width())
    } else {
        sig >> (from.sig_width() - to.sig_width())
    };

    let tag = from.exponent_tag(exp);
    let exp_out = if tag == TAG_ZERO || tag >= TAG_INFINITY {
        // Zero, infinity and NaN tags are categorical markers independent
        // of format width: keep the tag and carry the non-tag bits through.
        let non_tag = exp & bit_mask(from.exp_width() - 3) & bit_mask(to.exp_width() - 3);
        (tag << (to.exp_width() - 3)) | non_tag
    } else {
        // The recoded bias of a finite magnitude is 2^(exp_width - 1),
        // for the subnormal band as well as the normal range.
        let rebiased = exp as i128 + (1i128 << (to.exp_width() - 1))
            - (1i128 << (from.exp_width() - 1));
        (rebiased as u128) & bit_mask(to.exp_width())
    };

    (((sign << to.exp_width()) | exp_out) << (to.sig_width() - 1)) | sig_out
}
