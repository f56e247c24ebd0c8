// Format descriptors for standard IEEE 754 encodings and their recoded
// counterparts.
//
// An IEEE format detects infinity and NaN by comparing the exponent field
// against all ones; the recoded form widens the exponent by one bit and
// reads the top three exponent bits as an explicit tag instead, so special
// cases never depend on a width-specific all-ones constant. Both descriptor
// kinds are immutable value objects sharing one capability surface,
// `FloatFormat`.

use crate::errors::{ConvertError, ConvertResult};

// Exponent tags used by the recoded encoding. Values between TAG_ZERO and
// TAG_INFINITY mark finite non-zero magnitudes.
pub const TAG_ZERO: u128 = 0x0;
pub const TAG_INFINITY: u128 = 0x6;
pub const TAG_NAN: u128 = 0x7;

// Full-set bit mask of the given width.
pub(crate) fn bit_mask(width: u32) -> u128 {
    if width >= 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

// Classification of an encoded value. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatClass {
    Zero,
    Subnormal,
    Normal,
    Infinity,
    NaN,
}

impl FloatClass {
    pub fn is_finite(self) -> bool {
        !matches!(self, FloatClass::Infinity | FloatClass::NaN)
    }
}

// Capability surface shared by the IEEE and recoded descriptors. Callers
// select the concrete variant; nothing is inferred from the bits themselves.
pub trait FloatFormat {
    // Significand width in bits, counting the implicit leading bit. The
    // stored trailing-significand field is one bit narrower.
    fn sig_width(&self) -> u32;

    // Exponent field width in bits.
    fn exp_width(&self) -> u32;

    fn classify(&self, value: u128) -> FloatClass;

    fn make_infinity(&self, sign: u128) -> u128;

    // Build a NaN with the given sign and quiet bit. `payload` fills the
    // significand bits below the quiet bit; each variant supplies its own
    // default pattern when it is absent.
    fn make_nan(&self, sign: u128, quiet: bool, payload: Option<u128>) -> ConvertResult<u128>;

    // Total width of an encoded value: sign, exponent, trailing significand.
    fn total_width(&self) -> u32 {
        1 + self.exp_width() + self.sig_width() - 1
    }

    fn sign_of(&self, value: u128) -> u128 {
        (value >> (self.total_width() - 1)) & 1
    }

    fn exponent_of(&self, value: u128) -> u128 {
        (value >> (self.sig_width() - 1)) & bit_mask(self.exp_width())
    }

    fn significand_of(&self, value: u128) -> u128 {
        value & bit_mask(self.sig_width() - 1)
    }

    // Compose sign, biased exponent and trailing significand into an
    // encoded value. Field overflow is a caller error, never truncated.
    fn build_value(&self, sign: u128, exp: u128, sig: u128) -> ConvertResult<u128> {
        if sign > 1 {
            return Err(ConvertError::InvalidArgument(format!(
                "sign must be 0 or 1, got {:#x}",
                sign
            )));
        }
        if exp > bit_mask(self.exp_width()) {
            return Err(ConvertError::InvalidArgument(format!(
                "exponent {:#x} exceeds {} bits",
                exp,
                self.exp_width()
            )));
        }
        if sig > bit_mask(self.sig_width() - 1) {
            return Err(ConvertError::InvalidArgument(format!(
                "significand {:#x} exceeds {} bits",
                sig,
                self.sig_width() - 1
            )));
        }
        Ok((((sign << self.exp_width()) | exp) << (self.sig_width() - 1)) | sig)
    }
}

fn check_widths(sig_width: u32, exp_width: u32, max_total: u32) -> ConvertResult<()> {
    if sig_width < 2 {
        return Err(ConvertError::InvalidArgument(format!(
            "significand width {} leaves no room for an implicit bit",
            sig_width
        )));
    }
    if exp_width < 3 {
        return Err(ConvertError::InvalidArgument(format!(
            "exponent width {} leaves no room for a 3-bit tag",
            exp_width
        )));
    }
    if sig_width + exp_width > max_total {
        return Err(ConvertError::InvalidArgument(format!(
            "{}-bit significand plus {}-bit exponent exceeds the {}-bit value carrier",
            sig_width, exp_width, max_total
        )));
    }
    Ok(())
}

// A standard IEEE 754 binary format described by significand width
// (including the implicit bit) and exponent width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IeeeFormat {
    sig_width: u32,
    exp_width: u32,
}

impl IeeeFormat {
    // binary16, binary32, binary64.
    pub const HALF: IeeeFormat = IeeeFormat {
        sig_width: 11,
        exp_width: 5,
    };
    pub const SINGLE: IeeeFormat = IeeeFormat {
        sig_width: 24,
        exp_width: 8,
    };
    pub const DOUBLE: IeeeFormat = IeeeFormat {
        sig_width: 53,
        exp_width: 11,
    };

    pub fn new(sig_width: u32, exp_width: u32) -> ConvertResult<IeeeFormat> {
        // Cap one bit below the carrier so the paired recoded format, with
        // its extra exponent bit, still fits.
        check_widths(sig_width, exp_width, 127)?;
        if (1u128 << (exp_width - 1)) + 2 <= sig_width as u128 {
            return Err(ConvertError::InvalidArgument(format!(
                "{}-bit exponent cannot span a {}-bit significand's subnormal range",
                exp_width, sig_width
            )));
        }
        Ok(IeeeFormat {
            sig_width,
            exp_width,
        })
    }

    // The recoded format this IEEE format is in 1:1 correspondence with.
    pub fn to_recoded(&self) -> RecodedFormat {
        RecodedFormat {
            sig_width: self.sig_width,
            exp_width: self.exp_width + 1,
        }
    }

    // True iff the exponent field is all ones, i.e. infinity or NaN.
    pub fn is_special_exponent(&self, exp: u128) -> bool {
        exp == bit_mask(self.exp_width)
    }

    // True iff the exponent field is zero, i.e. zero or subnormal.
    pub fn is_zero_or_subnormal_exponent(&self, exp: u128) -> bool {
        exp == 0
    }
}

impl FloatFormat for IeeeFormat {
    fn sig_width(&self) -> u32 {
        self.sig_width
    }

    fn exp_width(&self) -> u32 {
        self.exp_width
    }

    fn classify(&self, value: u128) -> FloatClass {
        let exp = self.exponent_of(value);
        let sig = self.significand_of(value);
        if self.is_special_exponent(exp) {
            if sig == 0 {
                FloatClass::Infinity
            } else {
                FloatClass::NaN
            }
        } else if exp == 0 {
            if sig == 0 {
                FloatClass::Zero
            } else {
                FloatClass::Subnormal
            }
        } else {
            FloatClass::Normal
        }
    }

    fn make_infinity(&self, sign: u128) -> u128 {
        (((sign & 1) << self.exp_width) | bit_mask(self.exp_width)) << (self.sig_width - 1)
    }

    // Without an explicit payload the remaining payload bits are all set, so
    // the result is a valid NaN for either quiet-bit value.
    fn make_nan(&self, sign: u128, quiet: bool, payload: Option<u128>) -> ConvertResult<u128> {
        let quiet_bit = (quiet as u128) << (self.sig_width - 2);
        let sig = match payload {
            Some(p) => {
                if p > bit_mask(self.sig_width - 2) {
                    return Err(ConvertError::InvalidArgument(format!(
                        "NaN payload {:#x} exceeds {} bits",
                        p,
                        self.sig_width - 2
                    )));
                }
                quiet_bit | p
            }
            None => quiet_bit | bit_mask(self.sig_width - 2),
        };
        self.build_value(sign, bit_mask(self.exp_width), sig)
    }
}

// The exponent-widened recoded counterpart of an IEEE format. The exponent
// is always one bit wider than the IEEE format it pairs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecodedFormat {
    sig_width: u32,
    exp_width: u32,
}

impl RecodedFormat {
    // recf17, recf33, recf65.
    pub const HALF: RecodedFormat = RecodedFormat {
        sig_width: 11,
        exp_width: 6,
    };
    pub const SINGLE: RecodedFormat = RecodedFormat {
        sig_width: 24,
        exp_width: 9,
    };
    pub const DOUBLE: RecodedFormat = RecodedFormat {
        sig_width: 53,
        exp_width: 12,
    };

    pub fn new(sig_width: u32, exp_width: u32) -> ConvertResult<RecodedFormat> {
        check_widths(sig_width, exp_width, 128)?;
        if (1u128 << (exp_width - 2)) + 2 <= sig_width as u128 {
            return Err(ConvertError::InvalidArgument(format!(
                "{}-bit exponent cannot span a {}-bit significand's subnormal range",
                exp_width, sig_width
            )));
        }
        Ok(RecodedFormat {
            sig_width,
            exp_width,
        })
    }

    // The IEEE format this recoded format encodes, one exponent bit
    // narrower.
    pub fn to_ieee(&self) -> IeeeFormat {
        IeeeFormat {
            sig_width: self.sig_width,
            exp_width: self.exp_width - 1,
        }
    }

    // Top three bits of an exponent field.
    pub fn exponent_tag(&self, exp: u128) -> u128 {
        exp >> (self.exp_width - 3)
    }

    // Smallest biased exponent whose magnitude decodes to a normal IEEE
    // number. Tagged-normal exponents below this bound carry subnormal
    // magnitudes.
    pub fn min_normal_exp(&self) -> u128 {
        (1u128 << (self.exp_width - 2)) + 2
    }

    // Smallest biased exponent representing a non-zero magnitude at all.
    pub fn min_subnormal_exp(&self) -> u128 {
        self.min_normal_exp() - self.sig_width as u128
    }

    // Re-bias an exponent into its IEEE encoding. Only meaningful for
    // exponents at or above min_normal_exp.
    pub fn rebias_to_ieee(&self, exp: u128) -> u128 {
        exp - (1u128 << (self.exp_width - 2)) - 1
    }

    // Infinity with explicit payload bits. The payload is a don't-care
    // region of the recoded encoding; decode drops it.
    pub fn make_infinity_with_payload(&self, sign: u128, payload: u128) -> u128 {
        let exp = TAG_INFINITY << (self.exp_width - 3);
        (((sign & 1) << self.exp_width) | exp) << (self.sig_width - 1)
            | (payload & bit_mask(self.sig_width - 1))
    }
}

impl FloatFormat for RecodedFormat {
    fn sig_width(&self) -> u32 {
        self.sig_width
    }

    fn exp_width(&self) -> u32 {
        self.exp_width
    }

    fn classify(&self, value: u128) -> FloatClass {
        let exp = self.exponent_of(value);
        match self.exponent_tag(exp) {
            TAG_NAN => FloatClass::NaN,
            TAG_INFINITY => FloatClass::Infinity,
            TAG_ZERO => FloatClass::Zero,
            _ if exp < self.min_normal_exp() => FloatClass::Subnormal,
            _ => FloatClass::Normal,
        }
    }

    fn make_infinity(&self, sign: u128) -> u128 {
        self.make_infinity_with_payload(sign, 0)
    }

    // Defaults to a zero payload; a signaling NaN then needs an explicit
    // non-zero payload, since a recoded NaN with an all-zero significand is
    // not a legal encoding.
    fn make_nan(&self, sign: u128, quiet: bool, payload: Option<u128>) -> ConvertResult<u128> {
        let p = payload.unwrap_or(0);
        if p > bit_mask(self.sig_width - 2) {
            return Err(ConvertError::InvalidArgument(format!(
                "NaN payload {:#x} exceeds {} bits",
                p,
                self.sig_width - 2
            )));
        }
        let sig = ((quiet as u128) << (self.sig_width - 2)) | p;
        if sig == 0 {
            return Err(ConvertError::InvalidArgument(
                "recoded NaN significand cannot be zero".to_string(),
            ));
        }
        self.build_value(sign, TAG_NAN << (self.exp_width - 3), sig)
    }
}
