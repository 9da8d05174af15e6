//! Human-readable byte counts in binary units.
//!
//! Below one kibibyte the exact byte count is printed; kilobyte and megabyte
//! magnitudes get one decimal place. Unit labels are Russian, matching the
//! rest of the interface.

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * 1024;

/// Magnitude bucket a byte count falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeMagnitude {
    Bytes,
    Kilobytes,
    Megabytes,
}

impl SizeMagnitude {
    #[must_use]
    pub const fn of(bytes: u64) -> Self {
        if bytes < KIB {
            Self::Bytes
        } else if bytes < MIB {
            Self::Kilobytes
        } else {
            Self::Megabytes
        }
    }

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Bytes => "Б",
            Self::Kilobytes => "КБ",
            Self::Megabytes => "МБ",
        }
    }
}

#[expect(clippy::cast_precision_loss, reason = "display only")]
#[must_use]
pub fn format_size(bytes: u64) -> String {
    let magnitude = SizeMagnitude::of(bytes);

    match magnitude {
        SizeMagnitude::Bytes => format!("{bytes} {}", magnitude.unit()),
        SizeMagnitude::Kilobytes => format!("{:.1} {}", bytes as f64 / KIB as f64, magnitude.unit()),
        SizeMagnitude::Megabytes => format!("{:.1} {}", bytes as f64 / MIB as f64, magnitude.unit()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_each_magnitude() {
        assert_eq!(format_size(0), "0 Б");
        assert_eq!(format_size(500), "500 Б");
        assert_eq!(format_size(1023), "1023 Б");
        assert_eq!(format_size(1024), "1.0 КБ");
        assert_eq!(format_size(2048), "2.0 КБ");
        assert_eq!(format_size(1536), "1.5 КБ");
        assert_eq!(format_size(MIB), "1.0 МБ");
        assert_eq!(format_size(50 * MIB), "50.0 МБ");
    }

    #[test]
    fn magnitude_is_monotonic_across_boundaries() {
        let samples = [
            0,
            1,
            KIB - 1,
            KIB,
            KIB + 1,
            MIB - 1,
            MIB,
            MIB + 1,
            u64::MAX,
        ];

        for pair in samples.windows(2) {
            assert!(SizeMagnitude::of(pair[0]) <= SizeMagnitude::of(pair[1]));
        }

        assert_eq!(SizeMagnitude::of(KIB - 1), SizeMagnitude::Bytes);
        assert_eq!(SizeMagnitude::of(KIB), SizeMagnitude::Kilobytes);
        assert_eq!(SizeMagnitude::of(MIB - 1), SizeMagnitude::Kilobytes);
        assert_eq!(SizeMagnitude::of(MIB), SizeMagnitude::Megabytes);
    }

    /// Numeric part of a formatted size, e.g. `1.5` for `"1.5 КБ"`.
    fn amount(formatted: &str) -> f64 {
        formatted
            .split(' ')
            .next()
            .and_then(|n| n.parse().ok())
            .expect("formatted size starts with a number")
    }

    proptest! {
        #[test]
        fn larger_sizes_never_format_smaller(a in 0u64..4 * MIB, b in 0u64..4 * MIB) {
            let (lo, hi) = (a.min(b), a.max(b));
            let (m_lo, m_hi) = (SizeMagnitude::of(lo), SizeMagnitude::of(hi));
            prop_assert!(m_lo <= m_hi);

            let (f_lo, f_hi) = (format_size(lo), format_size(hi));
            prop_assert!(f_lo.ends_with(m_lo.unit()));
            prop_assert!(f_hi.ends_with(m_hi.unit()));
            if m_lo == m_hi {
                prop_assert!(amount(&f_lo) <= amount(&f_hi));
            }
        }

        #[test]
        fn bytes_below_one_kib_print_exactly(n in 0u64..KIB) {
            prop_assert_eq!(format_size(n), format!("{n} Б"));
        }
    }
}
