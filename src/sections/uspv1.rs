//! CCPA US Privacy string encoder.
//!
//! The string is made of 4 characters: the version, then the explicit notice, opt-out of
//! sale and LSPA covered transaction flags, each one of `Y`, `N` or `-`.
//!
//! See <https://github.com/InteractiveAdvertisingBureau/USPrivacy/blob/master/CCPA/US%20Privacy%20String.md>
//!
use fnv::FnvHashMap;
use std::fmt;
use tracing::debug;

pub const USP_V1_VERSION: u8 = 1;

pub const ANALYTICS: &str = "analytics";
pub const BEHAVIORAL_ADVERTISING: &str = "behavioral_advertising";
pub const DATA_BROKING: &str = "data_broking";

const CANONICAL_PURPOSES: [&str; 3] = [ANALYTICS, BEHAVIORAL_ADVERTISING, DATA_BROKING];

/// Canonical purpose name to the codes of its member purposes.
pub type CanonicalPurposes = FnvHashMap<String, Vec<String>>;

/// Purpose code to the user's choice for that purpose.
pub type PurposeConsents = FnvHashMap<String, bool>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flag {
    Yes,
    No,
    NotApplicable,
}

impl Flag {
    fn to_char(self) -> char {
        match self {
            Flag::Yes => 'Y',
            Flag::No => 'N',
            Flag::NotApplicable => '-',
        }
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        if b { Flag::Yes } else { Flag::No }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UspV1 {
    pub opt_out_notice: Flag,
    pub opt_out_sale: Flag,
    pub lspa_covered_transaction: Flag,
}

impl UspV1 {
    /// The string to use when the CCPA does not apply, `1---`.
    pub fn not_applicable() -> Self {
        Self {
            opt_out_notice: Flag::NotApplicable,
            opt_out_sale: Flag::NotApplicable,
            lspa_covered_transaction: Flag::NotApplicable,
        }
    }
}

impl fmt::Display for UspV1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            USP_V1_VERSION,
            self.opt_out_notice.to_char(),
            self.opt_out_sale.to_char(),
            self.lspa_covered_transaction.to_char()
        )
    }
}

/// Encoder for US Privacy strings, configured with the canonical purposes of the
/// privacy configuration.
#[derive(Clone, Debug, Default)]
pub struct UsPrivacyEncoder {
    canonical_purposes: CanonicalPurposes,
}

impl UsPrivacyEncoder {
    pub fn new(canonical_purposes: CanonicalPurposes) -> Self {
        Self { canonical_purposes }
    }

    /// Builds the US Privacy signal out of the purpose choices of the user.
    ///
    /// The user opted out of the sale of their data only if every member purpose of the
    /// analytics, behavioral advertising and data broking canonical purposes is set to `true`.
    ///
    /// Without canonical purposes, the CCPA cannot be evaluated and the returned value is
    /// [`UspV1::not_applicable`].
    pub fn encode(&self, consents: &PurposeConsents, notice: bool, lspa: bool) -> UspV1 {
        if self.canonical_purposes.is_empty() {
            debug!("no canonical purposes, using the not applicable US Privacy string");
            return UspV1::not_applicable();
        }

        let opted_out = CANONICAL_PURPOSES
            .iter()
            .all(|&name| self.is_opted_out(name, consents));

        UspV1 {
            opt_out_notice: notice.into(),
            opt_out_sale: opted_out.into(),
            lspa_covered_transaction: lspa.into(),
        }
    }

    /// A canonical purpose missing from the configuration has no member, and is opted out.
    fn is_opted_out(&self, canonical_purpose: &str, consents: &PurposeConsents) -> bool {
        self.canonical_purposes
            .get(canonical_purpose)
            .is_none_or(|codes| {
                codes
                    .iter()
                    .all(|code| consents.get(code).copied().unwrap_or(false))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn canonical(entries: &[(&str, &[&str])]) -> CanonicalPurposes {
        entries
            .iter()
            .map(|(name, codes)| {
                (
                    name.to_string(),
                    codes.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect()
    }

    fn consents(entries: &[(&str, bool)]) -> PurposeConsents {
        entries.iter().map(|(c, v)| (c.to_string(), *v)).collect()
    }

    #[test_case(&[("p1", true), ("p2", true)], false, false => "1NYN" ; "opted out")]
    #[test_case(&[("p1", true), ("p2", false)], false, false => "1NNN" ; "one purpose kept")]
    #[test_case(&[("p1", true)], false, false => "1NNN" ; "missing purpose")]
    #[test_case(&[("p1", true), ("p2", true)], true, true => "1YYY" ; "notice and lspa")]
    #[test_case(&[], true, false => "1YNN" ; "no consents")]
    fn analytics_only(c: &[(&str, bool)], notice: bool, lspa: bool) -> String {
        UsPrivacyEncoder::new(canonical(&[(ANALYTICS, &["p1", "p2"])]))
            .encode(&consents(c), notice, lspa)
            .to_string()
    }

    #[test_case(&[("a", true), ("b", true), ("d", true)] => "1NYN" ; "all opted out")]
    #[test_case(&[("a", false), ("b", true), ("d", true)] => "1NNN" ; "analytics kept")]
    #[test_case(&[("a", true), ("b", false), ("d", true)] => "1NNN" ; "behavioral advertising kept")]
    #[test_case(&[("a", true), ("b", true), ("d", false)] => "1NNN" ; "data broking kept")]
    fn all_canonical_purposes(c: &[(&str, bool)]) -> String {
        let canonical = canonical(&[
            (ANALYTICS, &["a"]),
            (BEHAVIORAL_ADVERTISING, &["b"]),
            (DATA_BROKING, &["d"]),
        ]);

        UsPrivacyEncoder::new(canonical)
            .encode(&consents(c), false, false)
            .to_string()
    }

    #[test_case(false, false)]
    #[test_case(true, true)]
    fn no_canonical_purposes(notice: bool, lspa: bool) {
        let consents = consents(&[("p1", true)]);

        assert_eq!(
            UsPrivacyEncoder::default()
                .encode(&consents, notice, lspa)
                .to_string(),
            "1---"
        );
    }

    #[test]
    fn unrelated_canonical_purposes_are_ignored() {
        let encoder = UsPrivacyEncoder::new(canonical(&[("essential", &["e"])]));

        assert_eq!(
            encoder.encode(&consents(&[("e", false)]), false, false),
            UspV1 {
                opt_out_notice: Flag::No,
                opt_out_sale: Flag::Yes,
                lspa_covered_transaction: Flag::No,
            }
        );
    }

    #[test]
    fn output_format() {
        let encoder = UsPrivacyEncoder::new(canonical(&[(ANALYTICS, &["p1"])]));

        for notice in [false, true] {
            for lspa in [false, true] {
                for consent in [false, true] {
                    let s = encoder
                        .encode(&consents(&[("p1", consent)]), notice, lspa)
                        .to_string();
                    let mut chars = s.chars();

                    assert_eq!(s.len(), 4);
                    assert!(chars.next().is_some_and(|c| c.is_ascii_digit()));
                    assert!(chars.all(|c| matches!(c, 'Y' | 'N' | '-')));
                }
            }
        }
    }
}
