//! ISO 3166-1 alpha-2 country codes, as reported by the lobby server.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! country_codes {
    ($($code:ident)*) => {
        /// A two-letter country code from the fixed ISO 3166-1 alpha-2 domain.
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum CountryCode {
            $($code,)*
        }

        impl CountryCode {
            /// Every code in the domain, in alphabetical order.
            pub const ALL: &'static [CountryCode] = &[$(CountryCode::$code,)*];

            /// The upper-case two-letter form, e.g. `"NZ"`.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(CountryCode::$code => stringify!($code),)*
                }
            }
        }
    };
}

country_codes! {
    AD AE AF AG AI AL AM AO AQ AR AS AT AU AW AX AZ
    BA BB BD BE BF BG BH BI BJ BL BM BN BO BQ BR BS BT BV BW BY BZ
    CA CC CD CF CG CH CI CK CL CM CN CO CR CU CV CW CX CY CZ
    DE DJ DK DM DO DZ
    EC EE EG EH ER ES ET
    FI FJ FK FM FO FR
    GA GB GD GE GF GG GH GI GL GM GN GP GQ GR GS GT GU GW GY
    HK HM HN HR HT HU
    ID IE IL IM IN IO IQ IR IS IT
    JE JM JO JP
    KE KG KH KI KM KN KP KR KW KY KZ
    LA LB LC LI LK LR LS LT LU LV LY
    MA MC MD ME MF MG MH MK ML MM MN MO MP MQ MR MS MT MU MV MW MX MY MZ
    NA NC NE NF NG NI NL NO NP NR NU NZ
    OM
    PA PE PF PG PH PK PL PM PN PR PS PT PW PY
    QA
    RE RO RS RU RW
    SA SB SC SD SE SG SH SI SJ SK SL SM SN SO SR SS ST SV SX SY SZ
    TC TD TF TG TH TJ TK TL TM TN TO TR TT TV TW TZ
    UA UG UM US UY UZ
    VA VC VE VG VI VN VU
    WF WS
    YE YT
    ZA ZM ZW
}

impl FromStr for CountryCode {
    type Err = ModelError;

    /// Parses the exact upper-case form. Callers holding lobby input should
    /// upper-case it first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CountryCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| ModelError::UnknownCountryCode(s.to_owned()))
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes() {
        assert_eq!("NZ".parse::<CountryCode>(), Ok(CountryCode::NZ));
        assert_eq!("DE".parse::<CountryCode>(), Ok(CountryCode::DE));
    }

    #[test]
    fn rejects_unknown_and_lower_case() {
        assert!("??".parse::<CountryCode>().is_err());
        assert!("nz".parse::<CountryCode>().is_err());
        assert!("NZL".parse::<CountryCode>().is_err());
    }

    #[test]
    fn display_matches_as_str() {
        for code in CountryCode::ALL {
            assert_eq!(code.to_string(), code.as_str());
            assert_eq!(code.as_str().len(), 2);
        }
    }
}
