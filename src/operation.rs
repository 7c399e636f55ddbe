use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// One bit per region of the two-set Venn diagram.
const A_ONLY: u8 = 0b100;
const BOTH: u8 = 0b010;
const B_ONLY: u8 = 0b001;

/// A set operation on two playlists, written as three binary digits.
///
/// Reading left to right, each digit says whether one region of the Venn
/// diagram of playlists A and B ends up in the result:
///
/// | digit | region            |
/// |-------|-------------------|
/// | 1st   | only in A         |
/// | 2nd   | in both A and B   |
/// | 3rd   | only in B         |
///
/// So `010` is the intersection, `101` the symmetric difference, `111` the
/// union, `100` is "A minus B" and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation(u8);

impl Operation {
    pub const EMPTY: Self = Self(0);
    pub const B_ONLY: Self = Self(B_ONLY);
    pub const INTERSECTION: Self = Self(BOTH);
    pub const B: Self = Self(BOTH | B_ONLY);
    pub const A_ONLY: Self = Self(A_ONLY);
    pub const SYMMETRIC_DIFFERENCE: Self = Self(A_ONLY | B_ONLY);
    pub const A: Self = Self(A_ONLY | BOTH);
    pub const UNION: Self = Self(A_ONLY | BOTH | B_ONLY);

    pub fn from_bits(bits: u8) -> Result<Self, Error> {
        if bits > 0b111 {
            return Err(Error::InvalidOperation(format!("{bits:b}")));
        }
        Ok(Self(bits))
    }

    /// `000` never needs either operand.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn keeps_a_only(self) -> bool {
        self.0 & A_ONLY != 0
    }

    pub fn keeps_both(self) -> bool {
        self.0 & BOTH != 0
    }

    pub fn keeps_b_only(self) -> bool {
        self.0 & B_ONLY != 0
    }

    pub fn description(self) -> &'static str {
        match self.0 {
            0b000 => "empty",
            0b001 => "only in B",
            0b010 => "intersection",
            0b011 => "all of B",
            0b100 => "only in A",
            0b101 => "symmetric difference",
            0b110 => "all of A",
            _ => "union",
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intersection" => return Ok(Self::INTERSECTION),
            "symmetric_difference" => return Ok(Self::SYMMETRIC_DIFFERENCE),
            "union" => return Ok(Self::UNION),
            _ => {}
        }

        if s.len() != 3 || !s.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(Error::InvalidOperation(s.to_string()));
        }

        let bits = s
            .bytes()
            .fold(0u8, |bits, digit| (bits << 1) | (digit - b'0'));
        Self::from_bits(bits)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binary_codes() {
        assert_eq!("000".parse::<Operation>().unwrap(), Operation::EMPTY);
        assert_eq!("001".parse::<Operation>().unwrap(), Operation::B_ONLY);
        assert_eq!("010".parse::<Operation>().unwrap(), Operation::INTERSECTION);
        assert_eq!("011".parse::<Operation>().unwrap(), Operation::B);
        assert_eq!("100".parse::<Operation>().unwrap(), Operation::A_ONLY);
        assert_eq!(
            "101".parse::<Operation>().unwrap(),
            Operation::SYMMETRIC_DIFFERENCE
        );
        assert_eq!("110".parse::<Operation>().unwrap(), Operation::A);
        assert_eq!("111".parse::<Operation>().unwrap(), Operation::UNION);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("intersection".parse::<Operation>().unwrap().to_string(), "010");
        assert_eq!(
            "symmetric_difference".parse::<Operation>().unwrap().to_string(),
            "101"
        );
        assert_eq!("union".parse::<Operation>().unwrap().to_string(), "111");
    }

    #[test]
    fn test_parse_rejects_anything_else() {
        for bad in ["", "0", "01", "0101", "012", "abc", " 010", "Union", "difference"] {
            let result = bad.parse::<Operation>();
            assert!(
                matches!(result, Err(Error::InvalidOperation(ref token)) if token == bad),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_bits_rejects_more_than_three_bits() {
        assert!(Operation::from_bits(0b111).is_ok());
        assert!(matches!(
            Operation::from_bits(0b1000),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_regions() {
        let op = Operation::SYMMETRIC_DIFFERENCE;
        assert!(op.keeps_a_only());
        assert!(!op.keeps_both());
        assert!(op.keeps_b_only());

        assert!(Operation::EMPTY.is_empty());
        assert!(!Operation::B_ONLY.is_empty());
    }
}
