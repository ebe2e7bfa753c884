//! # Payload Checksum
//!
//! MD5 signing digest proving a charge payload originated from the holder
//! of the store's private key. The gateway recomputes the same digest, so
//! field order and the absence of separators are part of the wire contract.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Kind of charge being submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeType {
    /// Immediate bill
    Pay,
    /// Reservation/book
    Prepay,
}

impl ChargeType {
    /// Literal tag the gateway expects at the head of the checksum input
    pub fn tag(&self) -> &'static str {
        match self {
            ChargeType::Pay => "PAY",
            ChargeType::Prepay => "PRE-PAY",
        }
    }
}

impl FromStr for ChargeType {
    type Err = Infallible;

    /// Unrecognized names silently map to `Prepay`, matching the
    /// gateway's own fallback.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pay" => ChargeType::Pay,
            _ => ChargeType::Prepay,
        })
    }
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeType::Pay => write!(f, "pay"),
            ChargeType::Prepay => write!(f, "prepay"),
        }
    }
}

/// Compute the signing checksum for a charge payload.
///
/// Concatenates, in order and without separators: the charge-type tag, the
/// already-formatted 2-decimal amount, the store id, the merchant order id,
/// the buyer email and the private key; returns the MD5 digest as 32
/// lowercase hex characters.
pub fn generate_check_sum(
    charge_type: ChargeType,
    amount: &str,
    store_id: &str,
    external_id: &str,
    buyer_email: &str,
    private_key: &str,
) -> String {
    let input = format!(
        "{}{}{}{}{}{}",
        charge_type.tag(),
        amount,
        store_id,
        external_id,
        buyer_email,
        private_key
    );

    format!("{:x}", md5::compute(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pay_digest() {
        // md5("PAY100.004010X1a@b.cK")
        let digest = generate_check_sum(ChargeType::Pay, "100.00", "4010", "X1", "a@b.c", "K");
        assert_eq!(digest, "eea967abd7e8540bb129385b633a2aad");
    }

    #[test]
    fn test_known_prepay_digest() {
        // md5("PRE-PAY100.004010X1a@b.cK")
        let digest =
            generate_check_sum(ChargeType::Prepay, "100.00", "4010", "X1", "a@b.c", "K");
        assert_eq!(digest, "dcc6e085bf24800cc21d6d81bb0d55f4");
    }

    #[test]
    fn test_unrecognized_type_falls_back_to_prepay() {
        let parsed: ChargeType = "installments".parse().unwrap();
        assert_eq!(parsed, ChargeType::Prepay);

        let fallback =
            generate_check_sum(parsed, "100.00", "4010", "X1", "a@b.c", "K");
        let explicit =
            generate_check_sum(ChargeType::Prepay, "100.00", "4010", "X1", "a@b.c", "K");
        assert_eq!(fallback, explicit);
    }

    #[test]
    fn test_tags() {
        assert_eq!(ChargeType::Pay.tag(), "PAY");
        assert_eq!(ChargeType::Prepay.tag(), "PRE-PAY");
        assert_eq!("pay".parse::<ChargeType>().unwrap(), ChargeType::Pay);
    }
}
