//! Local validation of overclock requests.

use std::fmt;

/// Lowest accepted PLL target, MHz.
pub const OVERCLOCK_MIN_MHZ: u32 = 500;
/// Highest accepted PLL target, MHz.
pub const OVERCLOCK_MAX_MHZ: u32 = 1600;
/// Targets above this need explicit confirmation.
pub const OVERCLOCK_CONFIRM_ABOVE_MHZ: u32 = 1400;

/// What to do with a validated overclock request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverclockPlan {
    /// Send right away.
    Send(u32),
    /// Ask the user first; send only on acceptance.
    Confirm(u32),
}

impl OverclockPlan {
    pub fn mhz(self) -> u32 {
        match self {
            OverclockPlan::Send(mhz) | OverclockPlan::Confirm(mhz) => mhz,
        }
    }
}

/// Why a request was refused before reaching the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    NotANumber(String),
    OutOfRange(u64),
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::NotANumber(input) => {
                write!(f, "'{}' is not a frequency in MHz", input)
            }
            GuardError::OutOfRange(mhz) => write!(
                f,
                "{} MHz is outside the allowed range {}-{} MHz",
                mhz, OVERCLOCK_MIN_MHZ, OVERCLOCK_MAX_MHZ
            ),
        }
    }
}

impl std::error::Error for GuardError {}

/// Validates user input for the overclock control.
pub fn check_overclock(input: &str) -> Result<OverclockPlan, GuardError> {
    let trimmed = input.trim();
    let mhz: u64 = trimmed
        .parse()
        .map_err(|_| GuardError::NotANumber(trimmed.to_string()))?;

    if mhz < OVERCLOCK_MIN_MHZ as u64 || mhz > OVERCLOCK_MAX_MHZ as u64 {
        return Err(GuardError::OutOfRange(mhz));
    }

    let mhz = mhz as u32;
    if mhz > OVERCLOCK_CONFIRM_ABOVE_MHZ {
        Ok(OverclockPlan::Confirm(mhz))
    } else {
        Ok(OverclockPlan::Send(mhz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_edges() {
        assert_eq!(check_overclock("500"), Ok(OverclockPlan::Send(500)));
        assert_eq!(check_overclock("1400"), Ok(OverclockPlan::Send(1400)));
        assert_eq!(check_overclock("1401"), Ok(OverclockPlan::Confirm(1401)));
        assert_eq!(check_overclock("1600"), Ok(OverclockPlan::Confirm(1600)));
        assert_eq!(check_overclock("499"), Err(GuardError::OutOfRange(499)));
        assert_eq!(check_overclock("1601"), Err(GuardError::OutOfRange(1601)));
    }

    #[test]
    fn typical_requests() {
        assert_eq!(check_overclock("1700"), Err(GuardError::OutOfRange(1700)));
        assert_eq!(check_overclock("1450"), Ok(OverclockPlan::Confirm(1450)));
        assert_eq!(check_overclock(" 1000 "), Ok(OverclockPlan::Send(1000)));
    }

    #[test]
    fn non_numeric_rejected() {
        for input in ["", "abc", "1.5", "-800", "99999999999999999999999"] {
            assert!(matches!(
                check_overclock(input),
                Err(GuardError::NotANumber(_))
            ));
        }
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            GuardError::OutOfRange(1700).to_string(),
            "1700 MHz is outside the allowed range 500-1600 MHz"
        );
    }
}
