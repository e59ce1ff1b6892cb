use crate::error::TransferBlock;
use crate::types::TransferState;

/// Registry holds that keep "Start setup" disabled
///
/// Redemption is reported first; a domain in redemption cannot become
/// eligible by waiting.
pub fn check_transferable(state: &TransferState) -> Result<(), TransferBlock> {
    if state.in_redemption {
        return Err(TransferBlock::InRedemption);
    }
    if let Some(until) = state.transfer_eligible_date {
        return Err(TransferBlock::EligibilityHold { until });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn redemption_wins_over_eligibility_hold() {
        let state = TransferState {
            in_redemption: true,
            transfer_eligible_date: Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
            ..TransferState::default()
        };
        assert_eq!(check_transferable(&state), Err(TransferBlock::InRedemption));
    }

    #[test]
    fn eligibility_hold_carries_date() {
        let until = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let state = TransferState {
            transfer_eligible_date: Some(until),
            ..TransferState::default()
        };
        assert_eq!(check_transferable(&state), Err(TransferBlock::EligibilityHold { until }));
    }

    #[test]
    fn clear_state_passes() {
        assert_eq!(check_transferable(&TransferState::default()), Ok(()));
    }
}
