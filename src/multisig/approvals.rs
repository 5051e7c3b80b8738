//! Weighted approval counting
//!
//! Signatures must be supplied ordered by strictly increasing recovered
//! address. That single rule rejects duplicate signers and the zero
//! address without any extra bookkeeping; the counter never sorts.

use crate::core::Address;
use crate::multisig::recovery::{RecoveryError, SignatureData};
use crate::multisig::wallet::MultisigError;
use std::collections::HashMap;

/// Read access to signer weights
pub trait Weighting {
    /// Weight of `signer`, zero when unknown
    fn weight_of(&self, signer: &Address) -> u64;
}

impl Weighting for HashMap<Address, u64> {
    fn weight_of(&self, signer: &Address) -> u64 {
        self.get(signer).copied().unwrap_or(0)
    }
}

/// Sum the weights of the signers of `tx_hash`
///
/// Stops as soon as the running total reaches `threshold`; signatures
/// after that point are neither recovered nor checked for ordering.
pub fn count_approvals<W: Weighting + ?Sized>(
    tx_hash: [u8; 32],
    signatures: &[SignatureData],
    weighting: &W,
    threshold: u64,
) -> Result<u64, MultisigError> {
    let mut previous = Address::ZERO;
    let mut total: u64 = 0;

    for (index, signature) in signatures.iter().enumerate() {
        let signer = signature
            .recover(tx_hash)
            .map_err(|e: RecoveryError| MultisigError::SignatureRecoveryFailed(e.to_string()))?;

        if signer <= previous {
            log::debug!(
                "Signature {} recovered {} which does not follow {}",
                index,
                signer,
                previous
            );
            return Err(MultisigError::IncorrectSignerOrdering);
        }
        previous = signer;

        let weight = weighting.weight_of(&signer);
        total = total.saturating_add(weight);
        log::debug!(
            "Signature {} from {} adds weight {} (total {})",
            index,
            signer,
            weight,
            total
        );

        if total >= threshold {
            break;
        }
    }

    Ok(total)
}
