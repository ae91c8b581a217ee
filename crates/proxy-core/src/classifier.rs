//! Chain IDs to backend environment.

use proxy_types::{ChainId, Environment};

/// Decides which orchestrator deployment a set of chain IDs belongs to.
///
/// Testnet-only sets map to staging, mainnet-only sets to prod. Empty and
/// mixed sets cannot be attributed and come back as `Undetermined`.
pub fn classify(chain_ids: &[ChainId]) -> Environment {
	let has_testnet = chain_ids.iter().any(ChainId::is_testnet);
	let has_mainnet = chain_ids.iter().any(|id| !id.is_testnet());

	match (has_testnet, has_mainnet) {
		(true, false) => Environment::Staging,
		(false, true) => Environment::Prod,
		_ => Environment::Undetermined,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(raw: &[u64]) -> Vec<ChainId> {
		raw.iter().copied().map(ChainId).collect()
	}

	#[test]
	fn test_empty_is_undetermined() {
		assert_eq!(classify(&[]), Environment::Undetermined);
	}

	#[test]
	fn test_testnet_only_is_staging() {
		assert_eq!(classify(&ids(&[84532])), Environment::Staging);
		assert_eq!(
			classify(&ids(&[11155111, 421614, 84532, 11155420])),
			Environment::Staging
		);
		// repeated ids do not change the outcome
		assert_eq!(classify(&ids(&[84532, 84532])), Environment::Staging);
	}

	#[test]
	fn test_mainnet_only_is_prod() {
		assert_eq!(classify(&ids(&[1])), Environment::Prod);
		assert_eq!(classify(&ids(&[1, 10, 8453, 42161])), Environment::Prod);
		// unknown chains count as mainnet
		assert_eq!(classify(&ids(&[123456789])), Environment::Prod);
	}

	#[test]
	fn test_mixed_is_undetermined() {
		assert_eq!(classify(&ids(&[1, 84532])), Environment::Undetermined);
		assert_eq!(
			classify(&ids(&[11155111, 8453, 421614])),
			Environment::Undetermined
		);
	}
}
