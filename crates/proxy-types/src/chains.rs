//! Chain identifiers and the fixed testnet set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
	pub const SEPOLIA: Self = Self(11155111);
	pub const ARBITRUM_SEPOLIA: Self = Self(421614);
	pub const BASE_SEPOLIA: Self = Self(84532);
	pub const OPTIMISM_SEPOLIA: Self = Self(11155420);

	/// Whether this chain belongs to the fixed testnet set.
	///
	/// Unknown IDs are not testnets, so they count as mainnet when
	/// classifying a request.
	pub fn is_testnet(&self) -> bool {
		TESTNET_CHAIN_IDS.contains(self)
	}
}

/// Chains served by the staging orchestrator.
pub const TESTNET_CHAIN_IDS: [ChainId; 4] = [
	ChainId::SEPOLIA,
	ChainId::ARBITRUM_SEPOLIA,
	ChainId::BASE_SEPOLIA,
	ChainId::OPTIMISM_SEPOLIA,
];

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for ChainId {
	type Err = std::num::ParseIntError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(ChainId(s.parse()?))
	}
}

impl From<u64> for ChainId {
	fn from(id: u64) -> Self {
		ChainId(id)
	}
}
