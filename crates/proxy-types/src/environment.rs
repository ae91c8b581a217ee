//! Orchestrator backend environments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend deployment a request belongs to.
///
/// `Undetermined` means the chain IDs were missing or mixed, and both
/// deployments have to be tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
	Prod,
	Staging,
	Undetermined,
}

impl Environment {
	pub fn as_str(&self) -> &'static str {
		match self {
			Environment::Prod => "prod",
			Environment::Staging => "staging",
			Environment::Undetermined => "undetermined",
		}
	}
}

impl fmt::Display for Environment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
