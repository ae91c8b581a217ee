//! Correlation IDs for inbound requests.

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `<unix millis>-<9 random base36 chars>`, e.g. `1718000000000-k3j9x0a2b`.
pub fn generate_request_id() -> String {
	let mut rng = rand::thread_rng();
	let suffix: String = (0..9)
		.map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
		.collect();

	format!("{}-{}", chrono::Utc::now().timestamp_millis(), suffix)
}
