//! Chain ID extraction from inbound requests.
//!
//! Each extractor understands one request shape. None of them fail: missing
//! fields, wrong JSON types and unparseable numbers are skipped, and at worst
//! the result is empty, which classifies as undetermined.

use proxy_types::ChainId;
use serde_json::Value;

/// Parses a chain ID the lenient way: leading whitespace and a `+` sign are
/// skipped and the leading run of decimal digits is used, so `"8453abc"`
/// yields 8453. Anything without leading digits yields `None`.
pub fn parse_chain_id(raw: &str) -> Option<ChainId> {
	let trimmed = raw.trim_start();
	let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
	let end = unsigned
		.find(|c: char| !c.is_ascii_digit())
		.unwrap_or(unsigned.len());

	unsigned[..end].parse::<u64>().ok().map(ChainId)
}

/// Reads a chain ID from a JSON string or number.
pub fn chain_id_from_value(value: &Value) -> Option<ChainId> {
	match value {
		Value::String(s) => parse_chain_id(s),
		Value::Number(n) => n
			.as_u64()
			.or_else(|| {
				n.as_f64()
					.filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
					.map(|f| f as u64)
			})
			.map(ChainId),
		_ => None,
	}
}

fn first_param<'a>(query: &'a [(String, String)], name: &str) -> Option<&'a str> {
	query
		.iter()
		.find(|(key, _)| key == name)
		.map(|(_, value)| value.as_str())
}

/// Portfolio lookups: `chainIds=1,8453` and `tokens=1:0xabc,8453:0xdef`.
pub fn from_portfolio_query(query: &[(String, String)]) -> Vec<ChainId> {
	let mut chain_ids = Vec::new();

	if let Some(param) = first_param(query, "chainIds") {
		chain_ids.extend(param.split(',').filter_map(parse_chain_id));
	}

	if let Some(param) = first_param(query, "tokens") {
		chain_ids.extend(
			param
				.split(',')
				.filter_map(|entry| entry.split(':').next())
				.filter_map(parse_chain_id),
		);
	}

	chain_ids
}

/// Intent operation status: `{ "destinationChainId": "8453" }`.
pub fn from_status_body(body: &Value) -> Vec<ChainId> {
	body.get("destinationChainId")
		.and_then(chain_id_from_value)
		.into_iter()
		.collect()
}

/// Signed intent submission: every element's `chainId` and
/// `mandate.destinationChainId`.
pub fn from_signed_intent_op(body: &Value) -> Vec<ChainId> {
	let Some(elements) = body
		.get("signedIntentOp")
		.and_then(|op| op.get("elements"))
		.and_then(Value::as_array)
	else {
		return Vec::new();
	};

	let mut chain_ids = Vec::new();
	for element in elements {
		if let Some(id) = element.get("chainId").and_then(chain_id_from_value) {
			chain_ids.push(id);
		}
		if let Some(id) = element
			.get("mandate")
			.and_then(|mandate| mandate.get("destinationChainId"))
			.and_then(chain_id_from_value)
		{
			chain_ids.push(id);
		}
	}
	chain_ids
}

/// Intent route input: `destinationChainId`, `accountAccessList.chainIds`
/// and the keys of `accountAccessList.chainTokens`.
pub fn from_intent_input(body: &Value) -> Vec<ChainId> {
	let mut chain_ids = Vec::new();

	if let Some(id) = body.get("destinationChainId").and_then(chain_id_from_value) {
		chain_ids.push(id);
	}

	if let Some(access_list) = body.get("accountAccessList") {
		if let Some(ids) = access_list.get("chainIds").and_then(Value::as_array) {
			chain_ids.extend(ids.iter().filter_map(chain_id_from_value));
		}

		if let Some(tokens) = access_list.get("chainTokens").and_then(Value::as_object) {
			chain_ids.extend(tokens.keys().filter_map(|key| parse_chain_id(key)));
		}
	}

	chain_ids
}
