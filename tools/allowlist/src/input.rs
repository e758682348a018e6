use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use presale_common::snapshot::parse_quantity;
use presale_common::Address;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;

/// Read allowlist entries from `path`.
///
/// `.json` files hold an object of `address -> amount`; anything else is
/// read as CSV with one `address,amount` pair per line. Amounts may be
/// decimal or `0x` hex. Duplicates are left for the tree builder to reject.
pub fn read_entries(path: &Path) -> Result<Vec<(Address, u64)>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read allowlist {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_json(&contents)
    } else {
        parse_csv(&contents)
    }
}

pub fn parse_csv(contents: &str) -> Result<Vec<(Address, u64)>> {
    let mut entries = Vec::new();

    for (line_num, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let [address, amount] = fields.as_slice() else {
            bail!(
                "line {}: expected `address,amount`, got {:?}",
                line_num + 1,
                trimmed
            );
        };
        if entries.is_empty() && address.eq_ignore_ascii_case("address") {
            continue;
        }

        let address: Address = address
            .parse()
            .with_context(|| format!("line {}: invalid address", line_num + 1))?;
        let amount =
            parse_amount(amount).with_context(|| format!("line {}: invalid amount", line_num + 1))?;
        entries.push((address, amount));
    }

    Ok(entries)
}

/// A JSON object kept as its raw key/value pairs, in file order.
///
/// `serde_json::Map` keeps only the last value of a repeated key; every pair
/// has to reach the tree builder so it can report the duplicate.
struct Pairs(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Pairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = Pairs;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of address -> amount")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Pairs, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(pair) = map.next_entry::<String, Value>()? {
                    pairs.push(pair);
                }
                Ok(Pairs(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

pub fn parse_json(contents: &str) -> Result<Vec<(Address, u64)>> {
    let Pairs(pairs) =
        serde_json::from_str(contents).context("Allowlist JSON must be an object")?;

    pairs
        .iter()
        .map(|(key, value)| {
            let address: Address = key
                .parse()
                .with_context(|| format!("invalid address {}", key))?;
            let amount = match value {
                Value::Number(n) => n
                    .as_u64()
                    .with_context(|| format!("amount for {} is not a u64", key))?,
                Value::String(s) => {
                    parse_amount(s).with_context(|| format!("invalid amount for {}", key))?
                }
                other => bail!("amount for {} must be a number or string, got {}", key, other),
            };
            Ok((address, amount))
        })
        .collect()
}

fn parse_amount(input: &str) -> Result<u64> {
    let amount = parse_quantity(input)?;
    u64::try_from(amount).with_context(|| format!("amount {} does not fit in 64 bits", input))
}
