// storefront/src/models/stats.rs

use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
  pub total_products: u64,
  pub total_orders: u64,
  #[serde(serialize_with = "whole_as_integer")]
  pub total_revenue: f64,
}

// `0` rather than `0.0` for an empty store, and `30` rather than `30.0`.
fn whole_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
  let whole = value.fract() == 0.0 && value.abs() < i64::MAX as f64;
  if whole {
    serializer.serialize_i64(*value as i64)
  } else {
    serializer.serialize_f64(*value)
  }
}
