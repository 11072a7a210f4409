//! Decides which backend query a raw chat submission maps to.

use std::str::FromStr;

use strum::{EnumString, IntoStaticStr};

use crate::session::SessionMemory;

/// Separator between region and crop in a full query
pub const PAIR_DELIMITER: &str = ", ";

/// Literal replies accepted after a sell prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ConfirmToken {
    /// "yes"
    Oo,
    /// "no"
    Hindi,
}

impl ConfirmToken {
    /// Token exactly as typed and sent
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A request the backend understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Forecast {
        region: String,
        crop: String,
    },
    Confirm {
        token: ConfirmToken,
        region: String,
        crop: String,
    },
}

impl Query {
    pub fn region(&self) -> &str {
        match self {
            Query::Forecast { region, .. } | Query::Confirm { region, .. } => region,
        }
    }

    pub fn crop(&self) -> &str {
        match self {
            Query::Forecast { crop, .. } | Query::Confirm { crop, .. } => crop,
        }
    }
}

/// Outcome of classifying one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Issue this query against the backend
    Remote(Query),
    /// Not enough context to build a query; ask for "Region, Crop"
    MissingRegion,
}

/// Classify trimmed user text, updating `memory` as a side effect.
pub fn classify(text: &str, memory: &mut SessionMemory) -> Classification {
    let text = text.trim();

    if let Ok(token) = ConfirmToken::from_str(text) {
        return match memory.pair() {
            Some((region, crop)) => Classification::Remote(Query::Confirm {
                token,
                region: region.to_string(),
                crop: crop.to_string(),
            }),
            None => Classification::MissingRegion,
        };
    }

    let parts: Vec<&str> = text.split(PAIR_DELIMITER).collect();
    if let [region, crop] = parts.as_slice() {
        if region.is_empty() || crop.is_empty() {
            return Classification::MissingRegion;
        }
        memory.remember_pair(*region, *crop);
        return Classification::Remote(Query::Forecast {
            region: region.to_string(),
            crop: crop.to_string(),
        });
    }

    if text.is_empty() {
        return Classification::MissingRegion;
    }

    let Some(region) = memory.region().map(str::to_string) else {
        return Classification::MissingRegion;
    };
    memory.remember_crop(text);
    Classification::Remote(Query::Forecast {
        region,
        crop: text.to_string(),
    })
}
