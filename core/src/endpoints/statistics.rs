//! Sales statistics.

use serde_json::json;

use super::decoded;
use crate::endpoint::{Endpoint, EndpointContext};
use crate::error::PreconditionError;
use crate::request::{JsonPost, RequestDescriptor};
use crate::response::{Response, TypedResponse};
use crate::types::SalesStatistics;

/// Sales counters that can be summed by the statistics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticItem {
    MinecraftAccountsSold,
    MinecraftPrepaidCardsRedeemed,
    CobaltAccountsSold,
    ScrollsAccountsSold,
}

impl StatisticItem {
    pub fn metric_key(self) -> &'static str {
        match self {
            StatisticItem::MinecraftAccountsSold => "item_sold_minecraft",
            StatisticItem::MinecraftPrepaidCardsRedeemed => "prepaid_card_redeemed_minecraft",
            StatisticItem::CobaltAccountsSold => "item_sold_cobalt",
            StatisticItem::ScrollsAccountsSold => "item_sold_scrolls",
        }
    }
}

/// Combined sales statistics for the given items.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub items: Vec<StatisticItem>,
}

impl Statistics {
    pub fn new(items: impl IntoIterator<Item = StatisticItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

impl Endpoint for Statistics {
    type Output = TypedResponse<SalesStatistics>;

    fn descriptor(&self, ctx: &EndpointContext<'_>) -> Result<RequestDescriptor, PreconditionError> {
        let keys: Vec<&str> = self.items.iter().map(|item| item.metric_key()).collect();
        let body = json!({ "metricKeys": keys }).to_string();
        Ok(JsonPost::new(ctx.hosts.api_url("/orders/statistics")?, body).into())
    }

    fn parse(self, response: Response) -> Self::Output {
        decoded(response, |r| r.json())
    }
}
