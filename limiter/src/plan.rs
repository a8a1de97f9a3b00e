//! Plan-based resource ceilings for a store owner's account.
//!
//! Two conventions coexist and must stay distinct:
//! - product limit: `NULL` means unlimited;
//! - order limits: `NULL` disables the channel, `0` means unlimited and a
//!   positive value is compared against the used-counter on the subscription.

use db::models::subscription::{OrderChannel, Subscription, SubscriptionPlan};

/// Remaining count at or below which a warning is shown.
const WARNING_THRESHOLD: i64 = 3;

#[derive(Debug, Clone)]
pub struct SubscriptionLimits {
    subscription: Option<Subscription>,
    plan: Option<SubscriptionPlan>,
    published_products: i64,
}

impl SubscriptionLimits {
    /// `published_products` must be a fresh count, not a cached one.
    pub fn new(
        subscription: Option<Subscription>,
        plan: Option<SubscriptionPlan>,
        published_products: i64,
    ) -> Self {
        Self {
            subscription,
            plan,
            published_products,
        }
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    pub fn plan(&self) -> Option<&SubscriptionPlan> {
        self.plan.as_ref()
    }

    pub fn published_products(&self) -> i64 {
        self.published_products
    }

    /// Plan of an `active` or `trial` subscription.
    fn active_plan(&self) -> Option<&SubscriptionPlan> {
        let sub = self.subscription.as_ref()?;
        if sub.status == "active" || sub.status == "trial" {
            self.plan.as_ref()
        } else {
            None
        }
    }

    pub fn has_active_subscription(&self) -> bool {
        self.active_plan().is_some()
    }

    pub fn can_publish_product(&self) -> bool {
        match self.active_plan() {
            None => false,
            Some(plan) => match plan.max_products {
                None => true,
                Some(max) => self.published_products < i64::from(max),
            },
        }
    }

    pub fn can_place_whatsapp_order(&self) -> bool {
        self.can_place_order(OrderChannel::Whatsapp)
    }

    pub fn can_place_website_order(&self) -> bool {
        self.can_place_order(OrderChannel::Website)
    }

    pub fn can_place_order(&self, channel: OrderChannel) -> bool {
        match self.order_limit(channel) {
            None => false,
            Some((None, _)) => false,
            Some((Some(0), _)) => true,
            Some((Some(limit), used)) => used < limit,
        }
    }

    pub fn can_use_analytics(&self) -> bool {
        self.active_plan().is_some_and(|plan| plan.enable_analytics)
    }

    pub fn can_share_location(&self) -> bool {
        self.active_plan()
            .is_some_and(|plan| plan.enable_location_sharing)
    }

    /// `None` when unlimited.
    pub fn remaining_products(&self) -> Option<i64> {
        match self.active_plan() {
            None => Some(0),
            Some(plan) => plan
                .max_products
                .map(|max| (i64::from(max) - self.published_products).max(0)),
        }
    }

    pub fn remaining_whatsapp_orders(&self) -> Option<i64> {
        self.remaining_orders(OrderChannel::Whatsapp)
    }

    pub fn remaining_website_orders(&self) -> Option<i64> {
        self.remaining_orders(OrderChannel::Website)
    }

    /// `None` when unlimited; a disabled channel has nothing remaining.
    pub fn remaining_orders(&self, channel: OrderChannel) -> Option<i64> {
        match self.order_limit(channel) {
            None | Some((None, _)) => Some(0),
            Some((Some(0), _)) => None,
            Some((Some(limit), used)) => Some(i64::from(limit - used).max(0)),
        }
    }

    pub fn product_limit_warning(&self) -> Option<String> {
        match self.remaining_products()? {
            0 => Some(
                "You have reached your product limit. Upgrade your plan to publish more products."
                    .to_string(),
            ),
            n if n <= WARNING_THRESHOLD => Some(format!(
                "You can publish {} more {} on your current plan.",
                n,
                if n == 1 { "product" } else { "products" }
            )),
            _ => None,
        }
    }

    pub fn whatsapp_order_warning(&self) -> Option<String> {
        self.order_warning(OrderChannel::Whatsapp)
    }

    pub fn website_order_warning(&self) -> Option<String> {
        self.order_warning(OrderChannel::Website)
    }

    pub fn order_warning(&self, channel: OrderChannel) -> Option<String> {
        let label = match channel {
            OrderChannel::Whatsapp => "WhatsApp",
            OrderChannel::Website => "website",
        };
        if let Some((None, _)) = self.order_limit(channel) {
            return Some(format!(
                "Your current plan does not include {} orders.",
                label
            ));
        }
        match self.remaining_orders(channel)? {
            0 => Some(format!(
                "You have reached your {} order limit. Upgrade your plan to accept more orders.",
                label
            )),
            n if n <= WARNING_THRESHOLD => Some(format!(
                "Only {} {} {} left on your current plan.",
                n,
                label,
                if n == 1 { "order" } else { "orders" }
            )),
            _ => None,
        }
    }

    /// All warnings that currently apply, in display order.
    pub fn warnings(&self) -> Vec<String> {
        [
            self.product_limit_warning(),
            self.whatsapp_order_warning(),
            self.website_order_warning(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// `(limit, used)` of a channel, or `None` without an active subscription.
    fn order_limit(&self, channel: OrderChannel) -> Option<(Option<i32>, i32)> {
        let plan = self.active_plan()?;
        let sub = self.subscription.as_ref()?;
        Some(match channel {
            OrderChannel::Whatsapp => (plan.whatsapp_orders_limit, sub.whatsapp_orders_used),
            OrderChannel::Website => (plan.website_orders_limit, sub.website_orders_used),
        })
    }
}
