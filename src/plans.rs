use crate::models::Plan;

/// Subscription tiers shown on the pricing page. Prices are whole dollars
/// per month.
pub const PLANS: &[Plan] = &[
    Plan {
        id: "starter",
        name: "Starter",
        price: 9,
        description: "Perfect for getting started with wellness journaling",
        features: &[
            "Unlimited journal entries",
            "Voice-to-text support",
            "Basic mood tracking",
            "7-day history",
        ],
        popular: false,
    },
    Plan {
        id: "premium",
        name: "Premium",
        price: 19,
        description: "Everything you need for your wellness journey",
        features: &[
            "All Starter features",
            "AI-powered insights",
            "Unlimited history",
            "Custom templates",
            "Priority support",
        ],
        popular: true,
    },
    Plan {
        id: "ultimate",
        name: "Ultimate",
        price: 39,
        description: "The complete wellness experience",
        features: &[
            "All Premium features",
            "1-on-1 coaching sessions",
            "Personalized wellness plan",
            "Community access",
            "Early feature access",
            "Custom integrations",
        ],
        popular: false,
    },
];

pub fn find(plan_id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == plan_id)
}
