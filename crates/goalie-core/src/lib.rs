//! Goal planning core: the generative-model seam, the plan generation and
//! relevance pipeline, and the goal service that persists accepted plans.

pub mod goal;
pub mod model;
pub mod plan;
