mod flow_classifier;
mod returns;

pub use flow_classifier::{classify_flow, is_external_flow, FlowType};
pub use returns::daily_flow_adjusted_return;
