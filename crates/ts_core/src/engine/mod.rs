pub mod handlers;
pub mod rules;
pub mod timesphere;
pub mod trend;

pub use handlers::{ScoreThresholdHandler, VariableThresholdHandler};
pub use rules::{MomentumRule, RandomWalkRule};
pub use timesphere::{EventHandler, SimulateOptions, TimeSphere, UpdateRule};
pub use trend::{InflectionPoint, TrendAnalyzer, TrendConfig, TrendDirection, TrendReport};
