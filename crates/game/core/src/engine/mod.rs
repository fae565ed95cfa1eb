//! Turn scheduling primitives shared by every round controller.
//!
//! The round loop itself lives in the runtime; this module owns the pure
//! pieces it needs: the per-round acting order and the decision vocabulary
//! providers answer with.
mod decision;
mod turns;

pub use decision::Decision;
pub use turns::turn_order;
