pub mod category;
pub mod domain;
pub mod error;
pub mod ids;

pub use category::{AlertType, ConvectiveOutlookType, HazardCategory, UnknownCategory};
pub use domain::{
    now_epoch_millis, EffectiveWindow, EpochMillis, Hazard, HazardCodes, Location, MatchMode,
    OwnerKind, UnknownMatchMode,
};
pub use error::{ErrorCode, WxError, WxResult};
pub use ids::{HazardId, LocationId, OwnerRef};
