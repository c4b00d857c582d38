// Domain models

mod price;
mod snapshot;

pub use price::{
    Generation, HOURS_PER_MONTH, InstanceCategory, PriceDisplay, PriceRecord, PriceRecordDisplay,
    Provider,
};
pub use snapshot::{AggregateSnapshot, AggregateSnapshotDisplay, ProviderSnapshot};
