pub mod fees;
pub mod flow;
pub mod selection;
pub mod snapshot;

pub use fees::{FeeConfig, FeeEngine, Quote};
pub use flow::{BookingService, CheckoutFlow, FlowError, FlowOutcome, Navigation};
pub use selection::{SelectionError, TicketSelection};
pub use snapshot::{
    BookingSnapshot, PendingSelection, PendingSelectionStore, SnapshotStore, StorageError,
};
