pub mod clock_in;
pub mod common;
pub mod items;

pub use clock_in::{clock_in_collection_route, clock_in_router, ClockInHandlerState};
pub use items::{item_collection_route, items_router, ItemHandlerState};
