pub mod event;
pub mod window;
pub mod zone;

pub use event::{Event, InvalidInterval};
pub use window::DisplayWindow;
pub use zone::{UnknownZone, Zone};
